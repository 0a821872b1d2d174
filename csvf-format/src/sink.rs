use crate::error::AppendError;

/// Growable output buffer that both conversion stages write into.
///
/// Every append may fail. Implementations must leave the bytes that were accepted
/// before a failed append untouched.
///
/// `Vec<u8>` is the usual sink; it reserves fallibly so that allocation failure is
/// reported instead of aborting the process.
pub trait ByteSink {
    /// Append a single byte.
    fn append_byte(&mut self, byte: u8) -> Result<(), AppendError>;

    /// Append a run of bytes. The default implementation appends byte by byte.
    fn append_slice(&mut self, bytes: &[u8]) -> Result<(), AppendError> {
        bytes.iter().try_for_each(|byte| self.append_byte(*byte))
    }

    /// Number of bytes currently held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ByteSink for Vec<u8> {
    fn append_byte(&mut self, byte: u8) -> Result<(), AppendError> {
        self.try_reserve(1)
            .map_err(|_| AppendError { len: Vec::len(self) })?;
        self.push(byte);
        Ok(())
    }

    fn append_slice(&mut self, bytes: &[u8]) -> Result<(), AppendError> {
        self.try_reserve(bytes.len())
            .map_err(|_| AppendError { len: Vec::len(self) })?;
        self.extend_from_slice(bytes);
        Ok(())
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

/// `BytesMut` has no fallible reservation. Appends that would grow it past `isize::MAX`
/// bytes are refused; an allocation failure below that limit aborts the process.
#[cfg(feature = "tokio")]
impl ByteSink for bytes::BytesMut {
    fn append_byte(&mut self, byte: u8) -> Result<(), AppendError> {
        self.append_slice(&[byte])
    }

    fn append_slice(&mut self, bytes: &[u8]) -> Result<(), AppendError> {
        let len = bytes::BytesMut::len(self);
        if len.saturating_add(bytes.len()) > isize::MAX as usize {
            return Err(AppendError { len });
        }
        self.extend_from_slice(bytes);
        Ok(())
    }

    fn len(&self) -> usize {
        bytes::BytesMut::len(self)
    }
}

#[test]
fn vec_sink_appends() {
    let mut sink = Vec::new();
    sink.append_byte(0x12).unwrap();
    sink.append_slice(&[0x34, 0x56]).unwrap();
    assert_eq!(ByteSink::len(&sink), 3);
    assert_eq!(sink, vec![0x12, 0x34, 0x56]);
}

#[cfg(feature = "tokio")]
#[test]
fn bytes_mut_sink_appends() {
    let mut sink = bytes::BytesMut::new();
    sink.append_byte(0x12).unwrap();
    sink.append_slice(&[0x34, 0x56]).unwrap();
    assert_eq!(ByteSink::len(&sink), 3);
    assert_eq!(&sink[..], &[0x12, 0x34, 0x56]);
}

//! Reading a CSVF body back into the swapped command stream.
//!
//! A length byte of zero is the marker for a 16-bit length, so a chunk or run of
//! length zero written in the short form looks just like it. The compressor only
//! writes one for a program consisting of nothing but XCOMPLETE, whose body is
//! `[0x00, 0x00, 0x01]`. A zero with fewer than two bytes after it can't start a
//! 16-bit length and is read as a zero length instead.
use crate::{compress::CSVF_HEADER, error::DecodeError};

/// Reads the length field at `offset` and returns it with the offset past it.
fn read_length(body: &[u8], offset: usize) -> Result<(usize, usize), DecodeError> {
    match body.get(offset) {
        None => Err(DecodeError::TruncatedLength { offset }),
        Some(0) => match body.get(offset + 1..offset + 3) {
            Some(&[high, low]) => Ok((u16::from_be_bytes([high, low]) as usize, offset + 3)),
            _ => Ok((0, offset + 1)),
        },
        Some(len) => Ok((*len as usize, offset + 1)),
    }
}

pub(crate) fn check_header(header: u8) -> Result<(), DecodeError> {
    if header == CSVF_HEADER {
        Ok(())
    } else {
        Err(DecodeError::UnsupportedHeader(header))
    }
}

/// Rebuilds the swapped command stream from a complete CSVF body.
pub fn expand(body: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let (&header, _) = body.split_first().ok_or(DecodeError::MissingHeader)?;
    check_header(header)?;

    let mut out = Vec::with_capacity(body.len());
    let mut offset = 1;
    while offset < body.len() {
        let (chunk_len, chunk_start) = read_length(body, offset)?;
        let chunk = body
            .get(chunk_start..chunk_start + chunk_len)
            .ok_or(DecodeError::TruncatedChunk {
                offset: chunk_start,
                len: chunk_len,
            })?;
        out.extend_from_slice(chunk);
        let (run_len, next) = read_length(body, chunk_start + chunk_len)?;
        out.resize(out.len() + run_len, 0);
        offset = next;
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::expand;
    use crate::compress::compress;
    use crate::error::DecodeError;

    #[test]
    fn expands_chunks_and_runs() {
        let body = [0x00, 0x02, 0x12, 0x34, 0x09, 0x01, 0xCD, 0x03];
        assert_eq!(
            expand(&body).unwrap(),
            vec![0x12, 0x34, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xCD, 0, 0, 0]
        );
    }

    #[test]
    fn long_lengths() {
        let mut data = vec![0x77; 300];
        data.extend([0; 1000]);
        let mut body: Vec<u8> = Vec::new();
        compress(&data, &mut body).unwrap();
        assert_eq!(&body[..4], &[0x00, 0x00, 0x01, 0x2C]);
        assert_eq!(expand(&body).unwrap(), data);
    }

    #[test]
    fn header_only() {
        assert_eq!(expand(&[0x00]).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn short_zero_length_at_end() {
        assert_eq!(expand(&[0x00, 0x00, 0x01]).unwrap(), vec![0x00]);
        assert_eq!(expand(&[0x00, 0x01, 0xAB, 0x00]).unwrap(), vec![0xAB]);
        assert_eq!(
            expand(&[0x00, 0x00, 0x00, 0x01, 0xAB, 0x02]).unwrap(),
            vec![0xAB, 0x00, 0x00]
        );
    }

    #[test]
    fn malformed_bodies() {
        assert_eq!(expand(&[]), Err(DecodeError::MissingHeader));
        assert_eq!(expand(&[0x80]), Err(DecodeError::UnsupportedHeader(0x80)));
        assert_eq!(
            expand(&[0x00, 0x03, 0x01]),
            Err(DecodeError::TruncatedChunk { offset: 2, len: 3 })
        );
        assert_eq!(
            expand(&[0x00, 0x01, 0x01]),
            Err(DecodeError::TruncatedLength { offset: 3 })
        );
        assert_eq!(
            expand(&[0x00, 0x04, 0x01]),
            Err(DecodeError::TruncatedChunk { offset: 2, len: 4 })
        );
        assert_eq!(
            expand(&[0x00, 0x01, 0x01, 0x00, 0x01]),
            Err(DecodeError::TruncatedChunk { offset: 5, len: 1 })
        );
    }
}

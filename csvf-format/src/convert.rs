use std::{fs::File, io::Read, path::Path};

use crate::{
    compress::compress,
    error::{ConvertError, SizeError},
    reader::TokenReader,
    sink::ByteSink,
    swap::swap_stream,
};

/// Initial capacity of the buffers a conversion allocates.
pub const DEFAULT_CAPACITY_HINT: usize = 0x20000;

#[derive(Debug, Clone)]
pub struct Config {
    /// Reverse the byte order of bit-sequences. Only disable this to inspect the output.
    pub swap: bool,
    pub capacity_hint: usize,
    /// Size of the player's playback buffer, if known.
    pub max_buffer_size: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            swap: true,
            capacity_hint: DEFAULT_CAPACITY_HINT,
            max_buffer_size: None,
        }
    }
}

/// Builder to create a [Config] with non-default options
///
/// # Example
///
/// ```
/// use csvf_format::convert::Builder;
///
/// let config = Builder::new()
///     .max_buffer_size(64)
///     .capacity_hint(4096)
///     .build();
/// assert!(config.swap);
/// assert_eq!(config.max_buffer_size, Some(64));
/// ```
#[derive(Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    pub fn swap(mut self, swap: bool) -> Self {
        self.config.swap = swap;
        self
    }

    pub fn capacity_hint(mut self, capacity: usize) -> Self {
        self.config.capacity_hint = capacity;
        self
    }

    /// Reject programs that need a larger playback buffer than `size` bytes.
    pub fn max_buffer_size(mut self, size: u16) -> Self {
        self.config.max_buffer_size = Some(size);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

/// Result of a successful conversion.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Conversion {
    /// The CSVF body, header byte included.
    pub csvf: Vec<u8>,
    /// Number of bytes the player must buffer for a single compare operand.
    pub max_buffer_size: u16,
}

fn allocate(capacity_hint: usize) -> Result<Vec<u8>, ConvertError> {
    let mut buf = Vec::new();
    buf.try_reserve(capacity_hint)?;
    Ok(buf)
}

/// Converts the XSVF program `xsvf`, writing the CSVF body into `csvf`.
///
/// Returns the playback buffer size the program needs. On failure `csvf` holds whatever
/// was written before the error and should be discarded.
pub fn convert_into(
    xsvf: &[u8],
    config: &Config,
    csvf: &mut impl ByteSink,
) -> Result<u16, ConvertError> {
    let mut swapped = allocate(config.capacity_hint)?;
    let max_buffer_size = swap_stream(&mut TokenReader::new(xsvf), &mut swapped, config.swap)?;
    if let Some(max) = config.max_buffer_size
        && max_buffer_size > max
    {
        return Err(SizeError::BufferLimit {
            max,
            got: max_buffer_size,
        }
        .into());
    }
    compress(&swapped, csvf)?;
    Ok(max_buffer_size)
}

/// Converts an in-memory XSVF program.
pub fn convert_bytes(xsvf: &[u8], config: &Config) -> Result<Conversion, ConvertError> {
    let mut csvf = allocate(config.capacity_hint)?;
    let max_buffer_size = convert_into(xsvf, config, &mut csvf)?;
    Ok(Conversion {
        csvf,
        max_buffer_size,
    })
}

/// Loads the XSVF file at `path` and converts it.
pub fn convert_file(path: impl AsRef<Path>, config: &Config) -> Result<Conversion, ConvertError> {
    let path = path.as_ref();
    let mut xsvf = allocate(config.capacity_hint)?;
    File::open(path)
        .and_then(|mut file| file.read_to_end(&mut xsvf))
        .map_err(|source| ConvertError::BufferLoad {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!("Loaded {} bytes from {}", xsvf.len(), path.display());
    convert_bytes(&xsvf, config)
}

#[cfg(test)]
mod test {
    use super::{Builder, Config, convert_bytes, convert_file, convert_into};
    use crate::error::{AppendError, ConvertError, ErrorKind, SizeError};
    use crate::expand::expand;
    use crate::sink::ByteSink;

    const PROGRAM: &[u8] = &[
        0x12, 0x00, // XSTATE Test-Logic-Reset
        0x08, 0x00, 0x00, 0x00, 0x20, //
        0x01, 0x00, 0x00, 0x00, 0xFF, //
        0x09, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, //
        0x00,
    ];

    /// Sink that refuses to hold more than `limit` bytes.
    struct Bounded {
        data: Vec<u8>,
        limit: usize,
    }

    impl ByteSink for Bounded {
        fn append_byte(&mut self, byte: u8) -> Result<(), AppendError> {
            if self.data.len() >= self.limit {
                return Err(AppendError {
                    len: self.data.len(),
                });
            }
            self.data.push(byte);
            Ok(())
        }

        fn len(&self) -> usize {
            self.data.len()
        }
    }

    #[test]
    fn converts_program() {
        let conversion = convert_bytes(PROGRAM, &Config::default()).unwrap();
        assert_eq!(conversion.max_buffer_size, 4);
        assert_eq!(
            conversion.csvf,
            vec![
                0x00, // header
                0x10, 0x12, 0x00, 0x08, 0x00, 0x20, 0x01, 0xFF, 0x00, 0x00, 0x00, 0x09, 0x00,
                0x00, 0x00, 0x00, 0x01, // chunk
                0x04, // run
            ]
        );
        assert_eq!(
            expand(&conversion.csvf).unwrap(),
            vec![
                0x12, 0x00, 0x08, 0x00, 0x20, 0x01, 0xFF, 0x00, 0x00, 0x00, 0x09, 0x00, 0x00,
                0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
            ]
        );
    }

    #[test]
    fn buffer_limit() {
        let config = Builder::new().max_buffer_size(3).build();
        match convert_bytes(PROGRAM, &config) {
            Err(ConvertError::UnsupportedSize(SizeError::BufferLimit { max, got })) => {
                assert_eq!(max, 3);
                assert_eq!(got, 4);
            }
            other => panic!("expected BufferLimit, got {:?}", other),
        }
        let config = Builder::new().max_buffer_size(4).build();
        assert!(convert_bytes(PROGRAM, &config).is_ok());
    }

    #[test]
    fn swap_disabled() {
        let config = Builder::new().swap(false).build();
        let conversion = convert_bytes(PROGRAM, &config).unwrap();
        let expanded = expand(&conversion.csvf).unwrap();
        assert_eq!(&expanded[5..10], &[0x01, 0x00, 0x00, 0x00, 0xFF]);
    }

    #[test]
    fn output_sink_full() {
        let mut sink = Bounded {
            data: Vec::new(),
            limit: 5,
        };
        let err = convert_into(PROGRAM, &Config::default(), &mut sink).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferAppend);
        assert_eq!(sink.data.len(), 5);
    }

    #[test]
    fn missing_file() {
        let err = convert_file("/nonexistent/program.xsvf", &Config::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferLoad);
        assert!(err.to_string().contains("/nonexistent/program.xsvf"));
    }

    #[test]
    fn oversized_capacity_hint() {
        let config = Builder::new().capacity_hint(usize::MAX).build();
        let err = convert_bytes(PROGRAM, &config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferInit);
    }
}

use std::{
    collections::TryReserveError,
    error::Error,
    fmt::Display,
    io,
    path::PathBuf,
};

use crate::xsvf::Opcode;

/// Flat status kind of a failed conversion.
///
/// Callers that only need to branch on the failure (or map it onto a numeric status)
/// can use [`ConvertError::kind`] without ever rendering a message.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    BufferInit,
    BufferAppend,
    BufferLoad,
    UnsupportedCommand,
    UnsupportedSize,
    UnsupportedData,
    Truncated,
}

/// An output sink refused to grow.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AppendError {
    /// Number of bytes the sink held when the append failed.
    pub len: usize,
}

impl Display for AppendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Output buffer could not grow beyond {} bytes", self.len)
    }
}

impl Error for AppendError {}

/// The different ways an operand can be too large for the player.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SizeError {
    /// A bit-sequence needs more scratch space than is available.
    OperandTooLarge { max: usize, got: usize },
    /// XSDRSIZE carried a value that does not fit into 16 bits.
    SizeHighBits { value: u32 },
    /// The program needs a larger playback buffer than the configured limit.
    BufferLimit { max: u16, got: u16 },
    /// A chunk or run length does not fit into the 16-bit length field.
    LengthOverflow { got: usize },
}

impl Display for SizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SizeError::OperandTooLarge { max, got } => {
                write!(f, "Operand of {} bytes exceeds the maximum of {}", got, max)
            }
            SizeError::SizeHighBits { value } => {
                write!(f, "XSDRSIZE of 0x{:08X} does not fit into 16 bits", value)
            }
            SizeError::BufferLimit { max, got } => write!(
                f,
                "Program needs a {} byte playback buffer, but only {} are available",
                got, max
            ),
            SizeError::LengthOverflow { got } => {
                write!(f, "Length {} cannot be encoded in 16 bits", got)
            }
        }
    }
}

/// Errors that may occur when converting an XSVF program to CSVF.
#[derive(Debug)]
pub enum ConvertError {
    BufferInit(TryReserveError),
    BufferAppend(AppendError),
    BufferLoad { path: PathBuf, source: io::Error },
    UnsupportedCommand { opcode: u8, offset: usize },
    UnsupportedSize(SizeError),
    UnsupportedData { opcode: Opcode, value: u8 },
    Truncated { offset: usize },
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::BufferInit(_) => ErrorKind::BufferInit,
            ConvertError::BufferAppend(_) => ErrorKind::BufferAppend,
            ConvertError::BufferLoad { .. } => ErrorKind::BufferLoad,
            ConvertError::UnsupportedCommand { .. } => ErrorKind::UnsupportedCommand,
            ConvertError::UnsupportedSize(_) => ErrorKind::UnsupportedSize,
            ConvertError::UnsupportedData { .. } => ErrorKind::UnsupportedData,
            ConvertError::Truncated { .. } => ErrorKind::Truncated,
        }
    }
}

impl From<AppendError> for ConvertError {
    fn from(value: AppendError) -> Self {
        ConvertError::BufferAppend(value)
    }
}

impl From<SizeError> for ConvertError {
    fn from(value: SizeError) -> Self {
        ConvertError::UnsupportedSize(value)
    }
}

impl From<TryReserveError> for ConvertError {
    fn from(value: TryReserveError) -> Self {
        ConvertError::BufferInit(value)
    }
}

impl Display for ConvertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvertError::BufferInit(error) => {
                write!(f, "Buffer could not be allocated: {}", error)
            }
            ConvertError::BufferAppend(error) => write!(f, "{}", error),
            ConvertError::BufferLoad { path, source } => {
                write!(f, "Unable to load {}: {}", path.display(), source)
            }
            ConvertError::UnsupportedCommand { opcode, offset } => match Opcode::from_byte(*opcode)
            {
                Some(known) => write!(
                    f,
                    "Unsupported XSVF command {} (0x{:02X}) at offset {}",
                    known, opcode, offset
                ),
                None => write!(
                    f,
                    "Unknown XSVF command 0x{:02X} at offset {}",
                    opcode, offset
                ),
            },
            ConvertError::UnsupportedSize(error) => write!(f, "{}", error),
            ConvertError::UnsupportedData { opcode, value } => {
                write!(f, "Unsupported {} operand 0x{:02X}", opcode, value)
            }
            ConvertError::Truncated { offset } => {
                write!(f, "XSVF stream ends unexpectedly at offset {}", offset)
            }
        }
    }
}

impl Error for ConvertError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConvertError::BufferInit(error) => Some(error),
            ConvertError::BufferAppend(error) => Some(error),
            ConvertError::BufferLoad { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Errors that may occur when reading a CSVF body back.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DecodeError {
    MissingHeader,
    UnsupportedHeader(u8),
    /// A length field is cut off by the end of the body.
    TruncatedLength { offset: usize },
    /// A chunk announces more literal bytes than the body holds. `offset` is where
    /// the chunk's literal bytes start and `len` is the announced length.
    TruncatedChunk { offset: usize, len: usize },
    Io(io::ErrorKind),
}

impl From<io::Error> for DecodeError {
    fn from(value: io::Error) -> Self {
        DecodeError::Io(value.kind())
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::MissingHeader => write!(f, "CSVF body has no header byte"),
            DecodeError::UnsupportedHeader(header) => {
                write!(f, "Unsupported CSVF header 0x{:02X}", header)
            }
            DecodeError::TruncatedLength { offset } => {
                write!(f, "Length field at offset {} is incomplete", offset)
            }
            DecodeError::TruncatedChunk { offset, len } => write!(
                f,
                "Chunk of {} bytes at offset {} runs past the end",
                len, offset
            ),
            DecodeError::Io(kind) => write!(f, "{}", kind),
        }
    }
}

impl Error for DecodeError {}

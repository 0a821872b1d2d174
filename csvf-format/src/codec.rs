//! Incremental CSVF reading for `tokio_util` framed streams.
//!
//! A player reads a CSVF body strictly forwards; [`CsvfDecoder`] does the same and yields
//! the expanded command stream as soon as bytes arrive, without buffering whole chunks.
use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;

use crate::{error::DecodeError, expand::check_header};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum State {
    Header,
    ChunkLength,
    /// Literal bytes still to come, with the offset and length of the whole chunk.
    Chunk {
        start: usize,
        len: usize,
        remaining: usize,
    },
    RunLength,
}

/// Decoder turning a CSVF body into the swapped XSVF stream.
#[derive(Debug)]
pub struct CsvfDecoder {
    state: State,
    consumed: usize,
}

impl Default for CsvfDecoder {
    fn default() -> Self {
        CsvfDecoder {
            state: State::Header,
            consumed: 0,
        }
    }
}

impl CsvfDecoder {
    pub fn new() -> CsvfDecoder {
        CsvfDecoder::default()
    }

    fn start_chunk(&mut self, len: usize) {
        self.state = State::Chunk {
            start: self.consumed,
            len,
            remaining: len,
        };
    }

    /// Takes a complete length field from `src`, or nothing if it has not fully arrived.
    fn take_length(&mut self, src: &mut BytesMut) -> Option<usize> {
        match src.first() {
            None => None,
            Some(0) if src.len() < 3 => None,
            Some(0) => {
                src.advance(1);
                self.consumed += 3;
                Some(src.get_u16() as usize)
            }
            Some(_) => {
                self.consumed += 1;
                Some(src.get_u8() as usize)
            }
        }
    }
}

impl Decoder for CsvfDecoder {
    type Item = BytesMut;
    type Error = DecodeError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<BytesMut>, DecodeError> {
        let mut out = BytesMut::new();
        loop {
            match self.state {
                State::Header => {
                    if src.is_empty() {
                        break;
                    }
                    check_header(src.get_u8())?;
                    self.consumed += 1;
                    self.state = State::ChunkLength;
                }
                State::ChunkLength => match self.take_length(src) {
                    Some(len) => self.start_chunk(len),
                    None => break,
                },
                State::Chunk { remaining: 0, .. } => self.state = State::RunLength,
                State::Chunk {
                    start,
                    len,
                    remaining,
                } => {
                    if src.is_empty() {
                        break;
                    }
                    let n = remaining.min(src.len());
                    out.extend_from_slice(&src.split_to(n));
                    self.consumed += n;
                    self.state = State::Chunk {
                        start,
                        len,
                        remaining: remaining - n,
                    };
                }
                State::RunLength => match self.take_length(src) {
                    Some(len) => {
                        out.resize(out.len() + len, 0);
                        self.state = State::ChunkLength;
                    }
                    None => break,
                },
            }
        }
        Ok(if out.is_empty() { None } else { Some(out) })
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<BytesMut>, DecodeError> {
        if let Some(item) = self.decode(src)? {
            return Ok(Some(item));
        }
        match self.state {
            State::ChunkLength if src.is_empty() => Ok(None),
            // A zero too close to the end to start a 16-bit length is a short zero length.
            State::ChunkLength | State::RunLength if src.first() == Some(&0) => {
                src.advance(1);
                self.consumed += 1;
                match self.state {
                    State::ChunkLength => self.start_chunk(0),
                    _ => self.state = State::ChunkLength,
                }
                self.decode_eof(src)
            }
            State::Header => Err(DecodeError::MissingHeader),
            State::Chunk { start, len, .. } => {
                Err(DecodeError::TruncatedChunk { offset: start, len })
            }
            State::ChunkLength | State::RunLength => Err(DecodeError::TruncatedLength {
                offset: self.consumed,
            }),
        }
    }
}

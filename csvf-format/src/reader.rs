use crate::error::ConvertError;

/// Cursor over a raw XSVF byte stream.
#[derive(Clone, Debug)]
pub struct TokenReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> TokenReader<'a> {
    pub fn new(data: &'a [u8]) -> TokenReader<'a> {
        TokenReader { data, position: 0 }
    }

    /// Offset of the next byte to be read.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn next_byte(&mut self) -> Result<u8, ConvertError> {
        let byte = *self
            .data
            .get(self.position)
            .ok_or(ConvertError::Truncated {
                offset: self.position,
            })?;
        self.position += 1;
        Ok(byte)
    }

    /// Returns the next `n` bytes in stream order.
    pub fn next_bytes(&mut self, n: usize) -> Result<&'a [u8], ConvertError> {
        if n > self.remaining() {
            return Err(ConvertError::Truncated {
                offset: self.position,
            });
        }
        let bytes = &self.data[self.position..self.position + n];
        self.position += n;
        Ok(bytes)
    }
}

//! Shared XSVF program builders for the end-to-end tests.

/// Assembles XSVF programs command by command.
#[derive(Default)]
pub struct XsvfBuilder {
    bytes: Vec<u8>,
}

impl XsvfBuilder {
    pub fn new() -> XsvfBuilder {
        XsvfBuilder::default()
    }

    pub fn state(mut self, state: u8) -> Self {
        self.bytes.extend_from_slice(&[0x12, state]);
        self
    }

    pub fn end_ir(mut self, state: u8) -> Self {
        self.bytes.extend_from_slice(&[0x13, state]);
        self
    }

    pub fn end_dr(mut self, state: u8) -> Self {
        self.bytes.extend_from_slice(&[0x14, state]);
        self
    }

    pub fn repeat(mut self, count: u8) -> Self {
        self.bytes.extend_from_slice(&[0x07, count]);
        self
    }

    pub fn run_test(mut self, clocks: u32) -> Self {
        self.bytes.push(0x04);
        self.bytes.extend_from_slice(&clocks.to_be_bytes());
        self
    }

    pub fn sdr_size(mut self, bits: u32) -> Self {
        self.bytes.push(0x08);
        self.bytes.extend_from_slice(&bits.to_be_bytes());
        self
    }

    pub fn sir(mut self, bits: u8, value: &[u8]) -> Self {
        self.bytes.extend_from_slice(&[0x02, bits]);
        self.bytes.extend_from_slice(value);
        self
    }

    pub fn tdo_mask(mut self, mask: &[u8]) -> Self {
        self.bytes.push(0x01);
        self.bytes.extend_from_slice(mask);
        self
    }

    pub fn sdr_tdo(mut self, tdi: &[u8], tdo: &[u8]) -> Self {
        self.bytes.push(0x09);
        self.bytes.extend_from_slice(tdi);
        self.bytes.extend_from_slice(tdo);
        self
    }

    /// Appends a raw command byte followed by `operand`.
    pub fn raw(mut self, opcode: u8, operand: &[u8]) -> Self {
        self.bytes.push(opcode);
        self.bytes.extend_from_slice(operand);
        self
    }

    pub fn complete(mut self) -> Vec<u8> {
        self.bytes.push(0x00);
        self.bytes
    }
}


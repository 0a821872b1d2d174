//! First conversion stage: rewrites the XSVF command stream so that every bit-sequence
//! can be played by reading forwards.
//!
//! XSVF stores bit-sequences big-endian, i.e. the byte that has to be shifted into the
//! JTAG chain first comes last. The swap stage walks the command stream once, copies
//! fixed-size operands unchanged and reverses the byte order of every variable-length
//! operand. It also records the largest data register operand, which is the amount of
//! scratch memory a player needs for compare operations.
use crate::{
    error::{ConvertError, SizeError},
    reader::TokenReader,
    sink::ByteSink,
    xsvf::{END_STATE_IDLE, Opcode, TapState, bits_to_bytes},
};

/// Largest XTDOMASK or XSDRTDO operand (in bytes) a player has to buffer.
pub const MAX_OPERAND_BYTES: usize = 128;

// XSDRTDO carries two operands of up to MAX_OPERAND_BYTES that are swapped together.
const SCRATCH_BYTES: usize = 2 * MAX_OPERAND_BYTES;

/// Bounded area used to reverse a single operand.
struct Scratch {
    buf: [u8; SCRATCH_BYTES],
}

impl Scratch {
    fn new() -> Scratch {
        Scratch {
            buf: [0; SCRATCH_BYTES],
        }
    }

    /// Read `num_bytes` from `reader` and append them to `out`, reversed if `swap` is set.
    fn reverse_copy(
        &mut self,
        reader: &mut TokenReader<'_>,
        num_bytes: usize,
        out: &mut impl ByteSink,
        swap: bool,
    ) -> Result<(), ConvertError> {
        if num_bytes > SCRATCH_BYTES {
            return Err(SizeError::OperandTooLarge {
                max: SCRATCH_BYTES,
                got: num_bytes,
            }
            .into());
        }
        let operand = &mut self.buf[..num_bytes];
        operand.copy_from_slice(reader.next_bytes(num_bytes)?);
        if swap {
            operand.reverse();
        }
        out.append_slice(operand)?;
        Ok(())
    }
}

/// Translates the XSVF command stream read from `reader` into `out`.
///
/// Returns the maximum number of bytes a player must buffer for a single
/// XTDOMASK or XSDRTDO operand. With `swap` disabled the operands are copied in
/// their original order, which is only useful to inspect the command filtering.
pub fn swap_stream(
    reader: &mut TokenReader<'_>,
    out: &mut impl ByteSink,
    swap: bool,
) -> Result<u16, ConvertError> {
    let mut scratch = Scratch::new();
    let mut xsdr_size: u16 = 0;
    let mut max_buffer_size: u16 = 0;

    loop {
        let offset = reader.position();
        let byte = reader.next_byte()?;
        let opcode = Opcode::from_byte(byte).ok_or(ConvertError::UnsupportedCommand {
            opcode: byte,
            offset,
        })?;
        log::trace!("{} at offset {}", opcode, offset);

        match opcode {
            Opcode::XCOMPLETE => {
                out.append_byte(opcode.to_byte())?;
                break;
            }
            Opcode::XTDOMASK | Opcode::XSDRTDO => {
                let num_bytes = bits_to_bytes(xsdr_size as u32);
                if num_bytes > MAX_OPERAND_BYTES {
                    return Err(SizeError::OperandTooLarge {
                        max: MAX_OPERAND_BYTES,
                        got: num_bytes,
                    }
                    .into());
                }
                max_buffer_size = max_buffer_size.max(num_bytes as u16);
                out.append_byte(opcode.to_byte())?;
                // XSDRTDO carries tdiValue followed by tdoExpected
                let operands = if opcode == Opcode::XSDRTDO { 2 } else { 1 };
                scratch.reverse_copy(reader, operands * num_bytes, out, swap)?;
            }
            Opcode::XREPEAT => {
                reader.next_byte()?;
            }
            Opcode::XRUNTEST => {
                out.append_byte(opcode.to_byte())?;
                out.append_slice(reader.next_bytes(4)?)?;
            }
            Opcode::XSIR => {
                out.append_byte(opcode.to_byte())?;
                let num_bits = reader.next_byte()?;
                out.append_byte(num_bits)?;
                scratch.reverse_copy(reader, bits_to_bytes(num_bits as u32), out, swap)?;
            }
            Opcode::XSDRSIZE => {
                out.append_byte(opcode.to_byte())?;
                let value = reader.next_bytes(4)?;
                let value = u32::from_be_bytes([value[0], value[1], value[2], value[3]]);
                xsdr_size =
                    u16::try_from(value).map_err(|_| SizeError::SizeHighBits { value })?;
                out.append_slice(&xsdr_size.to_be_bytes())?;
                log::trace!("XSDRSIZE set to {} bits", xsdr_size);
            }
            Opcode::XSDRB | Opcode::XSDRC | Opcode::XSDRE => {
                out.append_byte(opcode.to_byte())?;
                scratch.reverse_copy(reader, bits_to_bytes(xsdr_size as u32), out, swap)?;
            }
            Opcode::XSTATE => {
                out.append_byte(opcode.to_byte())?;
                let value = reader.next_byte()?;
                match TapState::from_byte(value) {
                    Some(state) if state.is_stable_target() => out.append_byte(value)?,
                    _ => return Err(ConvertError::UnsupportedData { opcode, value }),
                }
            }
            Opcode::XENDIR | Opcode::XENDDR => {
                let value = reader.next_byte()?;
                if value != END_STATE_IDLE {
                    return Err(ConvertError::UnsupportedData { opcode, value });
                }
            }
            Opcode::XSDR
            | Opcode::XSETSDRMASKS
            | Opcode::XSDRINC
            | Opcode::XSDRTDOB
            | Opcode::XSDRTDOC
            | Opcode::XSDRTDOE
            | Opcode::XSIR2
            | Opcode::XCOMMENT
            | Opcode::XWAIT => {
                return Err(ConvertError::UnsupportedCommand {
                    opcode: byte,
                    offset,
                });
            }
        }
    }

    if reader.remaining() > 0 {
        log::debug!(
            "Ignoring {} bytes after XCOMPLETE at offset {}",
            reader.remaining(),
            reader.position()
        );
    }
    log::debug!(
        "Swapped {} XSVF bytes into {} bytes, max buffer size {}",
        reader.position(),
        out.len(),
        max_buffer_size
    );
    Ok(max_buffer_size)
}

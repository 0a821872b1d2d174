//! Second conversion stage: zero-run compression of the swapped command stream.
//!
//! The body is written as
//!
//! ```text
//! [header][chunkLen][chunk bytes][runLen][chunkLen][chunk bytes][runLen]...
//! ```
//!
//! A chunk holds literal bytes, a run stands for that many zero bytes. Zero runs of up to
//! [`RUN_THRESHOLD`] bytes are kept inside the surrounding chunk. Lengths below 256 take
//! one byte, longer ones are written as a zero marker followed by a big-endian `u16`.
use crate::{
    error::{ConvertError, SizeError},
    sink::ByteSink,
};

/// Header byte of every CSVF body. No flags are defined yet.
pub const CSVF_HEADER: u8 = 0x00;

/// Zero runs must be longer than this to be taken out of a chunk.
pub const RUN_THRESHOLD: usize = 8;

const LONG_LENGTH_MARKER: u8 = 0x00;

/// A chunk of literal bytes followed by `run` zero bytes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Segment<'a> {
    pub chunk: &'a [u8],
    pub run: usize,
}

/// Iterator over the chunk/run decomposition of a byte stream.
#[derive(Clone, Debug)]
pub struct Segments<'a> {
    data: &'a [u8],
    chunk_start: usize,
    run_start: usize,
}

/// Splits `data` into the segments the compressor writes.
pub fn segments(data: &[u8]) -> Segments<'_> {
    Segments {
        data,
        chunk_start: 0,
        run_start: 0,
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        let end = self.data.len();
        while self.run_start < end {
            let zeros_start = self.data[self.run_start..]
                .iter()
                .position(|byte| *byte == 0)
                .map_or(end, |i| self.run_start + i);
            let zeros_end = self.data[zeros_start..]
                .iter()
                .position(|byte| *byte != 0)
                .map_or(end, |i| zeros_start + i);
            self.run_start = zeros_end;

            let run = zeros_end - zeros_start;
            if run > RUN_THRESHOLD || zeros_end == end {
                let chunk = &self.data[self.chunk_start..zeros_start];
                self.chunk_start = zeros_end;
                return Some(Segment { chunk, run });
            }
        }
        None
    }
}

fn write_length(out: &mut impl ByteSink, len: usize) -> Result<(), ConvertError> {
    if len < 256 {
        out.append_byte(len as u8)?;
    } else {
        let len = u16::try_from(len).map_err(|_| SizeError::LengthOverflow { got: len })?;
        out.append_byte(LONG_LENGTH_MARKER)?;
        out.append_slice(&len.to_be_bytes())?;
    }
    Ok(())
}

/// Compresses `data` into a CSVF body, header byte included.
pub fn compress(data: &[u8], out: &mut impl ByteSink) -> Result<(), ConvertError> {
    out.append_byte(CSVF_HEADER)?;
    let mut count = 0;
    for segment in segments(data) {
        write_length(out, segment.chunk.len())?;
        out.append_slice(segment.chunk)?;
        write_length(out, segment.run)?;
        count += 1;
    }
    log::debug!(
        "Compressed {} bytes into {} segments, {} bytes",
        data.len(),
        count,
        out.len()
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{RUN_THRESHOLD, Segment, compress, segments};
    use crate::error::{ConvertError, ErrorKind, SizeError};

    fn compressed(data: &[u8]) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        compress(data, &mut out).unwrap();
        out
    }

    fn rebuild(data: &[u8]) -> Vec<u8> {
        let mut rebuilt = Vec::new();
        for segment in segments(data) {
            rebuilt.extend_from_slice(segment.chunk);
            rebuilt.extend(std::iter::repeat_n(0, segment.run));
        }
        rebuilt
    }

    #[test]
    fn empty_input_is_only_header() {
        assert_eq!(compressed(&[]), vec![0x00]);
    }

    #[test]
    fn trailing_literal_gets_empty_run() {
        assert_eq!(compressed(&[0x12, 0x34]), vec![0x00, 0x02, 0x12, 0x34, 0x00]);
    }

    #[test]
    fn run_at_end_closes_chunk() {
        assert_eq!(compressed(&[0x12, 0x00]), vec![0x00, 0x01, 0x12, 0x01]);
    }

    #[test]
    fn eight_zeros_stay_in_chunk() {
        let mut data = vec![0xAB];
        data.extend([0; RUN_THRESHOLD]);
        data.push(0xCD);
        let segs: Vec<Segment> = segments(&data).collect();
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].chunk, &data[..]);
        assert_eq!(segs[0].run, 0);
    }

    #[test]
    fn nine_zeros_break_chunk() {
        let mut data = vec![0xAB];
        data.extend([0; RUN_THRESHOLD + 1]);
        data.push(0xCD);
        assert_eq!(
            compressed(&data),
            vec![0x00, 0x01, 0xAB, 0x09, 0x01, 0xCD, 0x00]
        );
    }

    #[test]
    fn short_runs_accumulate_into_one_chunk() {
        let data = [1, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 3, 0, 4, 0, 0, 0];
        let segs: Vec<Segment> = segments(&data).collect();
        assert_eq!(
            segs,
            vec![Segment {
                chunk: &data[..15],
                run: 3
            }]
        );
    }

    #[test]
    fn leading_long_run_has_empty_chunk() {
        let mut data = vec![0; 10];
        data.push(0x07);
        let segs: Vec<Segment> = segments(&data).collect();
        assert_eq!(
            segs,
            vec![
                Segment { chunk: &[], run: 10 },
                Segment {
                    chunk: &[0x07],
                    run: 0
                }
            ]
        );
    }

    #[test]
    fn length_prefix_boundary() {
        let chunk_255 = vec![0x5A; 255];
        let out = compressed(&chunk_255);
        assert_eq!(out[1], 0xFF);
        assert_eq!(out.len(), 1 + 1 + 255 + 1);

        let chunk_256 = vec![0x5A; 256];
        let out = compressed(&chunk_256);
        assert_eq!(&out[1..4], &[0x00, 0x01, 0x00]);
        assert_eq!(out.len(), 1 + 3 + 256 + 1);

        let mut run_256 = vec![0x01];
        run_256.extend([0; 256]);
        let out = compressed(&run_256);
        assert_eq!(out, vec![0x00, 0x01, 0x01, 0x00, 0x01, 0x00]);

        let mut run_255 = vec![0x01];
        run_255.extend([0; 255]);
        assert_eq!(compressed(&run_255), vec![0x00, 0x01, 0x01, 0xFF]);
    }

    #[test]
    fn length_beyond_16_bits() {
        let data = vec![0x01; 0x1_0000];
        let mut out: Vec<u8> = Vec::new();
        match compress(&data, &mut out) {
            Err(ConvertError::UnsupportedSize(SizeError::LengthOverflow { got })) => {
                assert_eq!(got, 0x1_0000)
            }
            other => panic!("expected LengthOverflow, got {:?}", other),
        }
        assert_eq!(
            compress(&[0; 0x1_0001], &mut Vec::<u8>::new())
                .unwrap_err()
                .kind(),
            ErrorKind::UnsupportedSize
        );
    }

    #[test]
    fn segments_rebuild_input() {
        let inputs: [&[u8]; 6] = [
            &[],
            &[0x00],
            &[0x08, 0x00, 0x20, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x00],
            &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0],
            &[9, 0, 0, 0, 0, 0, 0, 0, 0, 9, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            &[1, 2, 3, 4],
        ];
        for input in inputs {
            assert_eq!(rebuild(input), input);
        }
    }
}

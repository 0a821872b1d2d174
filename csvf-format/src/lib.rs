//! # CSVF Format Library
//!
//! This crate converts JTAG programs in Xilinx's XSVF format into CSVF ("Compressed Serial
//! Vector Format"), a representation that a microcontroller with very little RAM can play
//! into a JTAG chain by reading it strictly forwards.
//!
//! ## Overview
//!
//! XSVF stores every bit-sequence big-endian. To shift such a sequence into a device, a
//! player has to seek to its end and walk backwards, which requires buffering the whole
//! sequence. The conversion happens in two stages:
//!
//! 1. **Swap** ([`swap`]): the XSVF command stream is parsed once. Every bit-sequence is
//!    written in reverse byte order, XREPEAT/XENDIR/XENDDR are dropped and the largest
//!    compare operand is recorded as the player's required buffer size.
//! 2. **Compress** ([`compress`]): the swapped stream is split into chunks of literal
//!    bytes and runs of zeros. Long zero padding dominates typical programs, so this
//!    shrinks them considerably.
//!
//! ## Supported Commands
//!
//! XCOMPLETE, XTDOMASK, XSIR, XRUNTEST, XREPEAT, XSDRSIZE, XSDRTDO, XSDRB, XSDRC, XSDRE,
//! XSTATE (Test-Logic-Reset and Run-Test/Idle only), XENDIR and XENDDR (Run-Test/Idle only).
//! Any other command aborts the conversion.
//!
//! ## Basic Usage
//!
//! ```
//! use csvf_format::{Config, convert_bytes};
//!
//! let xsvf = [
//!     0x08, 0x00, 0x00, 0x00, 0x10, // XSDRSIZE 16
//!     0x01, 0x12, 0x34, // XTDOMASK
//!     0x00, // XCOMPLETE
//! ];
//! let conversion = convert_bytes(&xsvf, &Config::default()).expect("program is supported");
//! assert_eq!(conversion.max_buffer_size, 2);
//! assert_eq!(
//!     conversion.csvf,
//!     [0x00, 0x06, 0x08, 0x00, 0x10, 0x01, 0x34, 0x12, 0x01]
//! );
//! ```
//!
//! ### Reading a CSVF Body
//!
//! ```
//! use csvf_format::expand;
//!
//! let swapped = expand(&[0x00, 0x02, 0x12, 0x01, 0x0A]).expect("body is well-formed");
//! assert_eq!(swapped, [0x12, 0x01, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
//! ```
//!
//! ## CSVF Format
//!
//! `[header][chunkLen][chunk bytes][runLen][chunkLen][chunk bytes][runLen]...`
//!
//! - **header**: one byte, currently always `0x00`
//! - **chunkLen**/**runLen**: one byte if below 256, otherwise `0x00` followed by a
//!   big-endian `u16`
//!
//! The body carries no terminator; its length has to be transported alongside it.
//!
//! ## Error Handling
//!
//! Conversions fail with a [`error::ConvertError`]; [`error::ConvertError::kind`] reduces
//! it to a flat [`error::ErrorKind`]. Messages are only rendered when the error is formatted.
//!
//! ## Features
//!
//! - `tokio`: [`codec::CsvfDecoder`], a `tokio_util` decoder that expands CSVF bodies
//!   as they arrive.
//!
//! ## Logging
//!
//! Progress is reported through the `log` crate at debug and trace level.

#[cfg(feature = "tokio")]
pub mod codec;
pub mod compress;
pub mod convert;
pub mod error;
pub mod expand;
pub mod reader;
pub mod sink;
pub mod swap;
pub mod xsvf;

pub use convert::{Config, Conversion, convert_bytes, convert_file, convert_into};
pub use expand::expand;

//! A canonical Huffman codec for the header-name and header-value strings
//! carried inside an HPACK-family header block.
//!
//! This crate only knows about the fixed, compile-time alphabet defined by
//! the HPACK specification (Appendix B): 256 byte values plus an
//! end-of-string symbol used solely to pad a coded string out to a byte
//! boundary. It has no notion of header fields, indexing tables, or wire
//! opcodes -- those live in `draft-hpack`, which uses this crate purely as a
//! string transform.

pub mod decoder;
pub mod encoder;
pub mod table;

pub use decoder::{decode, DecoderError};
pub use encoder::{encode, encoded_len};

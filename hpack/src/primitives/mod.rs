//! Low-level wire primitives shared by the encoder and the decoder: the
//! N-bit prefix integer codec (`§4.1`) and the length-prefixed, optionally
//! Huffman-coded string codec built on top of it (`§4.2`).

mod integer;
mod string;

pub use integer::*;
pub use string::*;

use std::{error, fmt};

/// Errors a primitive decode can raise. These map onto the decoder's own
/// error kinds (`§7`): `TruncatedInput` is recoverable (the caller may be
/// waiting on a CONTINUATION frame), the rest are connection-fatal.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PrimitiveError {
    /// Not enough bytes were available to complete the primitive.
    TruncatedInput,
    /// An integer's continuation sequence exceeded [`integer::MAX_INT_SIZE`].
    MalformedInteger,
    /// A Huffman-coded string payload did not decode to a valid sequence.
    InvalidHuffmanCode,
}

impl fmt::Display for PrimitiveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::TruncatedInput => write!(f, "not enough bytes to decode primitive"),
            Self::MalformedInteger => write!(f, "integer continuation sequence too long"),
            Self::InvalidHuffmanCode => write!(f, "invalid Huffman-coded string"),
        }
    }
}

impl error::Error for PrimitiveError {}

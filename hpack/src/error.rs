//! Error types for the decoder and encoder (`§7`).
//!
//! Every [`DecoderError`] variant except [`DecoderError::Poisoned`] itself
//! raises `COMPRESSION_ERROR` on the connection and permanently poisons the
//! context it was raised on: the spec is explicit that the codec "MUST NOT
//! be reused after raising it," so [`crate::decoder::Decoder`] latches the
//! first such error and returns [`DecoderError::Poisoned`] on every call
//! after that, rather than silently resuming from undefined state.
//!
//! A short mid-representation read is NOT one of these errors -- it is
//! reported by `decode` returning a consumed count smaller than the input
//! length, per `§4.4` and `§7`'s `TruncatedInput` kind, which the host may
//! treat as "wait for a CONTINUATION frame" rather than fatal.

use std::{error, fmt, io};

use crate::primitives::PrimitiveError;

/// Errors that can be raised while decoding a header block.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DecoderError {
    /// An integer's continuation sequence was too long (`§7`).
    MalformedInteger,
    /// Index `0`, or an index past `|D| + |S|`, was used by an indexed
    /// representation (`§7`).
    InvalidIndex,
    /// The first byte of a representation matched no known opcode (`§7`).
    UnknownOpcode,
    /// A Huffman-coded string payload did not decode to a valid sequence.
    InvalidHuffmanCode,
    /// A peer tried to raise `max_ht_size` above the negotiated
    /// `SETTINGS_HEADER_TABLE_SIZE` (`§7`).
    OversizedTableUpdate,
    /// This context already raised `COMPRESSION_ERROR` once and MUST NOT be
    /// decoded with again.
    Poisoned,
}

impl DecoderError {
    pub(crate) fn from_primitive(err: PrimitiveError) -> Option<Self> {
        match err {
            PrimitiveError::TruncatedInput => None, // handled by the caller, not an Err
            PrimitiveError::MalformedInteger => Some(Self::MalformedInteger),
            PrimitiveError::InvalidHuffmanCode => Some(Self::InvalidHuffmanCode),
        }
    }
}

impl fmt::Display for DecoderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MalformedInteger => write!(f, "integer continuation sequence too long"),
            Self::InvalidIndex => write!(f, "header index out of range"),
            Self::UnknownOpcode => write!(f, "unrecognised representation opcode"),
            Self::InvalidHuffmanCode => write!(f, "invalid Huffman-coded string"),
            Self::OversizedTableUpdate => {
                write!(f, "dynamic table size update exceeds negotiated settings")
            }
            Self::Poisoned => write!(f, "decoder already raised a compression error"),
        }
    }
}

impl error::Error for DecoderError {}

/// Errors that can be raised while encoding a header block.
#[derive(Debug)]
pub enum EncoderError {
    /// The low-level `encode_indexed*` calls were given an index with no
    /// corresponding entry in the table.
    InvalidIndex,
    /// The destination `Write` failed.
    Io(io::Error),
}

impl From<io::Error> for EncoderError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl fmt::Display for EncoderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidIndex => write!(f, "header index out of range"),
            Self::Io(err) => write!(f, "write error: {err}"),
        }
    }
}

impl error::Error for EncoderError {}

//! An implementation of an early-draft HPACK header compression codec.
//!
//! This targets the pre-[RFC 7541] draft that still carries a *reference
//! set*: a decoder/encoder-shared overlay tracking which dynamic-table
//! entries the peer already considers "present" in the current header
//! block, toggled by the indexed-header representation rather than
//! re-sent every time. It is NOT wire-compatible with RFC 7541 endpoints --
//! in particular the `0x30` reference-set-emptying opcode and the
//! table-size-update opcode's bit layout both differ.
//!
//! [RFC 7541]: https://tools.ietf.org/html/rfc7541

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod primitives;
pub mod static_table;
pub mod table;

pub use decoder::{Decoder, DecoderError};
pub use encoder::{Encoder, EncoderError, EncoderInput};
pub use table::Table;

// The host-facing contract (`§6`) -- `new_context`, `decode`, `encode`,
// `resize_local` -- is realised as `Decoder::new`/`Decoder::decode` and
// `Encoder::new`/`Encoder::headers_encode` rather than free functions: a
// context is never shared between the two directions, so each struct is
// its own context type, matching `§3`'s "mutated exclusively by the
// decoder ... or encoder ... never concurrently from both."

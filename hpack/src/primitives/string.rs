//! Length-prefixed byte-string codec (`§4.2`), built on the integer codec.
//!
//! A coded string is a 7-bit prefix integer length, whose top flag bit
//! signals whether the payload that follows is Huffman-coded, followed by
//! that many bytes of payload.

use std::io::Write;

use draft_huffman as huffman;

use super::integer::{decode_integer, encode_integer};
use super::PrimitiveError;

const HUFFMAN_FLAG: u8 = 0x80;

/// Encodes `bytes` as an HPACK string, choosing whichever of the literal or
/// Huffman-coded representation is shorter. Ties prefer the literal form.
pub fn encode_string<W: Write>(bytes: &[u8], mut dst: W) -> std::io::Result<()> {
    let huffman_len = huffman::encoded_len(bytes);

    if huffman_len < bytes.len() {
        let mut prefix = Vec::new();
        encode_integer(huffman_len as u32, 7, &mut prefix)?;
        prefix[0] |= HUFFMAN_FLAG;
        dst.write_all(&prefix)?;
        let mut payload = Vec::new();
        huffman::encode(bytes, &mut payload);
        dst.write_all(&payload)
    } else {
        let mut prefix = Vec::new();
        encode_integer(bytes.len() as u32, 7, &mut prefix)?;
        dst.write_all(&prefix)?;
        dst.write_all(bytes)
    }
}

/// Decodes an HPACK string starting at `buf[0]`. Returns `(consumed, bytes)`.
pub fn decode_string(buf: &[u8]) -> Result<(usize, Vec<u8>), PrimitiveError> {
    let is_huffman = buf.first().map(|b| b & HUFFMAN_FLAG != 0).unwrap_or(false);
    let (len_size, len) = decode_integer(buf, 7)?;
    let len = len as usize;

    let payload = buf
        .get(len_size..len_size + len)
        .ok_or(PrimitiveError::TruncatedInput)?;

    let bytes = if is_huffman {
        let mut dst = Vec::with_capacity(len * 2);
        huffman::decode(payload, &mut dst).map_err(|_| PrimitiveError::InvalidHuffmanCode)?;
        dst
    } else {
        payload.to_vec()
    };

    Ok((len_size + len, bytes))
}

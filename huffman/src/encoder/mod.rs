//! Provides an implementation of the canonical Huffman encoder.
//!
//! Encoding packs each input byte's canonical code, MSB first, into the
//! output bit stream, then pads the final partial byte with the leading bits
//! of the EOS code (an unbroken run of ones) so the receiver can tell real
//! content from padding.

use crate::table::ENCODE_TABLE;

/// Encodes `src` into `dst` using the canonical Huffman code table.
///
/// **Example:**
///
/// ```rust
/// use draft_huffman::encoder::encode;
///
/// let mut dst = Vec::new();
/// encode(b"a", &mut dst);
/// assert_eq!(dst, vec![0x1f]);
/// ```
pub fn encode(src: &[u8], dst: &mut Vec<u8>) {
    let mut buf: u64 = 0;
    let mut bits: u32 = 0;

    for &byte in src {
        let (length, code) = ENCODE_TABLE[byte as usize];
        buf = (buf << length) | code as u64;
        bits += length as u32;

        while bits >= 8 {
            bits -= 8;
            dst.push((buf >> bits) as u8);
        }
    }

    if bits > 0 {
        let pad = 8 - bits;
        buf = (buf << pad) | ((1u64 << pad) - 1); // pad with EOS-prefix ones
        dst.push(buf as u8);
    }
}

/// Returns the length in bytes that [`encode`] would produce for `src`,
/// without doing the encoding. Used by the string codec to pick between the
/// Huffman and literal representations.
pub fn encoded_len(src: &[u8]) -> usize {
    let bits: usize = src
        .iter()
        .map(|&byte| ENCODE_TABLE[byte as usize].0 as usize)
        .sum();
    (bits + 7) / 8
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encodes_single_character() {
        let mut dst = Vec::new();
        encode(b"a", &mut dst);
        assert_eq!(dst, vec![0x1f]);
    }

    #[test]
    fn encodes_known_literal() {
        let mut dst = Vec::new();
        encode(b":method", &mut dst);
        assert_eq!(dst, vec![185, 73, 83, 57, 228]);
    }

    #[test]
    fn round_trips_through_decoder() {
        let inputs: &[&[u8]] = &[b"", b"a", b"GET", b":method", b"x-custom-header-name"];
        for input in inputs {
            let mut encoded = Vec::new();
            encode(input, &mut encoded);
            assert_eq!(encoded.len(), encoded_len(input));

            let mut decoded = Vec::new();
            crate::decoder::decode(&encoded, &mut decoded).unwrap();
            assert_eq!(&decoded, input);
        }
    }
}

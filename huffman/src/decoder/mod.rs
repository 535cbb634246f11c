//! Provides an implementation of the [canonical Huffman] decoder.
//!
//! When an entity receives a header for which it determines that it contains
//! content encoded with the [canonical Huffman] algorithm, it has to decode
//! this content in the shortest possible time with as few resources as
//! possible. The execution speed of this "simple" task will contribute
//! significantly to the response time, and this time must be as short as
//! possible.
//!
//! Reading and decoding a sequence bit by bit is not the fastest possible
//! approach -- flattening the tree into wide transition tables and reading
//! several bits at a time decodes faster still. This codec takes the simpler
//! route instead: a bit-at-a-time walk over a tree built once from
//! [`crate::table::ENCODE_TABLE`]. For header-name and header-value strings,
//! which rarely run past a few dozen bytes, the difference is immaterial and
//! the tree needs no generated transition tables to keep in sync with the
//! canonical code table.
//!
//! [canonical Huffman]: https://en.wikipedia.org/wiki/Canonical_Huffman_code

mod error;
mod reader;
mod tree;

pub use error::*;
pub use reader::*;

/// Decodes a Huffman-coded `src` sequence into `dst`.
///
/// **Example:**
///
/// ```rust
/// use draft_huffman::decoder::decode;
///
/// let mut dst = Vec::new();
/// let src = vec![0x1f]; // "a"
/// decode(&src, &mut dst).unwrap();
/// assert_eq!(dst, b"a");
/// ```
pub fn decode(src: &[u8], dst: &mut Vec<u8>) -> Result<(), DecoderError> {
    let mut reader = DecodeReader::new();

    for byte in src {
        reader.decode(*byte, dst)?;
    }
    reader.finalize(dst)?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn decode(bytes: &[u8]) -> Result<Vec<u8>, DecoderError> {
        let mut dst = Vec::new();
        super::decode(bytes, &mut dst)?;
        Ok(dst)
    }

    /// Should decode a single 5-bit character padded out to a byte boundary
    /// with EOS-prefix ones.
    #[test]
    fn decodes_single_character() {
        assert_eq!(decode(&[0x1f]).unwrap(), b"a");
    }

    /// Worked example straight from the HPACK Huffman appendix.
    #[test]
    fn decodes_known_literal() {
        let code = vec![185, 73, 83, 57, 228];
        assert_eq!(decode(&code).unwrap(), b":method");
    }

    #[test]
    fn decodes_longer_literal() {
        let code = vec![197, 131, 127];
        assert_eq!(decode(&code).unwrap(), b"GET");
    }

    /// Padding that is not a run of one-bits means a symbol was truncated.
    #[test]
    fn rejects_non_one_padding() {
        // 'a' (00011) followed by three zero bits instead of EOS-prefix ones.
        let bad = vec![0b0001_1000];
        assert_eq!(decode(&bad), Err(DecoderError::InvalidInput));
    }

    /// More than 7 trailing one-bits without completing the 30-bit EOS code
    /// means an entire extra byte of padding snuck in.
    #[test]
    fn rejects_oversized_padding() {
        let bad = vec![0xff, 0xff];
        assert_eq!(decode(&bad), Err(DecoderError::InvalidInput));
    }

    /// A byte sequence with no valid decoding at all (malformed prefix).
    #[test]
    fn rejects_truncated_stream() {
        let bad = vec![0, 23, 122];
        assert!(decode(&bad).is_err());
    }
}

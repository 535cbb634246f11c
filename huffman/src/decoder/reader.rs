use super::error::DecoderError;
use super::tree::{root, Node, EOS_SYMBOL};

/// Incremental Huffman decoder: feed it one source byte at a time and it
/// appends completed symbols to `dst`.
///
/// Kept as a standalone type (rather than a single `decode` function) so the
/// string codec can decode a length-delimited Huffman payload without first
/// copying it into its own buffer.
pub struct DecodeReader {
    node: &'static Node,
    /// Bits consumed since the last completed symbol (i.e. since the walk
    /// last returned to the tree root).
    pending_len: u8,
    /// Whether every bit consumed since the last completed symbol was `1`.
    /// The EOS codepoint is 30 ones, so any valid trailing padding is a
    /// prefix of it -- checking "all ones so far" is equivalent to checking
    /// "still a valid EOS prefix" without re-walking the tree.
    pending_all_ones: bool,
}

impl DecodeReader {
    pub fn new() -> Self {
        Self {
            node: root(),
            pending_len: 0,
            pending_all_ones: true,
        }
    }

    /// Feeds one more source byte into the decoder.
    pub fn decode(&mut self, byte: u8, dst: &mut Vec<u8>) -> Result<(), DecoderError> {
        for i in (0..8).rev() {
            let bit = (byte >> i) & 1;
            let child = &self.node.children[bit as usize];
            self.node = child.as_deref().ok_or(DecoderError::InvalidInput)?;
            self.pending_len += 1;
            self.pending_all_ones = self.pending_all_ones && bit == 1;

            if let Some(symbol) = self.node.symbol {
                if symbol == EOS_SYMBOL {
                    return Err(DecoderError::InvalidInput); // EOS must never be emitted
                }
                dst.push(symbol as u8);
                self.node = root();
                self.pending_len = 0;
                self.pending_all_ones = true;
            }
        }
        Ok(())
    }

    /// Called once after the last source byte to validate trailing padding.
    pub fn finalize(self, _dst: &mut Vec<u8>) -> Result<(), DecoderError> {
        if self.pending_len == 0 {
            return Ok(());
        }
        if self.pending_len > 7 || !self.pending_all_ones {
            return Err(DecoderError::InvalidInput);
        }
        Ok(())
    }
}

impl Default for DecodeReader {
    fn default() -> Self {
        Self::new()
    }
}

//! Header block decoder (`§4.4`).
//!
//! `Decoder` owns one direction's codec context: the combined static+dynamic
//! [`Table`] and the transient `emitted` output list a caller drains after a
//! complete header block has been fed in. Once any representation raises a
//! connection-fatal error the context latches [`DecoderError::Poisoned`] and
//! refuses to decode anything further, matching `§7`'s "MUST NOT be reused"
//! rule.

pub use crate::error::DecoderError;

use crate::primitives::{decode_integer, decode_string, PrimitiveError};
use crate::table::Table;

enum Indexing {
    Incremental,
    None,
    Never,
}

/// One direction's decoding context.
pub struct Decoder {
    table: Table,
    /// The peer-advertised `SETTINGS_HEADER_TABLE_SIZE` a table-size update
    /// is validated against (`§6`, `§7`).
    negotiated_max_size: u32,
    poisoned: bool,
    /// Decoded headers accumulated by the most recent `decode` call(s), in
    /// wire order. The host drains this at the end of a complete header
    /// block.
    pub emitted: Vec<(Vec<u8>, Vec<u8>)>,
}

impl Decoder {
    pub fn new(initial_max_size: u32) -> Self {
        Self {
            table: Table::new(initial_max_size),
            negotiated_max_size: initial_max_size,
            poisoned: false,
            emitted: Vec::new(),
        }
    }

    /// Applies a local `SETTINGS_HEADER_TABLE_SIZE` change (`§6`): lowers the
    /// bound a peer's table-size update may request, and shrinks the table
    /// immediately if it is currently over the new bound.
    pub fn resize_local(&mut self, new_max: u32) {
        self.negotiated_max_size = new_max;
        if self.table.max_dynamic_size() > new_max {
            self.table.resize(new_max);
        }
    }

    /// Drains and returns everything decoded so far.
    pub fn drain_emitted(&mut self) -> Vec<(Vec<u8>, Vec<u8>)> {
        std::mem::take(&mut self.emitted)
    }

    /// Consumes as much of `buf` as holds complete representations, appending
    /// decoded pairs to `self.emitted`. Returns the number of bytes consumed,
    /// which is less than `buf.len()` iff the tail holds a truncated
    /// representation (`§4.4`, `§7`) -- not an error, since the remainder may
    /// arrive in a later CONTINUATION frame.
    pub fn decode(&mut self, buf: &[u8]) -> Result<usize, DecoderError> {
        if self.poisoned {
            return Err(DecoderError::Poisoned);
        }

        let mut offset = 0;
        while offset < buf.len() {
            match self.decode_one(&buf[offset..]) {
                Ok(Some(consumed)) => offset += consumed,
                Ok(None) => break,
                Err(err) => {
                    self.poisoned = true;
                    return Err(err);
                }
            }
        }
        Ok(offset)
    }

    /// Decodes a single representation from the front of `buf`.
    ///
    /// `Ok(None)` means `buf` holds fewer bytes than the representation
    /// needs; the caller stops there and leaves the context unchanged.
    fn decode_one(&mut self, buf: &[u8]) -> Result<Option<usize>, DecoderError> {
        let f = match buf.first() {
            Some(&b) => b,
            None => return Ok(None),
        };

        if f & 0x80 != 0 {
            return self.decode_indexed(buf);
        }
        if f == 0x40 {
            return self.decode_literal_new_name(buf, Indexing::Incremental);
        }
        if f == 0x00 {
            return self.decode_literal_new_name(buf, Indexing::None);
        }
        if f == 0x10 {
            return self.decode_literal_new_name(buf, Indexing::Never);
        }
        if f & 0xc0 == 0x40 {
            return self.decode_literal_indexed_name(buf, 6, Indexing::Incremental);
        }
        if f & 0xf0 == 0x00 {
            return self.decode_literal_indexed_name(buf, 4, Indexing::None);
        }
        if f & 0xf0 == 0x10 {
            return self.decode_literal_indexed_name(buf, 4, Indexing::Never);
        }
        if f == 0x30 {
            self.table.clear_references();
            return Ok(Some(1));
        }
        if f & 0xf0 == 0x20 {
            return self.decode_table_size_update(buf);
        }
        Err(DecoderError::UnknownOpcode)
    }

    fn decode_indexed(&mut self, buf: &[u8]) -> Result<Option<usize>, DecoderError> {
        let (consumed, index) = match decode_integer(buf, 7) {
            Ok(v) => v,
            Err(PrimitiveError::TruncatedInput) => return Ok(None),
            Err(err) => return Err(DecoderError::from_primitive(err).unwrap()),
        };

        if index == 0 || index as usize > self.table.len() {
            return Err(DecoderError::InvalidIndex);
        }

        if self.table.is_dynamic_index(index) {
            match self.table.toggle_reference(index) {
                Some(true) => {
                    let (name, value) = self.table.get(index).unwrap();
                    self.emitted.push((name.to_vec(), value.to_vec()));
                }
                Some(false) => {}
                None => unreachable!("is_dynamic_index already confirmed a live entry"),
            }
        } else {
            // A static-table reference carries incremental indexing in this
            // draft: the source unconditionally adds it to D, a deliberately
            // preserved ambiguity (`§9`).
            let (name, value) = self.table.get(index).unwrap();
            let name = name.to_vec();
            let value = value.to_vec();
            self.emitted.push((name.clone(), value.clone()));
            self.table.add(name, value);
            self.table.reference_last();
        }

        Ok(Some(consumed))
    }

    fn decode_literal_new_name(
        &mut self,
        buf: &[u8],
        indexing: Indexing,
    ) -> Result<Option<usize>, DecoderError> {
        let mut offset = 1;

        let (name_consumed, name) = match decode_string(&buf[offset..]) {
            Ok(v) => v,
            Err(PrimitiveError::TruncatedInput) => return Ok(None),
            Err(err) => return Err(DecoderError::from_primitive(err).unwrap()),
        };
        offset += name_consumed;

        let (value_consumed, value) = match decode_string(&buf[offset..]) {
            Ok(v) => v,
            Err(PrimitiveError::TruncatedInput) => return Ok(None),
            Err(err) => return Err(DecoderError::from_primitive(err).unwrap()),
        };
        offset += value_consumed;

        self.emitted.push((name.clone(), value.clone()));
        if matches!(indexing, Indexing::Incremental) {
            self.table.add(name, value);
            self.table.reference_last();
        }
        Ok(Some(offset))
    }

    fn decode_literal_indexed_name(
        &mut self,
        buf: &[u8],
        n: u8,
        indexing: Indexing,
    ) -> Result<Option<usize>, DecoderError> {
        let (mut offset, index) = match decode_integer(buf, n) {
            Ok(v) => v,
            Err(PrimitiveError::TruncatedInput) => return Ok(None),
            Err(err) => return Err(DecoderError::from_primitive(err).unwrap()),
        };

        if index == 0 || index as usize > self.table.len() {
            return Err(DecoderError::InvalidIndex);
        }
        let name = self.table.get(index).unwrap().0.to_vec();

        let (value_consumed, value) = match decode_string(&buf[offset..]) {
            Ok(v) => v,
            Err(PrimitiveError::TruncatedInput) => return Ok(None),
            Err(err) => return Err(DecoderError::from_primitive(err).unwrap()),
        };
        offset += value_consumed;

        self.emitted.push((name.clone(), value.clone()));
        if matches!(indexing, Indexing::Incremental) {
            self.table.add(name, value);
            self.table.reference_last();
        }
        Ok(Some(offset))
    }

    fn decode_table_size_update(&mut self, buf: &[u8]) -> Result<Option<usize>, DecoderError> {
        let (consumed, size) = match decode_integer(buf, 4) {
            Ok(v) => v,
            Err(PrimitiveError::TruncatedInput) => return Ok(None),
            Err(err) => return Err(DecoderError::from_primitive(err).unwrap()),
        };

        if size > self.negotiated_max_size {
            return Err(DecoderError::OversizedTableUpdate);
        }
        self.table.resize(size);
        Ok(Some(consumed))
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(4096)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// S1's sibling at the representation level: a single-byte indexed
    /// header referencing a static entry.
    #[test]
    fn decodes_indexed_static_header() {
        let mut decoder = Decoder::default();
        // index 2 = ":authority" (empty value) in the 61-entry static table.
        let consumed = decoder.decode(&[0x80 | 2]).unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(
            decoder.drain_emitted(),
            vec![(b":authority".to_vec(), b"".to_vec())]
        );
        // The open-question behaviour: this also promoted the entry into D.
        assert_eq!(decoder.table.dynamic_len(), 1);
    }

    /// S3: literal new name, incremental indexing.
    #[test]
    fn decodes_literal_new_name_incremental() {
        let mut decoder = Decoder::default();
        let mut buf = vec![0x40];
        buf.extend(encode_str(b"x-custom"));
        buf.extend(encode_str(b"ab"));

        let consumed = decoder.decode(&buf).unwrap();
        assert_eq!(consumed, buf.len());
        assert_eq!(
            decoder.drain_emitted(),
            vec![(b"x-custom".to_vec(), b"ab".to_vec())]
        );
        assert_eq!(decoder.table.dynamic_len(), 1);
        assert!(decoder.table.is_referenced(1));
    }

    #[test]
    fn decodes_literal_new_name_without_indexing() {
        let mut decoder = Decoder::default();
        let mut buf = vec![0x00];
        buf.extend(encode_str(b"x-custom"));
        buf.extend(encode_str(b"ab"));

        decoder.decode(&buf).unwrap();
        assert_eq!(decoder.table.dynamic_len(), 0);
    }

    /// Toggling an indexed dynamic reference off emits nothing (`§4.4`).
    #[test]
    fn reindexing_a_referenced_entry_emits_nothing() {
        let mut decoder = Decoder::default();
        let mut buf = vec![0x40];
        buf.extend(encode_str(b"x-custom"));
        buf.extend(encode_str(b"ab"));
        decoder.decode(&buf).unwrap();
        decoder.drain_emitted();

        let consumed = decoder.decode(&[0x80 | 1]).unwrap();
        assert_eq!(consumed, 1);
        assert!(decoder.drain_emitted().is_empty());
        assert!(!decoder.table.is_referenced(1));
    }

    /// S6-ish: `0x30` empties the reference set without emitting anything.
    #[test]
    fn reference_set_emptying_opcode_clears_references() {
        let mut decoder = Decoder::default();
        let mut buf = vec![0x40];
        buf.extend(encode_str(b"x-custom"));
        buf.extend(encode_str(b"ab"));
        decoder.decode(&buf).unwrap();
        decoder.drain_emitted();
        assert!(decoder.table.is_referenced(1));

        let consumed = decoder.decode(&[0x30]).unwrap();
        assert_eq!(consumed, 1);
        assert!(decoder.drain_emitted().is_empty());
        assert!(!decoder.table.is_referenced(1));
    }

    #[test]
    fn table_size_update_resizes_and_evicts() {
        let mut decoder = Decoder::new(4096);
        let mut buf = vec![0x40];
        buf.extend(encode_str(b"x-custom"));
        buf.extend(encode_str(b"ab"));
        decoder.decode(&buf).unwrap();
        assert_eq!(decoder.table.dynamic_len(), 1);

        // 0010_0000: opcode nibble 0010, size (4 bits fit directly, here size 0).
        let consumed = decoder.decode(&[0x20]).unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(decoder.table.dynamic_len(), 0);
        assert_eq!(decoder.table.max_dynamic_size(), 0);
    }

    #[test]
    fn table_size_update_above_negotiated_settings_is_fatal() {
        let mut decoder = Decoder::new(100);
        // 4-bit prefix cap is 15; 200 needs continuation bytes.
        let mut buf = Vec::new();
        crate::primitives::encode_integer(200, 4, &mut buf).unwrap();
        buf[0] |= 0x20; // opcode nibble
        let err = decoder.decode(&buf).unwrap_err();
        assert_eq!(err, DecoderError::OversizedTableUpdate);
    }

    /// Once poisoned, a context refuses to decode anything else (`§7`).
    #[test]
    fn context_is_poisoned_after_a_fatal_error() {
        let mut decoder = Decoder::default();
        assert_eq!(
            decoder.decode(&[0x80]).unwrap_err(),
            DecoderError::InvalidIndex
        );
        assert_eq!(decoder.decode(&[0x80 | 2]).unwrap_err(), DecoderError::Poisoned);
    }

    /// Unknown opcode: `0x31` sits next to the carved-out `0x30` exact match
    /// but outside the `0010xxxx` table-size-update family, so no dispatch
    /// branch claims it.
    #[test]
    fn unclaimed_opcode_in_the_reserved_family_is_unknown() {
        let mut decoder = Decoder::default();
        assert_eq!(
            decoder.decode(&[0x31]).unwrap_err(),
            DecoderError::UnknownOpcode
        );
    }

    /// `§4.4`'s truncation contract: a short tail leaves `consumed < len`
    /// and the context untouched, rather than erroring.
    #[test]
    fn truncated_tail_representation_is_not_consumed() {
        let mut decoder = Decoder::default();
        let mut buf = vec![0x40];
        buf.extend(encode_str(b"x-custom"));
        buf.extend(encode_str(b"ab"));
        let complete_len = buf.len();

        // A second representation whose value string promises one byte of
        // payload that never arrives.
        buf.push(0x40);
        buf.extend(encode_str(b"y"));
        buf.push(0x01);

        let consumed = decoder.decode(&buf).unwrap();
        assert_eq!(consumed, complete_len);
        assert_eq!(
            decoder.drain_emitted(),
            vec![(b"x-custom".to_vec(), b"ab".to_vec())]
        );
    }

    fn encode_str(bytes: &[u8]) -> Vec<u8> {
        let mut dst = Vec::new();
        crate::primitives::encode_string(bytes, &mut dst).unwrap();
        dst
    }
}

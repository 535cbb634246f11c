//! Header block encoder (`§4.5`).
//!
//! `Encoder` owns one direction's codec context and exposes the automatic
//! `headers_encode` entry point: given an ordered header list, it coalesces
//! duplicate names, reconciles the reference set against what was already
//! implicitly sent, and for every remaining header picks the cheapest of the
//! five representations in `§4.5`'s fixed preference order.
//!
//! The lower-level `encode_indexed`/`encode_indexed_name`/`encode_literal`
//! methods are also public, for a caller that wants to hand-pick a
//! representation via [`EncoderInput`] rather than go through the automatic
//! picker.

mod input;

pub use input::EncoderInput;

use std::collections::{HashMap, HashSet};
use std::io::Write;

pub use crate::error::EncoderError;
use crate::primitives::{encode_integer, encode_string};
use crate::static_table;
use crate::table::Table;

/// One direction's encoding context.
pub struct Encoder {
    table: Table,
    /// Set by `resize_local`; applied and flushed as a table-size-update
    /// opcode at the front of the next `headers_encode` call.
    pending_resize: Option<u32>,
}

impl Encoder {
    /// Literal header field with incremental indexing (`§4.4`).
    pub const WITH_INDEXING: u8 = 0x4;
    /// Literal header field never indexed (`§4.4`).
    pub const NEVER_INDEXED: u8 = 0x8;

    pub fn new(max_dynamic_size: u32) -> Self {
        Self {
            table: Table::new(max_dynamic_size),
            pending_resize: None,
        }
    }

    pub fn max_dynamic_size(&self) -> u32 {
        self.table.max_dynamic_size()
    }

    /// Encodes a single, hand-picked representation rather than running the
    /// automatic picker, for a caller that already knows which wire form it
    /// wants. Does not touch the dynamic table or reference set on its
    /// own -- pair this with explicit `Table` access if the caller also
    /// wants indexing side effects.
    pub fn encode<'b, F, W>(&self, field: F, mut dst: W) -> Result<(), EncoderError>
    where
        F: Into<EncoderInput<'b>>,
        W: Write,
    {
        match field.into() {
            EncoderInput::Indexed(index) => self.encode_indexed(index, dst),
            EncoderInput::IndexedNameBorrowed(index, value, flags) => {
                self.encode_indexed_name(index, value, flags, dst)
            }
            EncoderInput::IndexedNameOwned(index, value, flags) => {
                self.encode_indexed_name(index, &value, flags, dst)
            }
            EncoderInput::LiteralBorrowed(name, value, flags) => {
                self.encode_literal(name, value, flags, &mut dst)
            }
            EncoderInput::LiteralOwned(name, value, flags) => {
                self.encode_literal(&name, &value, flags, &mut dst)
            }
        }
    }

    /// Applies a local `SETTINGS_HEADER_TABLE_SIZE` change (`§6`). The
    /// corresponding dynamic-table-size-update opcode is flushed at the
    /// front of the byte string the next `headers_encode` call produces,
    /// since the remote decoder must see it before any representation that
    /// depends on the new budget.
    pub fn resize_local(&mut self, new_max: u32) {
        self.pending_resize = Some(new_max);
    }

    /// Encodes an ordered header list end to end: duplicate-name coalescing,
    /// reference-set reconciliation, then per-header representation
    /// selection (`§4.5`).
    pub fn headers_encode(
        &mut self,
        headers: &[(Vec<u8>, Vec<u8>)],
    ) -> Result<Vec<u8>, EncoderError> {
        let mut dst = Vec::new();

        if let Some(new_max) = self.pending_resize.take() {
            self.update_max_dynamic_size(new_max, &mut dst)?;
        }

        let hlist = coalesce(headers);
        let mut by_name: HashMap<&[u8], &[u8]> = HashMap::with_capacity(hlist.len());
        for (name, value) in &hlist {
            by_name.insert(name.as_slice(), value.as_slice());
        }

        let mut exclude: HashSet<Vec<u8>> = HashSet::new();
        let mut diverged = false;
        for (name, value) in self.table.referenced_entries() {
            match by_name.get(name) {
                None => {
                    diverged = true;
                    break;
                }
                Some(&v) if v == value => {
                    exclude.insert(name.to_vec());
                }
                Some(_) => {}
            }
        }
        if diverged {
            dst.write_all(&[0x30])?;
            self.table.clear_references();
            exclude.clear();
        }

        for (name, value) in &hlist {
            if exclude.contains(name.as_slice()) {
                continue;
            }
            self.encode_one(name, value, &mut dst)?;
        }

        Ok(dst)
    }

    /// Picks and emits the cheapest representation for a single header,
    /// following `§4.5`'s five-branch preference order.
    fn encode_one(&mut self, name: &[u8], value: &[u8], dst: &mut Vec<u8>) -> Result<(), EncoderError> {
        if let Some(index) = self.table.find_dynamic_exact(name, value) {
            self.encode_indexed(index, &mut *dst)?;
            self.table.toggle_reference(index);
            return Ok(());
        }

        let static_exact = as_str_pair(name, value).and_then(|pair| static_table::reverse_full().get(&pair).copied());
        let static_name = std::str::from_utf8(name)
            .ok()
            .and_then(|n| static_table::reverse_name().get(n).copied());

        if static_exact.is_none() {
            if let Some(index) = self.table.find_dynamic_name(name) {
                self.encode_indexed_name(index, value, Self::WITH_INDEXING, &mut *dst)?;
                self.table.add(name.to_vec(), value.to_vec());
                self.table.reference_last();
                return Ok(());
            }
        }

        if let Some(index) = static_exact {
            let combined = self.table.dynamic_len() as u32 + index;
            self.encode_indexed(combined, dst)?;
            return Ok(());
        }

        if let Some(index) = static_name {
            let combined = self.table.dynamic_len() as u32 + index;
            self.encode_indexed_name(combined, value, Self::WITH_INDEXING, &mut *dst)?;
            self.table.add(name.to_vec(), value.to_vec());
            self.table.reference_last();
            return Ok(());
        }

        self.encode_literal(name, value, Self::WITH_INDEXING, dst)?;
        self.table.add(name.to_vec(), value.to_vec());
        self.table.reference_last();
        Ok(())
    }

    /// Encodes a header that already lives at `index` in the combined
    /// indexing space.
    ///
    /// ```txt
    ///   0   1   2   3   4   5   6   7
    /// +---+---+---+---+---+---+---+---+
    /// | 1 |        Index (7+)         |
    /// +---+---------------------------+
    /// ```
    pub fn encode_indexed<W: Write>(&self, index: u32, mut dst: W) -> Result<(), EncoderError> {
        if self.table.get(index).is_none() {
            return Err(EncoderError::InvalidIndex);
        }
        let mut tmp = Vec::new();
        encode_integer(index, 7, &mut tmp)?;
        tmp[0] |= 0x80;
        dst.write_all(&tmp)?;
        Ok(())
    }

    /// Encodes a header whose name is resolved from `index` and whose value
    /// is given literally. `flags` selects indexing behaviour the same way
    /// `§4.4`'s opcode table does.
    ///
    /// ```txt
    ///   0   1   2   3   4   5   6   7
    /// +---+---+---+---+---+---+---+---+
    /// | 0 | 1 |      Index (6+)       |   incremental indexing
    /// +---+---+-----------------------+
    /// | 0 | 0 | 0 | 1 |  Index (4+)   |   never indexed
    /// +---+---+-----------------------+
    /// | 0 | 0 | 0 | 0 |  Index (4+)   |   without indexing
    /// +---+---+-----------------------+
    /// | H |     Value Length (7+)     |
    /// +---+---------------------------+
    /// | Value String (Length octets)  |
    /// +-------------------------------+
    /// ```
    pub fn encode_indexed_name<W: Write>(
        &self,
        index: u32,
        value: &[u8],
        flags: u8,
        mut dst: W,
    ) -> Result<(), EncoderError> {
        if self.table.get(index).is_none() {
            return Err(EncoderError::InvalidIndex);
        }

        let mut tmp = Vec::new();
        if flags & Self::WITH_INDEXING == Self::WITH_INDEXING {
            encode_integer(index, 6, &mut tmp)?;
            tmp[0] |= 0x40;
        } else if flags & Self::NEVER_INDEXED == Self::NEVER_INDEXED {
            encode_integer(index, 4, &mut tmp)?;
            tmp[0] |= 0x10;
        } else {
            encode_integer(index, 4, &mut tmp)?;
        }
        dst.write_all(&tmp)?;
        encode_string(value, &mut dst)?;
        Ok(())
    }

    /// Encodes a header whose name and value are both given literally.
    ///
    /// ```txt
    ///   0   1   2   3   4   5   6   7
    /// +---+---+---+---+---+---+---+---+
    /// | 0 | 1 |           0           |   incremental indexing
    /// +---+---+-----------------------+
    /// | 0 | 0 | 0 | 1 |       0       |   never indexed
    /// +---+---+-----------------------+
    /// | 0 | 0 | 0 | 0 |       0       |   without indexing
    /// +---+---+-----------------------+
    /// | H |     Name Length (7+)      |
    /// +---+---------------------------+
    /// |  Name String (Length octets)  |
    /// +---+---------------------------+
    /// | H |     Value Length (7+)     |
    /// +---+---------------------------+
    /// | Value String (Length octets)  |
    /// +-------------------------------+
    /// ```
    pub fn encode_literal<W: Write>(
        &self,
        name: &[u8],
        value: &[u8],
        flags: u8,
        mut dst: W,
    ) -> Result<(), EncoderError> {
        if flags & Self::WITH_INDEXING == Self::WITH_INDEXING {
            dst.write_all(&[0x40])?;
        } else if flags & Self::NEVER_INDEXED == Self::NEVER_INDEXED {
            dst.write_all(&[0x10])?;
        } else {
            dst.write_all(&[0x00])?;
        }
        encode_string(name, &mut dst)?;
        encode_string(value, dst)?;
        Ok(())
    }

    /// Updates the dynamic table's size budget and encodes the wire signal
    /// (`§4.4`'s table-size-update opcode).
    pub fn update_max_dynamic_size<W: Write>(
        &mut self,
        size: u32,
        mut dst: W,
    ) -> Result<(), EncoderError> {
        self.table.resize(size);
        let mut tmp = Vec::new();
        encode_integer(size, 4, &mut tmp)?;
        tmp[0] |= 0x20;
        dst.write_all(&tmp)?;
        Ok(())
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(4096)
    }
}

fn as_str_pair<'a>(name: &'a [u8], value: &'a [u8]) -> Option<(&'a str, &'a str)> {
    Some((std::str::from_utf8(name).ok()?, std::str::from_utf8(value).ok()?))
}

/// Lowercases names and merges repeated ones with a NUL separator,
/// preserving the insertion order of each name's first occurrence (`§4.5`).
fn coalesce(headers: &[(Vec<u8>, Vec<u8>)]) -> Vec<(Vec<u8>, Vec<u8>)> {
    let mut order: Vec<Vec<u8>> = Vec::new();
    let mut values: HashMap<Vec<u8>, Vec<u8>> = HashMap::new();

    for (name, value) in headers {
        let name = name.to_ascii_lowercase();
        match values.get_mut(&name) {
            Some(existing) => {
                existing.push(0);
                existing.extend_from_slice(value);
            }
            None => {
                order.push(name.clone());
                values.insert(name, value.clone());
            }
        }
    }

    order
        .into_iter()
        .map(|name| {
            let value = values.remove(&name).unwrap();
            (name, value)
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    /// S2: an exact static match encodes as a single indexed byte and
    /// leaves the dynamic table untouched.
    #[test]
    fn encodes_static_exact_match_as_indexed() {
        let mut encoder = Encoder::default();
        let out = encoder
            .headers_encode(&[(b":method".to_vec(), b"GET".to_vec())])
            .unwrap();
        assert_eq!(out, vec![0x80 | 2]);
        assert_eq!(encoder.table.dynamic_len(), 0);
    }

    /// S3: a name with no static match at all becomes a new-name literal,
    /// added to D and R.
    #[test]
    fn encodes_unknown_name_as_literal_new_name() {
        let mut encoder = Encoder::default();
        let out = encoder
            .headers_encode(&[(b"x-custom".to_vec(), b"ab".to_vec())])
            .unwrap();
        assert_eq!(out[0], 0x40);
        assert_eq!(encoder.table.dynamic_len(), 1);
        assert!(encoder.table.is_referenced(1));
    }

    /// S4: re-encoding the same pair that's already in R produces nothing.
    #[test]
    fn reference_set_reuse_emits_nothing() {
        let mut encoder = Encoder::default();
        encoder
            .headers_encode(&[(b"x-custom".to_vec(), b"ab".to_vec())])
            .unwrap();
        let out = encoder
            .headers_encode(&[(b"x-custom".to_vec(), b"ab".to_vec())])
            .unwrap();
        assert!(out.is_empty());
    }

    /// S5: a second, unrelated header alongside an already-referenced one
    /// only emits the new one.
    #[test]
    fn reference_set_exclusion_only_emits_new_header() {
        let mut encoder = Encoder::default();
        encoder
            .headers_encode(&[(b"x-custom".to_vec(), b"ab".to_vec())])
            .unwrap();
        let out = encoder
            .headers_encode(&[
                (b"x-custom".to_vec(), b"ab".to_vec()),
                (b"x-other".to_vec(), b"z".to_vec()),
            ])
            .unwrap();
        assert_eq!(out[0], 0x40); // x-other as a new literal, nothing for x-custom
    }

    /// S6: a divergent name triggers the reference-set-emptying opcode
    /// before the new header's literal.
    #[test]
    fn reference_set_divergence_empties_first() {
        let mut encoder = Encoder::default();
        encoder
            .headers_encode(&[(b"x-custom".to_vec(), b"ab".to_vec())])
            .unwrap();
        let out = encoder
            .headers_encode(&[(b"y".to_vec(), b"1".to_vec())])
            .unwrap();
        assert_eq!(out[0], 0x30);
        assert_eq!(out[1], 0x40);
        assert_eq!(encoder.table.is_referenced(2), false); // old entry shifted, unreferenced
    }

    #[test]
    fn coalesces_duplicate_names_with_nul_separator() {
        let mut encoder = Encoder::default();
        let out = encoder
            .headers_encode(&[
                (b"x-dup".to_vec(), b"a".to_vec()),
                (b"x-dup".to_vec(), b"b".to_vec()),
            ])
            .unwrap();
        assert_eq!(out[0], 0x40);
        let entry = encoder.table.get(1).unwrap();
        assert_eq!(entry.1, b"a\0b");
    }

    #[test]
    fn dynamic_name_match_prefers_literal_indexed_name_over_reinserting() {
        let mut encoder = Encoder::default();
        encoder
            .headers_encode(&[(b"x-custom".to_vec(), b"ab".to_vec())])
            .unwrap();
        let out = encoder
            .headers_encode(&[(b"x-custom".to_vec(), b"cd".to_vec())])
            .unwrap();
        assert_eq!(out[0] & 0xc0, 0x40); // literal, indexed name, incremental
        assert_eq!(encoder.table.dynamic_len(), 2);
    }

    /// The hand-picked `encode` entry point bypasses the automatic picker
    /// entirely -- useful when a caller already knows it wants, say, a
    /// never-indexed literal for a sensitive header.
    #[test]
    fn manual_encode_emits_a_hand_picked_representation() {
        let encoder = Encoder::default();
        let mut dst = Vec::new();
        encoder
            .encode((2, b"PATCH".as_slice(), Encoder::NEVER_INDEXED), &mut dst)
            .unwrap();
        assert_eq!(dst[0] & 0b0001_0000, 0b0001_0000);
        assert_eq!(encoder.table.dynamic_len(), 0);
    }

    #[test]
    fn resize_local_flushes_a_table_size_update_first() {
        let mut encoder = Encoder::default();
        encoder.resize_local(100);
        let out = encoder
            .headers_encode(&[(b":method".to_vec(), b"GET".to_vec())])
            .unwrap();
        assert_eq!(out[0] & 0xf0, 0x20); // table-size-update family
        assert_eq!(encoder.max_dynamic_size(), 100);
    }
}

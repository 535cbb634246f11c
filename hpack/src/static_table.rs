//! The fixed, well-known header table shared by both peers before any
//! dynamic entry has ever been added.
//!
//! Entries are 1-indexed as required by the combined index space (`§3` of
//! the design doc: dynamic-table entries occupy `1..=|D|`, static entries
//! occupy `|D|+1..=|D|+|S|`). The table itself, and the two reverse indexes
//! built from it, are immutable compile-time-derived data -- exactly the
//! kind of "fixed compile-time data" the static table is specified to be.

use std::collections::HashMap;
use std::sync::OnceLock;

/// `(name, value)` pairs, in their canonical 1-based order.
#[rustfmt::skip]
pub const STATIC_TABLE: &[(&str, &str)] = &[
    (":authority", ""),
    (":method", "GET"),
    (":method", "POST"),
    (":path", "/"),
    (":path", "/index.html"),
    (":scheme", "http"),
    (":scheme", "https"),
    (":status", "200"),
    (":status", "204"),
    (":status", "206"),
    (":status", "304"),
    (":status", "400"),
    (":status", "404"),
    (":status", "500"),
    ("accept-charset", ""),
    ("accept-encoding", "gzip, deflate"),
    ("accept-language", ""),
    ("accept-ranges", ""),
    ("accept", ""),
    ("access-control-allow-origin", ""),
    ("age", ""),
    ("allow", ""),
    ("authorization", ""),
    ("cache-control", ""),
    ("content-disposition", ""),
    ("content-encoding", ""),
    ("content-language", ""),
    ("content-length", ""),
    ("content-location", ""),
    ("content-range", ""),
    ("content-type", ""),
    ("cookie", ""),
    ("date", ""),
    ("etag", ""),
    ("expect", ""),
    ("expires", ""),
    ("from", ""),
    ("host", ""),
    ("if-match", ""),
    ("if-modified-since", ""),
    ("if-none-match", ""),
    ("if-range", ""),
    ("if-unmodified-since", ""),
    ("last-modified", ""),
    ("link", ""),
    ("location", ""),
    ("max-forwards", ""),
    ("proxy-authenticate", ""),
    ("proxy-authorization", ""),
    ("range", ""),
    ("referer", ""),
    ("refresh", ""),
    ("retry-after", ""),
    ("server", ""),
    ("set-cookie", ""),
    ("strict-transport-security", ""),
    ("transfer-encoding", ""),
    ("user-agent", ""),
    ("vary", ""),
    ("via", ""),
    ("www-authenticate", ""),
];

/// Returns the 1-based entry at `index`, if any.
pub fn get(index: u32) -> Option<(&'static [u8], &'static [u8])> {
    let i = index.checked_sub(1)? as usize;
    STATIC_TABLE
        .get(i)
        .map(|(n, v)| (n.as_bytes(), v.as_bytes()))
}

/// `(name, value) -> 1-based index`, for the encoder's exact-match path.
pub fn reverse_full() -> &'static HashMap<(&'static str, &'static str), u32> {
    static MAP: OnceLock<HashMap<(&'static str, &'static str), u32>> = OnceLock::new();
    MAP.get_or_init(|| {
        let mut map = HashMap::with_capacity(STATIC_TABLE.len());
        for (i, &(name, value)) in STATIC_TABLE.iter().enumerate() {
            map.entry((name, value)).or_insert((i + 1) as u32);
        }
        map
    })
}

/// `name -> smallest 1-based index with that name`, for the encoder's
/// name-only match path.
pub fn reverse_name() -> &'static HashMap<&'static str, u32> {
    static MAP: OnceLock<HashMap<&'static str, u32>> = OnceLock::new();
    MAP.get_or_init(|| {
        let mut map = HashMap::with_capacity(STATIC_TABLE.len());
        for (i, &(name, _)) in STATIC_TABLE.iter().enumerate() {
            map.entry(name).or_insert((i + 1) as u32);
        }
        map
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn has_sixty_one_entries() {
        assert_eq!(STATIC_TABLE.len(), 61);
    }

    #[test]
    fn indexes_from_one() {
        assert_eq!(get(1), Some((b":authority".as_slice(), b"".as_slice())));
        assert_eq!(get(2), Some((b":method".as_slice(), b"GET".as_slice())));
        assert_eq!(get(61), Some((b"www-authenticate".as_slice(), b"".as_slice())));
        assert_eq!(get(0), None);
        assert_eq!(get(62), None);
    }

    #[test]
    fn reverse_full_resolves_exact_pairs() {
        assert_eq!(reverse_full().get(&(":method", "GET")), Some(&2));
        assert_eq!(reverse_full().get(&(":method", "POST")), Some(&3));
    }

    #[test]
    fn reverse_name_resolves_smallest_index() {
        assert_eq!(reverse_name().get(":status"), Some(&8)); // 200 is first
        assert_eq!(reverse_name().get(":method"), Some(&2)); // GET is first
    }
}

//! Builds the canonical Huffman decode tree once, from [`crate::table::ENCODE_TABLE`].
//!
//! The teacher implementation this crate is derived from flattens the tree
//! into N-bit transition tables for throughput. This codec favors the
//! simpler bit-at-a-time walk the same design space allows: one extra
//! pointer dereference per bit, in exchange for a tree that is a tenth the
//! size and needs no code generation step.

use std::sync::OnceLock;

use crate::table::ENCODE_TABLE;

/// Symbol carried by the EOS entry, used only to detect and reject the
/// end-of-string code if it is ever completed mid-stream.
pub(crate) const EOS_SYMBOL: u16 = 256;

#[derive(Debug, Default)]
pub(crate) struct Node {
    pub symbol: Option<u16>,
    pub children: [Option<Box<Node>>; 2],
}

impl Node {
    fn insert(&mut self, code: u32, length: u8, symbol: u16) {
        let mut node = self;
        for i in (0..length).rev() {
            let bit = ((code >> i) & 1) as usize;
            node = node.children[bit].get_or_insert_with(|| Box::new(Node::default()));
        }
        node.symbol = Some(symbol);
    }
}

/// Returns the process-wide decode tree, building it on first use.
pub(crate) fn root() -> &'static Node {
    static TREE: OnceLock<Node> = OnceLock::new();
    TREE.get_or_init(|| {
        let mut root = Node::default();
        for (symbol, &(length, code)) in ENCODE_TABLE.iter().enumerate() {
            root.insert(code, length, symbol as u16);
        }
        root
    })
}

//! Construction-time prefix trie over compressed symbols.
//!
//! Nodes live in one arena and refer to each other by index. Siblings form
//! a singly linked list kept sorted by symbol, so lookups can stop at the
//! first larger symbol. The arena is dropped once the transition table has
//! been serialized.

use super::alphabet::SymbolTable;
use crate::error::{try_reserve, AcismError, Result};
use crate::transition::Symbol;

pub(crate) type NodeId = u32;

pub(crate) const ROOT: NodeId = 0;

#[derive(Debug, Clone)]
pub(crate) struct TrieNode {
    /// Symbol on the edge from the parent; 0 for the root.
    pub symbol: Symbol,
    pub parent: NodeId,
    pub first_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    /// Failure link; `None` only for the root.
    pub backlink: Option<NodeId>,
    /// `pattern_index + 1`, or 0 when no pattern ends here.
    pub match_id: u32,
    /// Some proper suffix of this node's path is a pattern.
    pub is_suffix: bool,
    /// Base offset in the transition table; meaningful only for nodes
    /// with children once the interleaver has run.
    pub base: u32,
}

impl TrieNode {
    fn new(symbol: Symbol, parent: NodeId) -> Self {
        Self {
            symbol,
            parent,
            first_child: None,
            next_sibling: None,
            backlink: Some(ROOT),
            match_id: 0,
            is_suffix: false,
            base: 0,
        }
    }

    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }

    pub fn is_match(&self) -> bool {
        self.match_id != 0
    }

    /// A backlink other than the root needs its own slot at `base + 0`.
    pub fn has_backlink(&self) -> bool {
        matches!(self.backlink, Some(back) if back != ROOT)
    }
}

/// Where a symbol sits, or would sit, in a sorted sibling list.
enum Position {
    Found(NodeId),
    /// Insert after the given sibling, or at the head when `None`.
    InsertAfter(Option<NodeId>),
}

#[derive(Debug)]
pub(crate) struct Trie {
    nodes: Vec<TrieNode>,
    duplicate_patterns: usize,
    empty_patterns: usize,
}

impl Trie {
    /// Insert every pattern, in order. The first pattern to end at a node
    /// owns it; later identical patterns are counted as duplicates.
    pub fn build<P: AsRef<[u8]>>(patterns: &[P], symbols: &SymbolTable) -> Result<Self> {
        let capacity = symbols.total_bytes() + 1;
        if capacity > NodeId::MAX as usize {
            return Err(AcismError::ResourceLimitExceeded(format!(
                "{} pattern bytes exceed the trie node limit",
                symbols.total_bytes()
            )));
        }

        let mut nodes = Vec::new();
        try_reserve(&mut nodes, capacity, "trie nodes")?;
        nodes.push(TrieNode::new(0, ROOT));
        nodes[0].backlink = None;

        let mut trie = Self {
            nodes,
            duplicate_patterns: 0,
            empty_patterns: 0,
        };

        for (index, pattern) in patterns.iter().enumerate() {
            let bytes = pattern.as_ref();
            if bytes.is_empty() {
                trie.empty_patterns += 1;
                continue;
            }

            let mut node = ROOT;
            for &byte in bytes {
                let symbol = symbols.symbol(byte);
                node = match trie.locate(node, symbol) {
                    Position::Found(child) => child,
                    Position::InsertAfter(prev) => trie.insert_child(node, prev, symbol),
                };
            }

            let terminal = &mut trie.nodes[node as usize];
            if terminal.is_match() {
                trie.duplicate_patterns += 1;
            } else {
                terminal.match_id = index as u32 + 1;
            }
        }

        Ok(trie)
    }

    fn locate(&self, parent: NodeId, symbol: Symbol) -> Position {
        let mut prev = None;
        for child in self.children(parent) {
            let child_symbol = self.node(child).symbol;
            if child_symbol == symbol {
                return Position::Found(child);
            }
            if child_symbol > symbol {
                break;
            }
            prev = Some(child);
        }
        Position::InsertAfter(prev)
    }

    fn insert_child(&mut self, parent: NodeId, prev: Option<NodeId>, symbol: Symbol) -> NodeId {
        let id = self.nodes.len() as NodeId;
        let mut node = TrieNode::new(symbol, parent);
        match prev {
            Some(prev) => {
                node.next_sibling = self.nodes[prev as usize].next_sibling;
                self.nodes[prev as usize].next_sibling = Some(id);
            }
            None => {
                node.next_sibling = self.nodes[parent as usize].first_child;
                self.nodes[parent as usize].first_child = Some(id);
            }
        }
        self.nodes.push(node);
        id
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &TrieNode {
        &self.nodes[id as usize]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut TrieNode {
        &mut self.nodes[id as usize]
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            trie: self,
            next: self.node(id).first_child,
        }
    }

    pub fn find_child(&self, id: NodeId, symbol: Symbol) -> Option<NodeId> {
        match self.locate(id, symbol) {
            Position::Found(child) => Some(child),
            Position::InsertAfter(_) => None,
        }
    }

    /// Node ids in arena (allocation) order, root first.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        0..self.nodes.len() as NodeId
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn duplicate_patterns(&self) -> usize {
        self.duplicate_patterns
    }

    pub fn empty_patterns(&self) -> usize {
        self.empty_patterns
    }

    /// Nodes whose pattern id cannot live in their transition word.
    pub fn branching_match_count(&self) -> usize {
        self.nodes[1..]
            .iter()
            .filter(|n| n.is_match() && n.has_children())
            .count()
    }
}

pub(crate) struct Children<'a> {
    trie: &'a Trie,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.trie.node(id).next_sibling;
        Some(id)
    }
}

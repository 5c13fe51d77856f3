//! Failure links.
//!
//! Processed one trie level at a time with two work queues that swap each
//! round. For a node `dst` reached from `src` on symbol `sym`, the walk
//! follows `src`'s own backlink chain and asks every ancestor on it for a
//! child on `sym`:
//!
//! - the first child found is the longest proper suffix of `dst` present in
//!   the trie; it decides `is_suffix`;
//! - a branching `dst` links to the first such child that itself has
//!   children, since a leaf has no base offset to resume from;
//! - a leaf `dst` links to the ancestor where the first child was found.

use super::trie::{NodeId, Trie, ROOT};

pub(crate) fn resolve(trie: &mut Trie) {
    let mut current: Vec<NodeId> = trie.children(ROOT).collect();
    let mut next: Vec<NodeId> = Vec::with_capacity(current.len());

    while !current.is_empty() {
        next.clear();
        for &src in &current {
            let mut cursor = trie.node(src).first_child;
            while let Some(dst) = cursor {
                cursor = trie.node(dst).next_sibling;
                let has_children = trie.node(dst).has_children();
                if has_children {
                    next.push(dst);
                }

                let link = FailureLink::search(trie, src, dst, has_children);
                let suffix = trie.node(link.suffix);
                let is_suffix = suffix.is_match() || suffix.is_suffix;

                let node = trie.node_mut(dst);
                node.backlink = Some(link.backlink);
                node.is_suffix = is_suffix;
            }
        }
        std::mem::swap(&mut current, &mut next);
    }
}

struct FailureLink {
    /// Longest proper suffix node of `dst`, or the root.
    suffix: NodeId,
    backlink: NodeId,
}

impl FailureLink {
    fn search(trie: &Trie, src: NodeId, dst: NodeId, branching: bool) -> Self {
        let symbol = trie.node(dst).symbol;
        let mut suffix = None;
        let mut ancestor = trie.node(src).backlink;

        while let Some(tp) = ancestor {
            if let Some(child) = trie.find_child(tp, symbol) {
                if suffix.is_none() {
                    suffix = Some((child, tp));
                    if !branching {
                        break;
                    }
                }
                if trie.node(child).has_children() {
                    return Self {
                        suffix: suffix.map_or(child, |(s, _)| s),
                        backlink: child,
                    };
                }
            }
            ancestor = trie.node(tp).backlink;
        }

        match suffix {
            Some((child, parent)) => Self {
                suffix: child,
                backlink: if branching { ROOT } else { parent },
            },
            None => Self {
                suffix: ROOT,
                backlink: ROOT,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::alphabet::SymbolTable;
    use crate::compiler::trie::tests::walk;

    fn resolved(patterns: &[&str]) -> (Trie, SymbolTable) {
        let symbols = SymbolTable::from_patterns(patterns);
        let mut trie = Trie::build(patterns, &symbols).unwrap();
        resolve(&mut trie);
        (trie, symbols)
    }

    fn node(trie: &Trie, symbols: &SymbolTable, path: &str) -> NodeId {
        walk(trie, symbols, path.as_bytes()).unwrap()
    }

    #[test]
    fn test_branching_node_links_to_suffix() {
        let (trie, symbols) = resolved(&["he", "she", "his", "hers"]);
        let sh = node(&trie, &symbols, "sh");
        let h = node(&trie, &symbols, "h");
        // "sh" falls back to "h", which branches
        assert_eq!(trie.node(sh).backlink, Some(h));
        assert!(!trie.node(sh).is_suffix);
    }

    #[test]
    fn test_leaf_links_to_suffix_parent() {
        let (trie, symbols) = resolved(&["he", "she", "his", "hers"]);
        let she = node(&trie, &symbols, "she");
        let h = node(&trie, &symbols, "h");
        // the suffix "he" hangs off "h"
        assert_eq!(trie.node(she).backlink, Some(h));
        assert!(trie.node(she).is_suffix);
    }

    #[test]
    fn test_no_suffix_links_to_root() {
        let (trie, symbols) = resolved(&["he", "she", "his", "hers"]);
        let his = node(&trie, &symbols, "his");
        let hi = node(&trie, &symbols, "hi");
        assert_eq!(trie.node(hi).backlink, Some(ROOT));
        assert_eq!(trie.node(his).backlink, Some(ROOT));
        assert!(!trie.node(his).is_suffix);
    }

    #[test]
    fn test_leaf_suffix_is_skipped_for_branching_node() {
        let (trie, symbols) = resolved(&["aa", "a", "baab"]);
        let baa = node(&trie, &symbols, "baa");
        let a = node(&trie, &symbols, "a");
        // "aa" is a leaf, so "baa" must resume from "a"
        assert_eq!(trie.node(baa).backlink, Some(a));
        assert!(trie.node(baa).is_suffix);
    }

    #[test]
    fn test_suffix_flag_is_transitive() {
        let (trie, symbols) = resolved(&["c", "bcd", "abcd"]);
        let abc = node(&trie, &symbols, "abc");
        let bc = node(&trie, &symbols, "bc");
        assert!(trie.node(bc).is_suffix);
        assert!(trie.node(abc).is_suffix);
        assert!(trie.node(node(&trie, &symbols, "abcd")).is_suffix);
    }

    #[test]
    fn test_first_level_keeps_root_link() {
        let (trie, symbols) = resolved(&["ab", "b"]);
        let a = node(&trie, &symbols, "a");
        assert_eq!(trie.node(a).backlink, Some(ROOT));
        assert!(!trie.node(a).is_suffix);
        assert_eq!(trie.node(ROOT).backlink, None);
    }
}

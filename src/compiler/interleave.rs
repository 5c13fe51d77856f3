//! State interleaving: assigning base offsets in one shared table.
//!
//! Every branching node gets a base offset `b` such that `b + symbol` is a
//! slot nobody else uses for each of its children. A node with a backlink
//! also claims slot `b + 0` to store that link. Bases are unique, so the
//! symbol embedded in each word is enough to tell whether a slot belongs to
//! the state being probed.
//!
//! Nodes are placed level by level. The search for a base starts from a
//! per-symbol hint instead of zero; after each placement the hint moves a
//! fraction of the way towards the chosen offset.

use super::trie::{NodeId, Trie, ROOT};
use crate::error::{try_filled, try_reserve, AcismError, Result};
use crate::transition::Symbol;
use log::trace;

const USED: u8 = 1;
const BASE: u8 = 2;

/// Per-slot claim flags, grown by doubling.
struct SlotUsage {
    flags: Vec<u8>,
}

impl SlotUsage {
    fn with_len(len: usize) -> Result<Self> {
        Ok(Self {
            flags: try_filled(len.max(1), 0, "slot usage map")?,
        })
    }

    /// Unallocated slots are unclaimed.
    #[inline]
    fn get(&self, slot: usize) -> u8 {
        self.flags.get(slot).copied().unwrap_or(0)
    }

    fn mark(&mut self, slot: usize, flags: u8) -> Result<()> {
        if slot >= self.flags.len() {
            let mut len = self.flags.len();
            while len <= slot {
                len *= 2;
            }
            let additional = len - self.flags.len();
            trace!("slot usage map grows {} -> {len}", self.flags.len());
            try_reserve(&mut self.flags, additional, "slot usage map")?;
            self.flags.resize(len, 0);
        }
        self.flags[slot] |= flags;
        Ok(())
    }

    fn is_free_base(&self, base: usize, need: u8, children: &[Symbol]) -> bool {
        self.get(base) & need == 0
            && children
                .iter()
                .all(|&sym| self.get(base + usize::from(sym)) & USED == 0)
    }
}

/// Assign a base to every branching node and return the table size
/// (highest used slot + 1).
pub(crate) fn interleave(trie: &mut Trie, symbol_count: usize) -> Result<usize> {
    let mut usage = SlotUsage::with_len(trie.len() + symbol_count)?;
    // hints[symbol][has_backlink]
    let mut hints = vec![[0usize; 2]; symbol_count.max(1)];
    let mut last_slot = 0usize;

    let mut current: Vec<NodeId> = vec![ROOT];
    let mut next: Vec<NodeId> = Vec::new();
    let mut kids: Vec<Symbol> = Vec::new();

    while !current.is_empty() {
        next.clear();
        for &id in &current {
            if !trie.node(id).has_children() {
                continue;
            }

            kids.clear();
            for child in trie.children(id) {
                kids.push(trie.node(child).symbol);
                next.push(child);
            }

            let backed = usize::from(trie.node(id).has_backlink());
            let need = if backed == 1 { BASE | USED } else { BASE };

            let mut hint_symbol = kids[0];
            for &sym in &kids[1..] {
                if hints[usize::from(sym)][backed] > hints[usize::from(hint_symbol)][backed] {
                    hint_symbol = sym;
                }
            }

            let start = hints[usize::from(hint_symbol)][backed];
            let mut base = start;
            while !usage.is_free_base(base, need, &kids) {
                base += 1;
            }

            usage.mark(base, need)?;
            for &sym in &kids {
                usage.mark(base + usize::from(sym), USED)?;
            }
            hints[usize::from(hint_symbol)][backed] = start + (base - start) / kids.len();

            trie.node_mut(id).base = u32::try_from(base).map_err(|_| AcismError::CapacityOverflow {
                required_bits: usize::BITS - base.leading_zeros(),
                available_bits: u32::BITS,
            })?;

            // children are sorted, so the last one has the highest slot
            let last = base + usize::from(kids[kids.len() - 1]);
            last_slot = last_slot.max(last);
        }
        std::mem::swap(&mut current, &mut next);
    }

    Ok(last_slot + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::alphabet::SymbolTable;
    use crate::compiler::backlinks;
    use std::collections::HashSet;

    fn placed(patterns: &[&[u8]]) -> (Trie, usize) {
        let symbols = SymbolTable::from_patterns(patterns);
        let mut trie = Trie::build(patterns, &symbols).unwrap();
        backlinks::resolve(&mut trie);
        let size = interleave(&mut trie, symbols.symbol_count()).unwrap();
        (trie, size)
    }

    fn assert_layout_sound(trie: &Trie, size: usize) {
        let mut bases = HashSet::new();
        let mut used = HashSet::new();
        for id in trie.ids() {
            let node = trie.node(id);
            if !node.has_children() {
                continue;
            }
            let base = node.base as usize;
            assert!(bases.insert(base), "base {base} assigned twice");
            if node.has_backlink() {
                assert!(used.insert(base), "backlink slot {base} collides");
            }
            for child in trie.children(id) {
                let slot = base + usize::from(trie.node(child).symbol);
                assert!(slot < size);
                assert!(used.insert(slot), "child slot {slot} collides");
            }
        }
    }

    #[test]
    fn test_root_placed_at_zero() {
        let (trie, size) = placed(&[b"he", b"she", b"his", b"hers"]);
        assert_eq!(trie.node(ROOT).base, 0);
        assert_layout_sound(&trie, size);
    }

    #[test]
    fn test_classic_pattern_set_size() {
        let (_, size) = placed(&[b"he", b"she", b"his", b"hers"]);
        assert_eq!(size, 13);
    }

    #[test]
    fn test_no_patterns_gives_single_slot() {
        let patterns: [&[u8]; 0] = [];
        let (_, size) = placed(&patterns);
        assert_eq!(size, 1);
    }

    #[test]
    fn test_dense_binary_patterns() {
        let patterns: Vec<Vec<u8>> = (0u16..600)
            .map(|i| {
                let x = i.wrapping_mul(7919);
                vec![(x >> 8) as u8, x as u8, (i % 13) as u8, 0]
            })
            .collect();
        let refs: Vec<&[u8]> = patterns.iter().map(|p| p.as_slice()).collect();
        let (trie, size) = placed(&refs);
        assert_layout_sound(&trie, size);
    }

    #[test]
    fn test_usage_map_grows() {
        let mut usage = SlotUsage::with_len(4).unwrap();
        usage.mark(100, USED).unwrap();
        assert_eq!(usage.get(100), USED);
        assert!(usage.flags.len() > 100);
        assert!(usage.flags.len().is_power_of_two());
        assert_eq!(usage.get(10_000), 0);
    }

    #[test]
    fn test_usage_map_growth_keeps_claims() {
        let mut usage = SlotUsage::with_len(1).unwrap();
        usage.mark(0, BASE).unwrap();
        usage.mark(3, USED).unwrap();
        usage.mark(17, USED | BASE).unwrap();
        assert_eq!(usage.flags.len(), 32);
        assert_eq!(usage.get(0), BASE);
        assert_eq!(usage.get(3), USED);
        assert_eq!(usage.get(17), USED | BASE);
        assert!(usage.is_free_base(1, BASE, &[1, 4]));
        assert!(!usage.is_free_base(0, BASE, &[1]));
        assert!(!usage.is_free_base(1, BASE, &[2]));
    }
}

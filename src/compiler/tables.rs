//! Writing the packed transition table from the placed trie.

use super::trie::{NodeId, Trie, ROOT};
use crate::error::{try_filled, AcismError, Result};
use crate::transition::{bit_width, Symbol, WordLayout, BACK};

/// Word stored at slot 0. Any nonzero symbol bits keep the root from ever
/// looking like a valid backlink.
pub(crate) const ROOT_SENTINEL: u32 = 1;

/// Serialize every transition into a table of `table_size` slots.
///
/// The returned vector carries `symbol_count` zero words of padding past
/// `table_size`, so probing `state + symbol` never leaves the table.
pub(crate) fn serialize(
    trie: &Trie,
    layout: WordLayout,
    table_size: usize,
    symbol_count: usize,
) -> Result<Vec<u32>> {
    let mut table = try_filled(table_size + symbol_count, 0u32, "transition table")?;
    let mut stack: Vec<NodeId> = vec![ROOT];
    while let Some(id) = stack.pop() {
        let node = trie.node(id);
        let base = node.base as usize;

        if node.has_children() {
            if let Some(back) = node.backlink.filter(|_| node.has_backlink()) {
                let target = trie.node(back).base;
                table[base + usize::from(BACK)] = pack(layout, BACK, false, false, target)?;
            }
        }

        for child_id in trie.children(id) {
            let child = trie.node(child_id);
            let next = if child.has_children() {
                stack.push(child_id);
                child.base
            } else {
                let leaf = table_size + child.match_id.saturating_sub(1) as usize;
                u32::try_from(leaf).map_err(|_| AcismError::CapacityOverflow {
                    required_bits: bit_width(leaf as u64) + layout.sym_bits(),
                    available_bits: layout.next_bits() + layout.sym_bits(),
                })?
            };
            let symbol = child.symbol;
            table[base + usize::from(symbol)] =
                pack(layout, symbol, child.is_match(), child.is_suffix, next)?;
        }
    }

    table[0] = ROOT_SENTINEL;
    Ok(table)
}

fn pack(
    layout: WordLayout,
    symbol: Symbol,
    is_match: bool,
    is_suffix: bool,
    next: u32,
) -> Result<u32> {
    layout
        .pack(symbol, is_match, is_suffix, next)
        .ok_or(AcismError::CapacityOverflow {
            required_bits: bit_width(u64::from(next)) + layout.sym_bits(),
            available_bits: layout.next_bits() + layout.sym_bits(),
        })
}

/// `(slot, pattern_index)` for every node that is both a match and a branch
/// point; their transition word holds a base offset, not a pattern index.
pub(crate) fn match_hash_entries(trie: &Trie) -> Vec<(u32, u32)> {
    trie.ids()
        .skip(1)
        .map(|id| trie.node(id))
        .filter(|node| node.is_match() && node.has_children())
        .map(|node| {
            let slot = trie.node(node.parent).base + u32::from(node.symbol);
            (slot, node.match_id - 1)
        })
        .collect()
}

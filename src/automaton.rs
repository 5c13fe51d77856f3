//! The compiled, immutable automaton.
//!
//! An [`Automaton`] owns the packed transition table, the match hash and
//! the symbol table. Nothing in it changes after construction, so one
//! automaton can be shared by reference (or behind an `Arc`) between any
//! number of threads, each scanning its own streams with its own
//! [`Cursor`](crate::Cursor).
//!
//! # Examples
//!
//! ```rust
//! use acism::Automaton;
//!
//! let automaton = Automaton::new(&["he", "she", "his", "hers"])?;
//! assert_eq!(automaton.pattern_count(), 4);
//!
//! let stats = automaton.stats();
//! assert_eq!(stats.max_pattern_length, 4);
//! assert_eq!(stats.branching_matches, 1);
//! # Ok::<(), acism::AcismError>(())
//! ```

use crate::compiler::alphabet::SymbolTable;
use crate::compiler::Compiler;
use crate::error::Result;
use crate::match_hash::MatchHash;
use crate::transition::{Symbol, Transition, WordLayout, BACK};
use serde::Serialize;

/// The root state's base offset.
pub(crate) const ROOT_STATE: u32 = 0;

/// Size and shape of a compiled automaton.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AutomatonStats {
    /// Patterns supplied at construction, including empty and duplicate ones.
    pub pattern_count: usize,
    /// Empty patterns; they never match.
    pub empty_patterns: usize,
    /// Patterns identical to an earlier one; only the earliest is reported.
    pub duplicate_patterns: usize,
    pub max_pattern_length: usize,
    pub total_pattern_bytes: usize,
    /// Alphabet size including the reserved code 0.
    pub symbol_count: usize,
    pub symbol_bits: u32,
    /// Trie nodes, root included.
    pub node_count: usize,
    /// States that are both a match and a branch point.
    pub branching_matches: usize,
    /// Logical transition table length.
    pub table_size: usize,
    pub hash_modulus: u32,
    pub hash_size: usize,
    /// Bytes held by the compiled tables.
    pub memory_usage: usize,
}

impl AutomatonStats {
    /// Fraction of transition slots that hold a word, 0.0 to 1.0.
    pub fn table_density(&self) -> f64 {
        if self.table_size == 0 {
            return 0.0;
        }
        // every non-root node occupies its parent's slot
        let filled = self.node_count.saturating_sub(1);
        filled as f64 / self.table_size as f64
    }

    pub fn summary(&self) -> String {
        format!(
            "{} patterns, {} symbols, {} nodes, {} slots ({:.1}% dense), {} hash buckets, {} bytes",
            self.pattern_count,
            self.symbol_count,
            self.node_count,
            self.table_size,
            self.table_density() * 100.0,
            self.hash_size,
            self.memory_usage
        )
    }
}

/// A compiled multi-pattern matcher.
#[derive(Debug, Clone)]
pub struct Automaton {
    transitions: Vec<u32>,
    match_hash: MatchHash,
    symbols: SymbolTable,
    layout: WordLayout,
    table_size: u32,
    stats: AutomatonStats,
}

impl Automaton {
    /// Compile `patterns` with the default configuration.
    ///
    /// Pattern `i` is reported as index `i`. Patterns are raw bytes and may
    /// contain any value, including zero.
    pub fn new<P: AsRef<[u8]>>(patterns: &[P]) -> Result<Self> {
        Compiler::new().compile(patterns)
    }

    pub(crate) fn from_parts(
        transitions: Vec<u32>,
        match_hash: MatchHash,
        symbols: SymbolTable,
        table_size: u32,
        stats: AutomatonStats,
    ) -> Self {
        let layout = symbols.layout();
        let mut automaton = Self {
            transitions,
            match_hash,
            symbols,
            layout,
            table_size,
            stats,
        };
        automaton.stats.memory_usage = automaton.memory_usage();
        automaton
    }

    #[cfg(test)]
    pub(crate) fn transitions(&self) -> &[u32] {
        &self.transitions
    }

    /// Bytes needed for the compiled tables of the given dimensions.
    pub(crate) fn estimate_memory(
        table_size: usize,
        symbol_count: usize,
        hash_pairs: usize,
    ) -> usize {
        let hash_buckets = if hash_pairs == 0 {
            0
        } else {
            hash_pairs * 5 / 4 + 1 + hash_pairs
        };
        (table_size + symbol_count) * std::mem::size_of::<u32>()
            + hash_buckets * 2 * std::mem::size_of::<u32>()
            + std::mem::size_of::<SymbolTable>()
    }

    #[inline]
    pub(crate) fn symbol(&self, byte: u8) -> Symbol {
        self.symbols.symbol(byte)
    }

    /// Probe the slot `state + symbol`.
    #[inline]
    pub(crate) fn transition(&self, state: u32, symbol: Symbol) -> Transition {
        let slot = state as usize + usize::from(symbol);
        Transition::probe(self.transitions.get(slot).copied().unwrap_or(0), symbol)
    }

    #[inline]
    pub(crate) fn is_valid(&self, transition: Transition) -> bool {
        self.layout.is_valid(transition)
    }

    #[inline]
    pub(crate) fn next_state(&self, transition: Transition) -> u32 {
        self.layout.next(transition)
    }

    /// The target is a leaf: `next` encodes a pattern index, not a state.
    #[inline]
    pub(crate) fn is_leaf(&self, transition: Transition) -> bool {
        self.layout.next(transition) >= self.table_size
    }

    /// Follow the backlink of `state`, falling back to the root.
    #[inline]
    pub(crate) fn backlink(&self, state: u32) -> u32 {
        let back = self.transition(state, BACK);
        if self.is_valid(back) {
            self.next_state(back)
        } else {
            ROOT_STATE
        }
    }

    /// Pattern index of the match entered through `slot`.
    #[inline]
    pub(crate) fn pattern_at(&self, slot: u32) -> Option<usize> {
        let stored = *self.transitions.get(slot as usize)?;
        let next = self.layout.next(Transition::probe(stored, 0));
        if next >= self.table_size {
            Some((next - self.table_size) as usize)
        } else {
            self.match_hash.lookup(slot).map(|p| p as usize)
        }
    }

    /// Number of patterns supplied at construction.
    pub fn pattern_count(&self) -> usize {
        self.stats.pattern_count
    }

    pub fn max_pattern_length(&self) -> usize {
        self.stats.max_pattern_length
    }

    /// Logical length of the shared transition table.
    pub fn table_size(&self) -> usize {
        self.table_size as usize
    }

    pub fn hash_size(&self) -> usize {
        self.match_hash.len()
    }

    /// Whether `byte` occurs in any pattern.
    pub fn in_alphabet(&self, byte: u8) -> bool {
        self.symbols.symbol(byte) != 0
    }

    pub fn stats(&self) -> &AutomatonStats {
        &self.stats
    }

    /// Heap and inline bytes held by the compiled tables.
    pub fn memory_usage(&self) -> usize {
        self.transitions.len() * std::mem::size_of::<u32>()
            + self.match_hash.memory_usage()
            + std::mem::size_of::<SymbolTable>()
    }
}

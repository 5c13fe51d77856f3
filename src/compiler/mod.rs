//! Pattern set compiler.
//!
//! Turns an ordered list of byte patterns into a compiled [`Automaton`].
//! Construction runs in fixed phases, each in its own sub-module:
//! - [`alphabet`] - byte frequency ranking and symbol assignment
//! - `trie` - prefix trie over symbols, kept in an index arena
//! - `backlinks` - failure links, one trie level at a time
//! - `interleave` - base offsets in one shared transition table
//! - `tables` - packed transition words and match-hash entries
//!
//! The working structures are owned by a single `compile` call and dropped
//! when it returns, whether it succeeds or not.
//!
//! # Examples
//!
//! ```rust
//! use acism::{CompileConfig, Compiler};
//!
//! let compiler = Compiler::with_config(CompileConfig::new().with_max_patterns(100));
//! let automaton = compiler.compile(&["GET ", "POST ", "HTTP/1.1"])?;
//! assert_eq!(automaton.pattern_count(), 3);
//! # Ok::<(), acism::AcismError>(())
//! ```

pub mod alphabet;
mod backlinks;
mod interleave;
mod tables;
mod trie;

use crate::automaton::{Automaton, AutomatonStats};
use crate::config::CompileConfig;
use crate::error::{AcismError, Result};
use crate::match_hash::MatchHash;
use alphabet::SymbolTable;
use log::{debug, warn};
use trie::Trie;

/// Builds automata under a [`CompileConfig`].
///
/// A compiler holds no state between calls; one instance can compile any
/// number of pattern sets.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompileConfig,
}

impl Compiler {
    /// Create a compiler with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CompileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    /// Compile `patterns` into an automaton.
    ///
    /// Pattern `i` is reported as index `i`. Empty patterns are accepted
    /// and never match. When the same pattern occurs more than once only
    /// its first index is reported.
    ///
    /// # Errors
    ///
    /// - [`AcismError::InvalidConfig`] if the configuration is unusable
    /// - [`AcismError::ResourceLimitExceeded`] if a configured limit is hit
    /// - [`AcismError::CapacityOverflow`] if the table plus pattern count
    ///   do not fit the transition word
    /// - [`AcismError::AllocationFailed`] if working memory is unavailable
    pub fn compile<P: AsRef<[u8]>>(&self, patterns: &[P]) -> Result<Automaton> {
        self.config.validate()?;
        self.config.check_patterns(patterns)?;
        if patterns.len() >= u32::MAX as usize {
            return Err(AcismError::ResourceLimitExceeded(format!(
                "{} patterns exceed the pattern index range",
                patterns.len()
            )));
        }

        debug!("compiling {} patterns", patterns.len());

        let symbols = SymbolTable::from_patterns(patterns);
        let layout = symbols.layout();
        let symbol_count = symbols.symbol_count();

        let mut trie = Trie::build(patterns, &symbols)?;
        if trie.duplicate_patterns() > 0 {
            warn!(
                "{} duplicate patterns collapsed onto their first occurrence",
                trie.duplicate_patterns()
            );
        }

        backlinks::resolve(&mut trie);
        let table_size = interleave::interleave(&mut trie, symbol_count)?;
        layout.check_capacity(table_size, patterns.len())?;

        let hash_pairs = tables::match_hash_entries(&trie);
        let estimate = Automaton::estimate_memory(table_size, symbol_count, hash_pairs.len());
        self.config.check_memory(estimate)?;

        let transitions = tables::serialize(&trie, layout, table_size, symbol_count)?;
        let match_hash = MatchHash::build(&hash_pairs)?;

        let longest = patterns.iter().map(|p| p.as_ref().len()).max();
        let stats = AutomatonStats {
            pattern_count: patterns.len(),
            empty_patterns: trie.empty_patterns(),
            duplicate_patterns: trie.duplicate_patterns(),
            max_pattern_length: longest.unwrap_or(0),
            total_pattern_bytes: symbols.total_bytes(),
            symbol_count,
            symbol_bits: layout.sym_bits(),
            node_count: trie.len(),
            branching_matches: trie.branching_match_count(),
            table_size,
            hash_modulus: match_hash.modulus(),
            hash_size: match_hash.len(),
            memory_usage: 0,
        };

        let table_size = u32::try_from(table_size).map_err(|_| AcismError::CapacityOverflow {
            required_bits: usize::BITS - table_size.leading_zeros(),
            available_bits: layout.next_bits(),
        })?;
        let automaton = Automaton::from_parts(transitions, match_hash, symbols, table_size, stats);

        debug!("compiled automaton: {}", automaton.stats().summary());
        Ok(automaton)
    }
}

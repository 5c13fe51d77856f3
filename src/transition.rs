//! Packed transition words.
//!
//! Every slot of the shared transition table is one `u32`:
//!
//! ```text
//!  31      30       29 ............ sym_bits   sym_bits-1 ... 0
//! +-------+--------+--------------------------+----------------+
//! | MATCH | SUFFIX |           next           |     symbol     |
//! +-------+--------+--------------------------+----------------+
//! ```
//!
//! A slot is probed by XOR-ing the queried symbol into the stored word. The
//! low `sym_bits` of the result are zero exactly when the slot was written
//! for that symbol; anything else means the slot belongs to another state.
//! `next` is either the base offset of the target state, or
//! `table_size + pattern_index` when the target is a leaf.

use crate::error::{AcismError, Result};

/// Compressed alphabet code. `0` is reserved: as a byte mapping it means
/// "not in any pattern", as a slot offset it addresses the backlink slot.
pub type Symbol = u16;

/// Offset of the backlink slot relative to a state's base.
pub const BACK: Symbol = 0;

pub(crate) const IS_MATCH: u32 = 1 << 31;
pub(crate) const IS_SUFFIX: u32 = 1 << 30;
pub(crate) const FLAGS: u32 = IS_MATCH | IS_SUFFIX;

const WORD_BITS: u32 = u32::BITS;
const FLAG_BITS: u32 = 2;

/// Number of bits needed to represent `value` (`0` for zero).
pub(crate) fn bit_width(value: u64) -> u32 {
    u64::BITS - value.leading_zeros()
}

/// The result of probing one `(state, symbol)` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition(u32);

impl Transition {
    #[inline]
    pub(crate) fn probe(stored: u32, symbol: Symbol) -> Self {
        Transition(stored ^ u32::from(symbol))
    }

    /// The target pattern ends here.
    #[inline]
    pub fn is_match(self) -> bool {
        self.0 & IS_MATCH != 0
    }

    /// A shorter pattern ending at the same position is reachable through
    /// the backlink chain.
    #[inline]
    pub fn is_suffix(self) -> bool {
        self.0 & IS_SUFFIX != 0
    }

    #[inline]
    pub fn has_match_flags(self) -> bool {
        self.0 & FLAGS != 0
    }
}

/// Bit layout of transition words for one automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordLayout {
    sym_bits: u32,
    sym_mask: u32,
}

impl WordLayout {
    /// Layout for an alphabet of `symbol_count` codes (including code 0).
    pub fn new(symbol_count: usize) -> Self {
        let sym_bits = bit_width(symbol_count as u64);
        Self {
            sym_bits,
            sym_mask: (1u32 << sym_bits) - 1,
        }
    }

    pub fn sym_bits(&self) -> u32 {
        self.sym_bits
    }

    /// Bits left for the `next` field.
    pub fn next_bits(&self) -> u32 {
        WORD_BITS - FLAG_BITS - self.sym_bits
    }

    /// Largest value the `next` field can hold.
    pub fn max_next(&self) -> u32 {
        (1u32 << self.next_bits()) - 1
    }

    /// Fail with [`AcismError::CapacityOverflow`] unless every leaf code
    /// `table_size + pattern_index` fits in the `next` field.
    pub fn check_capacity(&self, table_size: usize, pattern_count: usize) -> Result<()> {
        let largest_next = (table_size as u64 + pattern_count as u64).saturating_sub(1);
        let required_bits = bit_width(largest_next) + self.sym_bits;
        let available_bits = WORD_BITS - FLAG_BITS;
        if required_bits > available_bits {
            return Err(AcismError::CapacityOverflow {
                required_bits,
                available_bits,
            });
        }
        Ok(())
    }

    /// Encode a slot. Returns `None` if `next` does not fit.
    pub fn pack(&self, symbol: Symbol, is_match: bool, is_suffix: bool, next: u32) -> Option<u32> {
        if next > self.max_next() || u32::from(symbol) > self.sym_mask {
            return None;
        }
        let mut word = u32::from(symbol) | (next << self.sym_bits);
        if is_match {
            word |= IS_MATCH;
        }
        if is_suffix {
            word |= IS_SUFFIX;
        }
        Some(word)
    }

    #[inline]
    pub fn is_valid(&self, transition: Transition) -> bool {
        transition.0 & self.sym_mask == 0
    }

    #[inline]
    pub fn next(&self, transition: Transition) -> u32 {
        (transition.0 & !FLAGS) >> self.sym_bits
    }

    /// The symbol bits of a stored (not probed) word.
    pub fn symbol(&self, stored: u32) -> Symbol {
        (stored & self.sym_mask) as Symbol
    }
}

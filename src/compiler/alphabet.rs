//! Byte-to-symbol compression.
//!
//! Only bytes that occur in some pattern get a symbol. Codes are handed out
//! by descending frequency so the busiest bytes get the smallest codes,
//! which keeps the interleaver's child slots close to their base offsets.

use crate::transition::{Symbol, WordLayout};

/// Symbol code for bytes that appear in no pattern.
pub const NO_SYMBOL: Symbol = 0;

/// Mapping from raw bytes to dense symbol codes.
#[derive(Clone)]
pub struct SymbolTable {
    codes: [Symbol; 256],
    symbol_count: usize,
    total_bytes: usize,
    layout: WordLayout,
}

impl SymbolTable {
    /// Rank every byte of every pattern by frequency and assign codes.
    ///
    /// Ties are broken by byte value: among equally frequent bytes the
    /// larger byte gets the smaller code.
    pub fn from_patterns<P: AsRef<[u8]>>(patterns: &[P]) -> Self {
        let mut frequency = [0usize; 256];
        let mut total_bytes = 0;
        for pattern in patterns {
            let bytes = pattern.as_ref();
            total_bytes += bytes.len();
            for &byte in bytes {
                frequency[usize::from(byte)] += 1;
            }
        }

        let mut ranked: Vec<(usize, u8)> = (0..=u8::MAX)
            .map(|byte| (frequency[usize::from(byte)], byte))
            .collect();
        ranked.sort();

        let mut codes = [NO_SYMBOL; 256];
        let mut next_code: Symbol = 0;
        for &(count, byte) in ranked.iter().rev() {
            if count == 0 {
                break;
            }
            next_code += 1;
            codes[usize::from(byte)] = next_code;
        }

        let symbol_count = usize::from(next_code) + 1;
        Self {
            codes,
            symbol_count,
            total_bytes,
            layout: WordLayout::new(symbol_count),
        }
    }

    #[inline]
    pub fn symbol(&self, byte: u8) -> Symbol {
        self.codes[usize::from(byte)]
    }

    /// Number of codes including the reserved code 0.
    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    /// Number of distinct bytes used by the patterns.
    pub fn distinct_bytes(&self) -> usize {
        self.symbol_count - 1
    }

    /// Sum of all pattern lengths; bounds the trie node count.
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn layout(&self) -> WordLayout {
        self.layout
    }
}

impl std::fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolTable")
            .field("symbol_count", &self.symbol_count)
            .field("sym_bits", &self.layout.sym_bits())
            .field("total_bytes", &self.total_bytes)
            .finish()
    }
}

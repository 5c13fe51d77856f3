//! Pattern ids for states that are both a match and a branch point.
//!
//! Such a state's transition word already carries its base offset, so its
//! pattern id lives here instead, keyed by the global slot of the transition
//! that enters it. The table is write-once: linear probing, no deletion, and
//! slot 0 (never a child slot) marks an empty entry.

use crate::error::{try_filled, AcismError, Result};

const HASH_MULTIPLIER: u64 = 107;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Entry {
    slot: u32,
    pattern: u32,
}

impl Entry {
    fn is_empty(&self) -> bool {
        self.slot == 0
    }
}

/// Open-addressing map from transition slot to pattern index.
#[derive(Debug, Clone, Default)]
pub struct MatchHash {
    entries: Vec<Entry>,
    modulus: u32,
}

impl MatchHash {
    /// Build the table from `(slot, pattern)` pairs. Slots must be nonzero
    /// and distinct.
    ///
    /// Entries whose home bucket is free are placed first; the colliding
    /// ones are probed into place afterwards, so no entry is pushed out of
    /// its home bucket by an unrelated overflow.
    pub fn build(pairs: &[(u32, u32)]) -> Result<Self> {
        if pairs.is_empty() {
            return Ok(Self::default());
        }

        let count = pairs.len();
        let modulus = count * 5 / 4 + 1;
        let modulus_u32 = u32::try_from(modulus).map_err(|_| {
            AcismError::ResourceLimitExceeded(format!("{count} branching matches"))
        })?;

        let mut table = Self {
            entries: try_filled(modulus + count, Entry::default(), "match hash")?,
            modulus: modulus_u32,
        };

        let mut collisions = Vec::new();
        for &(slot, pattern) in pairs {
            debug_assert_ne!(slot, 0);
            let home = table.home(slot);
            if table.entries[home].is_empty() {
                table.entries[home] = Entry { slot, pattern };
            } else {
                collisions.push(Entry { slot, pattern });
            }
        }

        for entry in collisions.into_iter().rev() {
            let home = table.home(entry.slot);
            let free = table.entries[home..]
                .iter()
                .position(Entry::is_empty)
                .map(|offset| home + offset)
                .ok_or_else(|| {
                    AcismError::ResourceLimitExceeded("match hash overflow area exhausted".into())
                })?;
            table.entries[free] = entry;
        }

        // keep overflows past the modulus, drop trailing empty buckets
        let mut len = modulus;
        while len < table.entries.len() && !table.entries[len].is_empty() {
            len += 1;
        }
        while len > 0 && table.entries[len - 1].is_empty() {
            len -= 1;
        }
        table.entries.truncate(len);
        table.entries.shrink_to_fit();

        Ok(table)
    }

    #[inline]
    fn home(&self, slot: u32) -> usize {
        (u64::from(slot) * HASH_MULTIPLIER % u64::from(self.modulus)) as usize
    }

    /// Pattern index for the transition stored at `slot`.
    #[inline]
    pub fn lookup(&self, slot: u32) -> Option<u32> {
        if self.modulus == 0 || slot == 0 {
            return None;
        }
        self.entries
            .get(self.home(slot)..)?
            .iter()
            .take_while(|entry| !entry.is_empty())
            .find(|entry| entry.slot == slot)
            .map(|entry| entry.pattern)
    }

    /// Number of buckets kept after trimming.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn modulus(&self) -> u32 {
        self.modulus
    }

    pub fn memory_usage(&self) -> usize {
        self.entries.len() * std::mem::size_of::<Entry>()
    }
}

//! Shared data generation for ACISM benchmarks.
//!
//! Inputs are produced by a fixed linear congruential generator so every run
//! measures the same pattern sets and texts.

#![allow(dead_code)]

/// Deterministic pseudo-random byte source.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) as u32
    }

    pub fn below(&mut self, bound: usize) -> usize {
        self.next_u32() as usize % bound
    }
}

/// Word-like ASCII patterns, 3 to 12 bytes long.
pub fn word_patterns(count: usize, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = Lcg::new(seed);
    (0..count)
        .map(|_| {
            let len = 3 + rng.below(10);
            (0..len).map(|_| b'a' + rng.below(26) as u8).collect()
        })
        .collect()
}

/// Patterns over the full byte range, 4 to 16 bytes long.
pub fn binary_patterns(count: usize, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = Lcg::new(seed);
    (0..count)
        .map(|_| {
            let len = 4 + rng.below(13);
            (0..len).map(|_| rng.next_u32() as u8).collect()
        })
        .collect()
}

/// Lowercase prose-like text with roughly one planted pattern per
/// `plant_every` bytes.
pub fn text_with_matches(
    len: usize,
    patterns: &[Vec<u8>],
    plant_every: usize,
    seed: u64,
) -> Vec<u8> {
    let mut rng = Lcg::new(seed);
    let mut text = Vec::with_capacity(len + 16);
    while text.len() < len {
        if !patterns.is_empty() && rng.below(plant_every.max(1)) == 0 {
            text.extend_from_slice(&patterns[rng.below(patterns.len())]);
        } else if rng.below(6) == 0 {
            text.push(b' ');
        } else {
            text.push(b'a' + rng.below(26) as u8);
        }
    }
    text.truncate(len);
    text
}

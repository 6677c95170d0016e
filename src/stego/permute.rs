// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Frame scrambling.
//!
//! Shuffles the frame list with a Fisher-Yates pass driven by a ChaCha20
//! PRNG, so the embedding order is decoupled from file order. Encoder and
//! decoder derive the same seed and scan the same carrier, so both see the
//! same permutation; a different seed, frame count, or frame order yields a
//! different one and extraction silently reads the wrong bytes.
//!
//! # Cross-platform portability
//!
//! The shuffle draws `u32` values (not `usize`) so that 32-bit and 64-bit
//! targets consume identical PRNG output and produce identical orders.

use core::fmt;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Seed for the frame permutation.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ScrambleSeed(pub [u8; 32]);

impl ScrambleSeed {
    /// Widen an integer seed (little-endian into the first 8 bytes).
    pub fn from_u64(seed: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&seed.to_le_bytes());
        Self(bytes)
    }
}

impl From<u64> for ScrambleSeed {
    fn from(seed: u64) -> Self {
        Self::from_u64(seed)
    }
}

impl fmt::Debug for ScrambleSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ScrambleSeed(..)")
    }
}

/// Longest list the `u32` draws can shuffle. Computed in `u64` so it
/// also holds where `usize` is 32 bits wide.
pub const MAX_PERMUTATION_LEN: u64 = u32::MAX as u64 + 1;

/// Permutation of `0..n`: position `i` of the result holds the original
/// index that moves to position `i`.
pub fn permutation(n: usize, seed: &ScrambleSeed) -> Vec<usize> {
    debug_assert!(n as u64 <= MAX_PERMUTATION_LEN);
    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha20Rng::from_seed(seed.0);
    for i in (1..n).rev() {
        let j = rng.gen_range(0..=(i as u32)) as usize;
        order.swap(i, j);
    }
    order
}

/// Return `items` in scrambled order.
pub fn scramble<T: Clone>(items: &[T], seed: &ScrambleSeed) -> Vec<T> {
    permutation(items.len(), seed)
        .into_iter()
        .map(|i| items[i].clone())
        .collect()
}

/// Undo [`scramble`] with the same seed.
pub fn unscramble<T: Clone>(items: &[T], seed: &ScrambleSeed) -> Vec<T> {
    let order = permutation(items.len(), seed);
    let mut slots: Vec<Option<T>> = vec![None; items.len()];
    for (pos, &orig) in order.iter().enumerate() {
        slots[orig] = Some(items[pos].clone());
    }
    slots.into_iter().flatten().collect()
}

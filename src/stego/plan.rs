// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Embedding plan: which ancillary bytes carry payload bits, and in what order.
//!
//! The plan must be identical between embed and extract. Nothing in the
//! carrier records it, so a mismatch is not detected.

use crate::mp3::frame::Frame;
use crate::stego::error::StegoError;
use crate::stego::permute::{self, ScrambleSeed};

/// Largest supported number of LSBs per ancillary byte.
pub const MAX_BITS_PER_BYTE: u8 = 4;

/// Parameters shared by embed and extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingPlan {
    /// Low bits of each ancillary byte to use (1–4).
    pub bits_per_byte: u8,
    /// Use every `step`-th frame of the (possibly scrambled) order.
    pub step: usize,
    /// Index into the (possibly scrambled) order of the first frame used.
    pub start_frame: usize,
    /// Frame permutation seed; `None` keeps file order.
    pub scramble_seed: Option<ScrambleSeed>,
    /// Upper bound on ancillary bytes used overall.
    pub max_bytes: Option<usize>,
}

impl Default for EmbeddingPlan {
    fn default() -> Self {
        Self {
            bits_per_byte: 1,
            step: 1,
            start_frame: 0,
            scramble_seed: None,
            max_bytes: None,
        }
    }
}

impl EmbeddingPlan {
    pub fn with_bits_per_byte(mut self, bits: u8) -> Self {
        self.bits_per_byte = bits;
        self
    }

    pub fn with_step(mut self, step: usize) -> Self {
        self.step = step;
        self
    }

    pub fn with_start_frame(mut self, start: usize) -> Self {
        self.start_frame = start;
        self
    }

    pub fn with_scramble_seed(mut self, seed: Option<ScrambleSeed>) -> Self {
        self.scramble_seed = seed;
        self
    }

    pub fn with_max_bytes(mut self, max: Option<usize>) -> Self {
        self.max_bytes = max;
        self
    }

    pub fn validate(&self) -> Result<(), StegoError> {
        if !(1..=MAX_BITS_PER_BYTE).contains(&self.bits_per_byte) {
            return Err(StegoError::InvalidPlan("bits_per_byte must be 1-4"));
        }
        if self.step == 0 {
            return Err(StegoError::InvalidPlan("step must be at least 1"));
        }
        Ok(())
    }

    /// Mask covering the payload bits of an ancillary byte.
    pub fn lsb_mask(&self) -> u8 {
        ((1u16 << self.bits_per_byte) - 1) as u8
    }

    /// Frames in embedding order: scrambled if a seed is set, then
    /// `start_frame`/`step` applied. Frames without ancillary bytes are
    /// dropped after the stride, so they still count toward it.
    pub fn select<'a>(&self, frames: &'a [Frame]) -> Vec<&'a Frame> {
        let refs: Vec<&Frame> = frames.iter().collect();
        let ordered = match &self.scramble_seed {
            Some(seed) => permute::scramble(&refs, seed),
            None => refs,
        };
        ordered
            .into_iter()
            .skip(self.start_frame)
            .step_by(self.step.max(1))
            .filter(|f| f.has_ancillary())
            .collect()
    }

    /// Absolute offsets of every ancillary byte the plan uses, in order.
    pub fn slots(&self, frames: &[Frame]) -> Vec<usize> {
        let limit = self.max_bytes.unwrap_or(usize::MAX);
        self.select(frames)
            .into_iter()
            .flat_map(|f| f.ancillary_range())
            .take(limit)
            .collect()
    }

    /// Aggregate capacity in bits.
    pub fn capacity_bits(&self, frames: &[Frame]) -> u64 {
        let bytes: usize = self.select(frames).iter().map(|f| f.ancillary_len).sum();
        let bytes = self.max_bytes.map_or(bytes, |max| bytes.min(max));
        bytes as u64 * self.bits_per_byte as u64
    }
}

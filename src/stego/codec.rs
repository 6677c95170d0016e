// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! LSB embedding into ancillary bytes.
//!
//! The framed payload (length prefix + body) is read as a bit stream, MSB
//! first. Each ancillary byte chosen by the [`EmbeddingPlan`] takes the next
//! `bits_per_byte` bits in its low bits, MSB first; the high bits are kept.
//! The last used byte is zero-padded if the stream runs out mid-byte.
//!
//! Extraction walks the same byte order, decodes the prefix after 32 bits
//! and stops as soon as the declared body has been collected.

use crate::mp3::frame::Frame;
use crate::stego::error::{DecodeError, StegoError};
use crate::stego::framing::{self, LENGTH_PREFIX_BITS};
use crate::stego::plan::EmbeddingPlan;

/// Outcome of a successful embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedReport {
    /// Payload bits written, length prefix included.
    pub bits_written: u64,
    /// Ancillary bytes whose low bits were overwritten.
    pub bytes_touched: usize,
    /// Capacity of the plan over this carrier.
    pub capacity_bits: u64,
}

/// Raw result of walking the ancillary bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Decoded length prefix; `None` if fewer than 32 bits were available.
    pub declared_len: Option<u32>,
    /// Whole body bytes recovered after the prefix.
    pub payload: Vec<u8>,
    /// Bits read from the carrier, prefix included.
    pub bits_collected: u64,
}

impl Extraction {
    /// True when the full declared body was recovered.
    pub fn is_complete(&self) -> bool {
        self.declared_len
            .is_some_and(|n| self.payload.len() as u64 == n as u64)
    }

    /// The body, or the reason it is not usable.
    pub fn into_body(self) -> Result<Vec<u8>, DecodeError> {
        match self.declared_len {
            None => Err(DecodeError::NoPayload),
            Some(n) if self.payload.len() < n as usize => Err(DecodeError::Truncated {
                declared: n as usize,
                available: self.payload.len(),
            }),
            Some(_) => Ok(self.payload),
        }
    }
}

/// Write `body` (with its length prefix) into the ancillary bytes of `carrier`.
///
/// `frames` must come from scanning this same carrier. Nothing is modified
/// unless the whole payload fits.
pub fn embed(
    carrier: &mut [u8],
    frames: &[Frame],
    body: &[u8],
    plan: &EmbeddingPlan,
) -> Result<EmbedReport, StegoError> {
    plan.validate()?;
    let framed = framing::build_frame(body)?;
    let needed_bits = framed.len() as u64 * 8;

    let slots = plan.slots(frames);
    let k = plan.bits_per_byte as usize;
    let capacity_bits = slots.len() as u64 * k as u64;
    if needed_bits > capacity_bits {
        return Err(StegoError::MessageTooLarge {
            needed_bits,
            capacity_bits,
        });
    }
    if slots.iter().any(|&s| s >= carrier.len()) {
        return Err(StegoError::InvalidPlan("frame list does not match carrier"));
    }

    let mask = plan.lsb_mask();
    let bits = framing::bytes_to_bits(&framed);
    let mut bytes_touched = 0;
    for (chunk, &slot) in bits.chunks(k).zip(&slots) {
        let mut value = chunk.iter().fold(0u8, |acc, &b| (acc << 1) | b);
        value <<= k - chunk.len();
        carrier[slot] = (carrier[slot] & !mask) | value;
        bytes_touched += 1;
    }

    tracing::debug!(
        bits = needed_bits,
        bytes_touched,
        capacity_bits,
        bits_per_byte = plan.bits_per_byte,
        "embedded payload"
    );
    Ok(EmbedReport {
        bits_written: needed_bits,
        bytes_touched,
        capacity_bits,
    })
}

/// Read the framed payload back out of `carrier`.
///
/// A short carrier is not an error here: the result reports how much was
/// recovered and callers decide via [`Extraction::into_body`].
pub fn extract(
    carrier: &[u8],
    frames: &[Frame],
    plan: &EmbeddingPlan,
) -> Result<Extraction, StegoError> {
    plan.validate()?;
    let k = plan.bits_per_byte;

    let mut bits: Vec<u8> = Vec::new();
    let mut target: Option<u64> = None;
    for slot in plan.slots(frames) {
        let Some(&byte) = carrier.get(slot) else {
            break;
        };
        for shift in (0..k).rev() {
            bits.push((byte >> shift) & 1);
        }
        if target.is_none() {
            if let Some(n) = framing::decode_length(&bits) {
                target = Some(framing::frame_bits(n as usize));
            }
        }
        if target.is_some_and(|t| bits.len() as u64 >= t) {
            break;
        }
    }

    let declared_len = framing::decode_length(&bits);
    if let Some(t) = target {
        bits.truncate(t.min(bits.len() as u64) as usize);
    }
    let bits_collected = bits.len() as u64;

    let payload = if declared_len.is_some() {
        let body_bits = &bits[LENGTH_PREFIX_BITS..];
        let whole = body_bits.len() - body_bits.len() % 8;
        framing::bits_to_bytes(&body_bits[..whole])
    } else {
        Vec::new()
    };

    let extraction = Extraction {
        declared_len,
        payload,
        bits_collected,
    };
    if declared_len.is_some() && !extraction.is_complete() {
        tracing::warn!(
            declared = declared_len,
            recovered = extraction.payload.len(),
            "carrier ran out before the declared payload length"
        );
    }
    Ok(extraction)
}

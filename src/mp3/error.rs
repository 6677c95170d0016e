// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Error types for MPEG audio frame parsing.
//!
//! None of these are fatal to a whole scan: the scanner resynchronizes on a
//! bad header and the ancillary locator treats a failed side-info parse as
//! zero estimated usage. They surface only from the lower-level parsers.

use std::fmt;

/// Errors that can occur while decoding MPEG audio frame structures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mp3Error {
    /// Fewer bytes (or bits) remain than the structure requires.
    UnexpectedEof,
    /// The 11-bit frame sync pattern is absent.
    NoSync,
    /// Version bits `01` are reserved.
    ReservedVersion,
    /// Layer bits `00` are reserved.
    ReservedLayer,
    /// Bitrate index maps to "free" or "bad" (no fixed frame size).
    InvalidBitrate(u8),
    /// Sample-rate index 3 is reserved.
    InvalidSampleRate(u8),
    /// Side information region is shorter than the channel layout requires.
    SideInfoTruncated { needed_bits: usize, available_bits: usize },
}

impl fmt::Display for Mp3Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "unexpected end of MPEG data"),
            Self::NoSync => write!(f, "frame sync not found"),
            Self::ReservedVersion => write!(f, "reserved MPEG version"),
            Self::ReservedLayer => write!(f, "reserved MPEG layer"),
            Self::InvalidBitrate(i) => write!(f, "unusable bitrate index: {i}"),
            Self::InvalidSampleRate(i) => write!(f, "reserved sample-rate index: {i}"),
            Self::SideInfoTruncated { needed_bits, available_bits } => write!(
                f,
                "side information truncated: need {needed_bits} bits, have {available_bits}"
            ),
        }
    }
}

impl std::error::Error for Mp3Error {}

pub type Result<T> = std::result::Result<T, Mp3Error>;

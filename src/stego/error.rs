// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the embedding pipeline.
//!
//! [`StegoError`] covers failures that abort an embed or decrypt call.
//! Format problems in the carrier never show up here: the scanner skips
//! what it cannot parse, so a damaged carrier simply has less capacity.
//! Mismatched parameters between embed and extract are not detected either;
//! they produce garbage that usually fails as [`DecodeError`].

use core::fmt;

/// Reasons an extracted payload could not be turned back into a container.
#[derive(Debug)]
pub enum DecodeError {
    /// Fewer than 32 bits could be read, so there is no length prefix.
    NoPayload,
    /// The length prefix declares more bytes than the carrier holds.
    Truncated { declared: usize, available: usize },
    /// The metadata length field points past the end of the container.
    MetadataLength { declared: usize, available: usize },
    /// The metadata segment is not a valid JSON record.
    InvalidMetadata(serde_json::Error),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPayload => write!(f, "no length prefix found in carrier"),
            Self::Truncated { declared, available } => write!(
                f,
                "payload truncated: declared {declared} bytes, recovered {available}"
            ),
            Self::MetadataLength { declared, available } => write!(
                f,
                "metadata length {declared} exceeds container body of {available} bytes"
            ),
            Self::InvalidMetadata(e) => write!(f, "metadata is not valid JSON: {e}"),
        }
    }
}

/// Errors that can occur during embedding or extraction.
#[derive(Debug)]
pub enum StegoError {
    /// The payload needs more bits than the selected ancillary bytes hold.
    MessageTooLarge { needed_bits: u64, capacity_bits: u64 },
    /// The embedding plan is out of range.
    InvalidPlan(&'static str),
    /// Encryption or random embedding was requested without a key.
    MissingKey,
    /// Argon2 rejected the key-derivation input.
    KeyDerivation(argon2::Error),
    /// The metadata record could not be serialized.
    Metadata(serde_json::Error),
    /// The extracted bits do not form a valid container.
    Decode(DecodeError),
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MessageTooLarge { needed_bits, capacity_bits } => write!(
                f,
                "payload exceeds ancillary capacity: need {needed_bits} bits, have {capacity_bits}"
            ),
            Self::InvalidPlan(msg) => write!(f, "invalid embedding plan: {msg}"),
            Self::MissingKey => write!(f, "a key is required for encryption or random embedding"),
            Self::KeyDerivation(e) => write!(f, "key derivation failed: {e}"),
            Self::Metadata(e) => write!(f, "metadata serialization failed: {e}"),
            Self::Decode(e) => write!(f, "decode failed: {e}"),
        }
    }
}

impl std::error::Error for StegoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Metadata(e) => Some(e),
            Self::Decode(DecodeError::InvalidMetadata(e)) => Some(e),
            _ => None,
        }
    }
}

impl From<DecodeError> for StegoError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<argon2::Error> for StegoError {
    fn from(e: argon2::Error) -> Self {
        Self::KeyDerivation(e)
    }
}

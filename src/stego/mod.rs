// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Hiding payloads in MP3 ancillary bytes.
//!
//! Two entry levels:
//!
//! - **Container** (`encrypt` / `decrypt`): wraps a secret file with a small
//!   JSON metadata record, optionally obfuscates it with the additive
//!   cipher, and embeds it. This is what the CLI and HTTP front ends call.
//!
//! - **Raw** (`embed_binary` / `extract_binary`): the length-prefixed codec
//!   alone, no metadata and no cipher.
//!
//! Both write into the low bits of the bytes the ancillary locator marks as
//! unused, in the order an [`EmbeddingPlan`] selects. Embedding parameters
//! are not stored in the carrier and must be supplied again to extract.

pub mod error;
pub mod plan;
pub mod permute;
pub mod framing;
pub mod crypto;
pub mod payload;
pub mod codec;
pub mod capacity;
pub mod distortion;
mod pipeline;

pub use error::{DecodeError, StegoError};
pub use plan::EmbeddingPlan;
pub use permute::ScrambleSeed;
pub use crypto::{KeyDerivation, KeySchedule};
pub use payload::Metadata;
pub use codec::{EmbedReport, Extraction};
pub use capacity::{capacity_bits, inspect, message_capacity, CarrierReport, FrameSummary};
pub use pipeline::{
    decrypt, embed_binary, encrypt, extract_binary, DecryptConfig, DecryptOutput, EncryptConfig,
    EncryptOutput,
};

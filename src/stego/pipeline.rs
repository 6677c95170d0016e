// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Encrypt/decrypt orchestration over an MP3 carrier.
//!
//! `encrypt` wraps a secret file in a container (metadata + bytes),
//! optionally obfuscates it, and writes it into the ancillary bytes of a
//! copy of the carrier:
//! 1. Scan the carrier into frames and ancillary regions
//! 2. Derive the cipher key and scramble seed the call needs
//! 3. Serialize the container, enciphering `metadata || secret`
//! 4. Embed with the requested plan (capacity checked before any write)
//! 5. Measure byte-level distortion against the original
//!
//! `decrypt` repeats steps 1 and 2 with the same parameters, extracts and
//! splits the container. Nothing in the carrier records the parameters, so
//! a mismatch shows up as a [`DecodeError`](crate::stego::error::DecodeError).

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::mp3::Mp3Stream;
use crate::stego::codec::{self, EmbedReport};
use crate::stego::crypto::{KeyDerivation, KeySchedule};
use crate::stego::distortion;
use crate::stego::error::StegoError;
use crate::stego::payload::{self, Metadata};
use crate::stego::plan::EmbeddingPlan;

fn default_lsb_bits() -> u8 {
    1
}

fn default_step() -> usize {
    1
}

/// Parameters for [`encrypt`].
///
/// Deserializes from the camelCase keys used at the HTTP boundary.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptConfig {
    /// Name of the carrier file. Informational only; not embedded.
    #[serde(default)]
    pub original_file_name: Option<String>,
    /// Name of the secret file, recorded in the metadata.
    pub embedded_file_name: String,
    #[serde(default)]
    pub use_encryption: bool,
    #[serde(default)]
    pub random_embedding: bool,
    #[serde(default = "default_lsb_bits")]
    pub lsb_bits: u8,
    #[serde(default)]
    pub encryption_key: Option<String>,
    #[serde(default)]
    pub key_derivation: KeyDerivation,
    #[serde(default = "default_step")]
    pub step: usize,
    #[serde(default)]
    pub start_frame: usize,
    #[serde(default)]
    pub max_bytes: Option<usize>,
}

impl fmt::Debug for EncryptConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptConfig")
            .field("original_file_name", &self.original_file_name)
            .field("embedded_file_name", &self.embedded_file_name)
            .field("use_encryption", &self.use_encryption)
            .field("random_embedding", &self.random_embedding)
            .field("lsb_bits", &self.lsb_bits)
            .field("encryption_key", &self.encryption_key.as_ref().map(|_| ".."))
            .field("key_derivation", &self.key_derivation)
            .field("step", &self.step)
            .field("start_frame", &self.start_frame)
            .field("max_bytes", &self.max_bytes)
            .finish()
    }
}

impl EncryptConfig {
    pub fn new(embedded_file_name: impl Into<String>) -> Self {
        Self {
            original_file_name: None,
            embedded_file_name: embedded_file_name.into(),
            use_encryption: false,
            random_embedding: false,
            lsb_bits: default_lsb_bits(),
            encryption_key: None,
            key_derivation: KeyDerivation::default(),
            step: default_step(),
            start_frame: 0,
            max_bytes: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.encryption_key = Some(key.into());
        self
    }

    pub fn with_encryption(mut self, on: bool) -> Self {
        self.use_encryption = on;
        self
    }

    pub fn with_random_embedding(mut self, on: bool) -> Self {
        self.random_embedding = on;
        self
    }

    pub fn with_lsb_bits(mut self, bits: u8) -> Self {
        self.lsb_bits = bits;
        self
    }

    pub fn with_key_derivation(mut self, derivation: KeyDerivation) -> Self {
        self.key_derivation = derivation;
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

    pub fn with_max_bytes(mut self, max: Option<usize>) -> Self {
        self.max_bytes = max;
        self
    }

    fn metadata(&self) -> Metadata {
        Metadata {
            file_name: self.embedded_file_name.clone(),
            encrypted: self.use_encryption,
            random_embedding: self.random_embedding,
            lsb_bits: self.lsb_bits,
        }
    }
}

/// Parameters for [`decrypt`]; must match those used to embed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptConfig {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub is_scrambled: bool,
    #[serde(default)]
    pub is_encrypted: bool,
    #[serde(default = "default_lsb_bits", alias = "lsbBits")]
    pub bits_per_byte: u8,
    #[serde(default)]
    pub key_derivation: KeyDerivation,
    #[serde(default = "default_step")]
    pub step: usize,
    #[serde(default)]
    pub start_frame: usize,
    #[serde(default)]
    pub max_bytes: Option<usize>,
}

impl fmt::Debug for DecryptConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecryptConfig")
            .field("key", &self.key.as_ref().map(|_| ".."))
            .field("is_scrambled", &self.is_scrambled)
            .field("is_encrypted", &self.is_encrypted)
            .field("bits_per_byte", &self.bits_per_byte)
            .field("key_derivation", &self.key_derivation)
            .field("step", &self.step)
            .field("start_frame", &self.start_frame)
            .field("max_bytes", &self.max_bytes)
            .finish()
    }
}

impl DecryptConfig {
    pub fn new(
        key: Option<&str>,
        is_scrambled: bool,
        is_encrypted: bool,
        bits_per_byte: u8,
    ) -> Self {
        Self {
            key: key.map(str::to_owned),
            is_scrambled,
            is_encrypted,
            bits_per_byte,
            key_derivation: KeyDerivation::default(),
            step: default_step(),
            start_frame: 0,
            max_bytes: None,
        }
    }

    pub fn with_key_derivation(mut self, derivation: KeyDerivation) -> Self {
        self.key_derivation = derivation;
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

    pub fn with_max_bytes(mut self, max: Option<usize>) -> Self {
        self.max_bytes = max;
        self
    }
}

/// Result of [`encrypt`].
#[derive(Debug, Clone)]
pub struct EncryptOutput {
    /// Copy of the carrier with the payload embedded.
    pub carrier: Vec<u8>,
    /// PSNR in dB between input and output carrier bytes.
    pub psnr: f64,
    pub report: EmbedReport,
    pub metadata: Metadata,
}

/// Result of [`decrypt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptOutput {
    pub metadata: Metadata,
    pub secret: Vec<u8>,
}

fn key_schedule(
    key: Option<&str>,
    derivation: KeyDerivation,
    want_cipher: bool,
    want_scramble: bool,
) -> Result<KeySchedule, StegoError> {
    if !want_cipher && !want_scramble {
        return Ok(KeySchedule::default());
    }
    match key {
        Some(k) if !k.is_empty() => KeySchedule::derive(k, derivation, want_cipher, want_scramble),
        _ => Err(StegoError::MissingKey),
    }
}

fn plan(
    bits_per_byte: u8,
    step: usize,
    start_frame: usize,
    max_bytes: Option<usize>,
    schedule: &KeySchedule,
) -> EmbeddingPlan {
    EmbeddingPlan::default()
        .with_bits_per_byte(bits_per_byte)
        .with_step(step)
        .with_start_frame(start_frame)
        .with_scramble_seed(schedule.scramble_seed)
        .with_max_bytes(max_bytes)
}

/// Embed `secret` into a copy of `carrier`.
///
/// # Arguments
/// - `config`: File name, flags, key and embedding parameters.
/// - `carrier`: Raw bytes of the cover MP3.
/// - `secret`: The file contents to hide.
///
/// # Errors
/// - [`StegoError::MissingKey`] if encryption or random embedding is
///   requested without a key.
/// - [`StegoError::InvalidPlan`] if `lsb_bits` or `step` is out of range.
/// - [`StegoError::MessageTooLarge`] if the container does not fit. The
///   input carrier is never modified.
pub fn encrypt(
    config: &EncryptConfig,
    carrier: &[u8],
    secret: &[u8],
) -> Result<EncryptOutput, StegoError> {
    let schedule = key_schedule(
        config.encryption_key.as_deref(),
        config.key_derivation,
        config.use_encryption,
        config.random_embedding,
    )?;
    let plan = plan(config.lsb_bits, config.step, config.start_frame, config.max_bytes, &schedule);
    plan.validate()?;

    let metadata = config.metadata();
    let body = payload::encode_container(
        &metadata,
        secret,
        schedule.cipher_key.as_deref().map(Vec::as_slice),
    )?;

    let stream = Mp3Stream::scan(carrier);
    let mut out = carrier.to_vec();
    let report = codec::embed(&mut out, stream.frames(), &body, &plan)?;
    let psnr = distortion::psnr(carrier, &out);

    tracing::debug!(
        frames = stream.len(),
        secret_len = secret.len(),
        encrypted = config.use_encryption,
        scrambled = config.random_embedding,
        psnr,
        "encrypt complete"
    );
    Ok(EncryptOutput {
        carrier: out,
        psnr,
        report,
        metadata,
    })
}

/// Recover the metadata and secret from a carrier written by [`encrypt`].
///
/// # Errors
/// - [`StegoError::MissingKey`] if `is_scrambled` or `is_encrypted` is set
///   without a key.
/// - [`StegoError::Decode`] if no length prefix is found, the carrier is
///   shorter than the declared payload, or the metadata does not parse
///   (usually a wrong key or mismatched parameters).
pub fn decrypt(carrier: &[u8], config: &DecryptConfig) -> Result<DecryptOutput, StegoError> {
    let schedule = key_schedule(
        config.key.as_deref(),
        config.key_derivation,
        config.is_encrypted,
        config.is_scrambled,
    )?;
    let plan = plan(
        config.bits_per_byte,
        config.step,
        config.start_frame,
        config.max_bytes,
        &schedule,
    );

    let stream = Mp3Stream::scan(carrier);
    let body = codec::extract(carrier, stream.frames(), &plan)?.into_body()?;
    let cipher_key = schedule.cipher_key.as_deref().map(Vec::as_slice);
    let container = payload::decode_container(&body, cipher_key)?;

    let meta = &container.metadata;
    if meta.encrypted != config.is_encrypted
        || meta.random_embedding != config.is_scrambled
        || meta.lsb_bits != config.bits_per_byte
    {
        tracing::warn!(
            recorded_encrypted = meta.encrypted,
            recorded_scrambled = meta.random_embedding,
            recorded_lsb_bits = meta.lsb_bits,
            "embedded flags differ from decrypt parameters"
        );
    }
    tracing::debug!(secret_len = container.secret.len(), "decrypt complete");

    Ok(DecryptOutput {
        metadata: container.metadata,
        secret: container.secret,
    })
}

/// Embed raw bytes with the codec only: no metadata, no cipher.
pub fn embed_binary(
    carrier: &[u8],
    payload: &[u8],
    plan: &EmbeddingPlan,
) -> Result<(Vec<u8>, EmbedReport), StegoError> {
    let stream = Mp3Stream::scan(carrier);
    let mut out = carrier.to_vec();
    let report = codec::embed(&mut out, stream.frames(), payload, plan)?;
    Ok((out, report))
}

/// Extract raw bytes written by [`embed_binary`].
pub fn extract_binary(carrier: &[u8], plan: &EmbeddingPlan) -> Result<Vec<u8>, StegoError> {
    let stream = Mp3Stream::scan(carrier);
    Ok(codec::extract(carrier, stream.frames(), plan)?.into_body()?)
}

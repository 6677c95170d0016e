// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Payload obfuscation and key derivation.
//!
//! The payload cipher is a byte-wise additive (Vigenère-style) cipher:
//! `c[i] = p[i] + k[i mod len(k)] (mod 256)`. It hides the metadata and
//! secret from casual inspection but is **not** encryption: a few bytes of
//! known plaintext reveal the key stream. There is no authentication tag,
//! so a wrong key yields garbage rather than an error.
//!
//! Every passphrase first goes through [`derive_key`] (the additive cipher
//! against a built-in key). From there two schedules exist:
//!
//! - **Separated** (default): the derived key is stretched with Argon2id
//!   under two fixed, distinct salts into an independent cipher key and an
//!   independent scramble seed. Knowing one says nothing about the other.
//! - **Legacy**: the derived key is the cipher key and `(Σ bytes)²` of it
//!   is the scramble seed, so both uses share one small secret. Kept for
//!   carriers written with that scheme.

use argon2::Argon2;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::stego::error::StegoError;
use crate::stego::permute::ScrambleSeed;

/// Built-in key the passphrase is enciphered against by [`derive_key`].
pub const BUILTIN_KEY: &[u8] = b"ilovedota2";

/// Fixed salt for the cipher-key branch of the separated schedule.
const CIPHER_SALT: &[u8; 16] = b"ancilla-cipher1\0";

/// Fixed salt for the scramble-seed branch of the separated schedule.
/// Different from [`CIPHER_SALT`] so the two outputs are unrelated.
const SCRAMBLE_SALT: &[u8; 16] = b"ancilla-scramb1\0";

/// Length of keys produced by the separated schedule.
pub const DERIVED_KEY_LEN: usize = 32;

/// Add `key` to `data` in place, cycling the key. An empty key is a no-op.
pub fn encipher_in_place(data: &mut [u8], key: &[u8]) {
    if key.is_empty() {
        return;
    }
    for (b, k) in data.iter_mut().zip(key.iter().cycle()) {
        *b = b.wrapping_add(*k);
    }
}

/// Subtract `key` from `data` in place; inverse of [`encipher_in_place`].
pub fn decipher_in_place(data: &mut [u8], key: &[u8]) {
    if key.is_empty() {
        return;
    }
    for (b, k) in data.iter_mut().zip(key.iter().cycle()) {
        *b = b.wrapping_sub(*k);
    }
}

pub fn encipher(data: &[u8], key: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    encipher_in_place(&mut out, key);
    out
}

pub fn decipher(data: &[u8], key: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    decipher_in_place(&mut out, key);
    out
}

/// Encipher the passphrase against [`BUILTIN_KEY`].
pub fn derive_key(passphrase: &str) -> Zeroizing<Vec<u8>> {
    Zeroizing::new(encipher(passphrase.as_bytes(), BUILTIN_KEY))
}

/// Square of the byte sum of `key` (wrapping on overflow).
pub fn derive_seed(key: &[u8]) -> u64 {
    let sum = key.iter().fold(0u64, |acc, &b| acc.wrapping_add(b as u64));
    sum.wrapping_mul(sum)
}

/// How a passphrase becomes the cipher key and scramble seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyDerivation {
    #[default]
    Separated,
    Legacy,
}

/// Key material for one embed or decrypt call. Never persisted.
#[derive(Default)]
pub struct KeySchedule {
    pub cipher_key: Option<Zeroizing<Vec<u8>>>,
    pub scramble_seed: Option<ScrambleSeed>,
}

impl KeySchedule {
    /// Derive only the parts that are requested.
    pub fn derive(
        passphrase: &str,
        derivation: KeyDerivation,
        want_cipher: bool,
        want_scramble: bool,
    ) -> Result<Self, StegoError> {
        let base = derive_key(passphrase);
        let mut schedule = Self::default();

        match derivation {
            KeyDerivation::Separated => {
                if want_cipher {
                    let mut key = Zeroizing::new(vec![0u8; DERIVED_KEY_LEN]);
                    Argon2::default().hash_password_into(&base, CIPHER_SALT, &mut key)?;
                    schedule.cipher_key = Some(key);
                }
                if want_scramble {
                    let mut seed = Zeroizing::new([0u8; 32]);
                    Argon2::default().hash_password_into(&base, SCRAMBLE_SALT, &mut *seed)?;
                    schedule.scramble_seed = Some(ScrambleSeed(*seed));
                }
            }
            KeyDerivation::Legacy => {
                if want_scramble {
                    schedule.scramble_seed = Some(ScrambleSeed::from_u64(derive_seed(&base)));
                }
                if want_cipher {
                    schedule.cipher_key = Some(base);
                }
            }
        }

        tracing::debug!(
            ?derivation,
            cipher = schedule.cipher_key.is_some(),
            scramble = schedule.scramble_seed.is_some(),
            "derived key schedule"
        );
        Ok(schedule)
    }
}

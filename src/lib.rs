// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! # ancilla-core
//!
//! Hides files in the ancillary bytes of MPEG audio frames: the tail of each
//! frame's main-data region that the side information says is unused. Only
//! the low bits of those bytes change; headers, side information and the
//! estimated Huffman data are left as they are.
//!
//! The `mp3` module is the container layer (frame scanner, side-info parser,
//! ancillary locator) and knows nothing about payloads. The `stego` module
//! builds the embedding plan, codec, obfuscation and the encrypt/decrypt
//! pipeline on top of it.
//!
//! The ancillary region is an estimate from `part2_3_length` and ignores the
//! bit reservoir, so some players may still read embedded bytes. The cipher
//! is obfuscation, not encryption.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use ancilla_core::{decrypt, encrypt, DecryptConfig, EncryptConfig};
//!
//! let mp3 = std::fs::read("song.mp3").unwrap();
//! let config = EncryptConfig::new("note.txt").with_key("pw").with_encryption(true);
//! let out = encrypt(&config, &mp3, b"secret").unwrap();
//! let got = decrypt(&out.carrier, &DecryptConfig::new(Some("pw"), false, true, 1)).unwrap();
//! assert_eq!(got.secret, b"secret");
//! ```

pub mod mp3;
pub mod stego;

pub use mp3::error::{Mp3Error, Result as Mp3Result};
pub use mp3::frame::Frame;
pub use mp3::header::FrameHeader;
pub use mp3::Mp3Stream;
pub use stego::{decrypt, encrypt, DecryptConfig, DecryptOutput, EncryptConfig, EncryptOutput};
pub use stego::{embed_binary, extract_binary, EmbedReport, EmbeddingPlan};
pub use stego::{capacity_bits, inspect, message_capacity, CarrierReport};
pub use stego::{DecodeError, KeyDerivation, Metadata, ScrambleSeed, StegoError};

// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Container serialization: metadata record plus secret bytes.
//!
//! The container body sits inside the length-prefixed frame (see
//! [`crate::stego::framing`]):
//!
//! ```text
//! [4 bytes] metadata_len M (u32 BE, never enciphered)
//! [M bytes] metadata, UTF-8 JSON with keys "fn", "en", "re", "ls"
//! [N bytes] secret bytes, raw
//! ```
//!
//! When a cipher key is supplied, `metadata || secret` is run through the
//! additive cipher as one stream. The metadata length stays in clear so a
//! wrong key still splits the body at the right place and then fails on
//! the JSON parse.

use serde::{Deserialize, Serialize};

use crate::stego::crypto;
use crate::stego::error::{DecodeError, StegoError};

const METADATA_LEN_BYTES: usize = 4;

/// Record describing the embedded file and how it was embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "fn")]
    pub file_name: String,
    #[serde(rename = "en")]
    pub encrypted: bool,
    #[serde(rename = "re")]
    pub random_embedding: bool,
    #[serde(rename = "ls")]
    pub lsb_bits: u8,
}

impl Metadata {
    /// Extension of the embedded file name, without the dot.
    pub fn extension(&self) -> Option<&str> {
        match self.file_name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => Some(ext),
            _ => None,
        }
    }
}

/// Decoded container contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub metadata: Metadata,
    pub secret: Vec<u8>,
}

/// Serialized size of the metadata record.
pub fn metadata_len(metadata: &Metadata) -> Result<usize, StegoError> {
    serde_json::to_vec(metadata)
        .map(|json| json.len())
        .map_err(StegoError::Metadata)
}

/// Body bytes a container with `metadata` and `secret_len` secret bytes needs.
pub fn container_len(metadata: &Metadata, secret_len: usize) -> Result<usize, StegoError> {
    Ok(METADATA_LEN_BYTES + metadata_len(metadata)? + secret_len)
}

/// Serialize a container body, enciphering `metadata || secret` if a key is given.
pub fn encode_container(
    metadata: &Metadata,
    secret: &[u8],
    cipher_key: Option<&[u8]>,
) -> Result<Vec<u8>, StegoError> {
    let json = serde_json::to_vec(metadata).map_err(StegoError::Metadata)?;
    let meta_len = u32::try_from(json.len())
        .map_err(|_| StegoError::InvalidPlan("metadata record too large"))?;

    let mut body = Vec::with_capacity(METADATA_LEN_BYTES + json.len() + secret.len());
    body.extend_from_slice(&meta_len.to_be_bytes());
    body.extend_from_slice(&json);
    body.extend_from_slice(secret);

    if let Some(key) = cipher_key {
        crypto::encipher_in_place(&mut body[METADATA_LEN_BYTES..], key);
    }
    Ok(body)
}

/// Split and parse a container body, deciphering first if a key is given.
pub fn decode_container(body: &[u8], cipher_key: Option<&[u8]>) -> Result<Container, DecodeError> {
    if body.len() < METADATA_LEN_BYTES {
        return Err(DecodeError::MetadataLength {
            declared: METADATA_LEN_BYTES,
            available: body.len(),
        });
    }
    let (len_bytes, rest) = body.split_at(METADATA_LEN_BYTES);
    let meta_len =
        u32::from_be_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]) as usize;
    if meta_len > rest.len() {
        return Err(DecodeError::MetadataLength {
            declared: meta_len,
            available: rest.len(),
        });
    }

    let mut plain = rest.to_vec();
    if let Some(key) = cipher_key {
        crypto::decipher_in_place(&mut plain, key);
    }
    let secret = plain.split_off(meta_len);
    let metadata: Metadata =
        serde_json::from_slice(&plain).map_err(DecodeError::InvalidMetadata)?;

    Ok(Container { metadata, secret })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str) -> Metadata {
        Metadata {
            file_name: name.to_string(),
            encrypted: false,
            random_embedding: false,
            lsb_bits: 1,
        }
    }

    #[test]
    fn metadata_uses_short_keys() {
        let json = serde_json::to_string(&meta("a.txt")).unwrap();
        assert_eq!(json, r#"{"fn":"a.txt","en":false,"re":false,"ls":1}"#);
    }

    #[test]
    fn extension() {
        assert_eq!(meta("secret.tar.gz").extension(), Some("gz"));
        assert_eq!(meta("notes.txt").extension(), Some("txt"));
        assert_eq!(meta("README").extension(), None);
        assert_eq!(meta("trailing.").extension(), None);
    }

    #[test]
    fn plain_container_layout() {
        let m = meta("x");
        let body = encode_container(&m, b"hi", None).unwrap();
        let json_len = metadata_len(&m).unwrap();
        assert_eq!(&body[..4], &(json_len as u32).to_be_bytes());
        assert_eq!(&body[4..4 + json_len], serde_json::to_vec(&m).unwrap().as_slice());
        assert_eq!(&body[4 + json_len..], b"hi");
        assert_eq!(body.len(), container_len(&m, 2).unwrap());

        let c = decode_container(&body, None).unwrap();
        assert_eq!(c.metadata, m);
        assert_eq!(c.secret, b"hi");
    }

    #[test]
    fn cipher_leaves_metadata_length_clear() {
        let m = Metadata { encrypted: true, ..meta("doc.pdf") };
        let plain = encode_container(&m, b"payload", None).unwrap();
        let ciphered = encode_container(&m, b"payload", Some(b"k3y")).unwrap();
        assert_eq!(&plain[..4], &ciphered[..4]);
        assert_ne!(&plain[4..], &ciphered[4..]);

        let c = decode_container(&ciphered, Some(b"k3y")).unwrap();
        assert_eq!(c.secret, b"payload");
        assert_eq!(c.metadata, m);
    }

    #[test]
    fn wrong_key_fails_on_metadata() {
        let body = encode_container(&meta("a"), b"z", Some(b"right")).unwrap();
        assert!(matches!(
            decode_container(&body, Some(b"wrong")),
            Err(DecodeError::InvalidMetadata(_))
        ));
    }

    #[test]
    fn metadata_length_past_end() {
        let body = [0x00, 0x00, 0x01, 0x00, b'{'];
        assert!(matches!(
            decode_container(&body, None),
            Err(DecodeError::MetadataLength { declared: 256, available: 1 })
        ));
        assert!(matches!(
            decode_container(&[0, 0], None),
            Err(DecodeError::MetadataLength { .. })
        ));
    }

    #[test]
    fn empty_secret() {
        let body = encode_container(&meta("empty"), b"", None).unwrap();
        let c = decode_container(&body, None).unwrap();
        assert!(c.secret.is_empty());
    }
}

// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! End-to-end encrypt/decrypt and raw embed/extract on synthetic carriers.

mod common;

use ancilla_core::stego::codec;
use ancilla_core::stego::crypto::{derive_key, derive_seed};
use ancilla_core::{
    capacity_bits, decrypt, embed_binary, encrypt, extract_binary, inspect, message_capacity,
    DecodeError, DecryptConfig, EmbeddingPlan, EncryptConfig, KeyDerivation, Metadata, Mp3Stream,
    StegoError,
};

// ---------------------------------------------------------------------------
// Capacity scenario: 100 frames x 10 ancillary bytes
// ---------------------------------------------------------------------------

#[test]
fn hundred_frame_carrier_has_expected_capacity() {
    let data = common::carrier(100, 10);
    let report = inspect(&data);
    assert_eq!(report.frame_count, 100);
    assert_eq!(report.total_ancillary_bytes, 1000);
    let cap = capacity_bits(&data, &EmbeddingPlan::default()).unwrap();
    assert!(cap >= 800);
    assert_eq!(cap, 1000);
}

#[test]
fn fifty_byte_secret_fits() {
    let data = common::carrier(100, 10);
    let secret: Vec<u8> = (0..50).collect();
    let out = encrypt(&EncryptConfig::new("s"), &data, &secret).unwrap();
    assert!(out.report.bits_written <= out.report.capacity_bits);

    let got = decrypt(&out.carrier, &DecryptConfig::new(None, false, false, 1)).unwrap();
    assert_eq!(got.secret, secret);
}

#[test]
fn two_thousand_byte_secret_is_rejected_before_writing() {
    let data = common::carrier(100, 10);
    let err = encrypt(&EncryptConfig::new("big.bin"), &data, &[0xAA; 2000]).unwrap_err();
    match err {
        StegoError::MessageTooLarge { needed_bits, capacity_bits } => {
            assert!(needed_bits > 16_000);
            assert_eq!(capacity_bits, 1000);
        }
        other => panic!("expected MessageTooLarge, got {other:?}"),
    }

    // Codec level: the buffer handed in is left exactly as it was.
    let mut buf = data.clone();
    let stream = Mp3Stream::scan(&data);
    let res = codec::embed(&mut buf, stream.frames(), &[0xAA; 2000], &EmbeddingPlan::default());
    assert!(res.is_err());
    assert_eq!(buf, data);
}

#[test]
fn message_capacity_is_exact() {
    let data = common::carrier(40, 25);
    let plan = EmbeddingPlan::default().with_bits_per_byte(2);
    let meta = Metadata {
        file_name: "f.dat".into(),
        encrypted: false,
        random_embedding: false,
        lsb_bits: 2,
    };
    let max = message_capacity(&data, &plan, &meta).unwrap();
    let config = EncryptConfig::new("f.dat").with_lsb_bits(2);
    assert!(encrypt(&config, &data, &vec![1u8; max]).is_ok());
    assert!(matches!(
        encrypt(&config, &data, &vec![1u8; max + 1]),
        Err(StegoError::MessageTooLarge { .. })
    ));
}

// ---------------------------------------------------------------------------
// Key handling
// ---------------------------------------------------------------------------

#[test]
fn legacy_seed_is_deterministic() {
    let a = derive_seed(&derive_key("pw"));
    let b = derive_seed(&derive_key("pw"));
    assert_eq!(a, b);
}

#[test]
fn legacy_and_separated_schedules_are_not_interchangeable() {
    let data = common::carrier(120, 12);
    let config = EncryptConfig::new("k.txt")
        .with_key("pw")
        .with_encryption(true)
        .with_random_embedding(true)
        .with_key_derivation(KeyDerivation::Legacy);
    let out = encrypt(&config, &data, b"legacy carrier").unwrap();

    let legacy =
        DecryptConfig::new(Some("pw"), true, true, 1).with_key_derivation(KeyDerivation::Legacy);
    assert_eq!(decrypt(&out.carrier, &legacy).unwrap().secret, b"legacy carrier");

    let separated = DecryptConfig::new(Some("pw"), true, true, 1);
    assert!(decrypt(&out.carrier, &separated).is_err());
}

#[test]
fn scrambled_embedding_needs_scrambled_extraction() {
    let data = common::carrier(60, 30);
    let config = EncryptConfig::new("a").with_key("pw").with_random_embedding(true);
    let out = encrypt(&config, &data, b"order matters").unwrap();

    let ok = DecryptConfig::new(Some("pw"), true, false, 1);
    assert_eq!(decrypt(&out.carrier, &ok).unwrap().secret, b"order matters");

    let unscrambled = DecryptConfig::new(Some("pw"), false, false, 1);
    assert!(matches!(decrypt(&out.carrier, &unscrambled), Err(StegoError::Decode(_))));
}

// ---------------------------------------------------------------------------
// Carrier variations
// ---------------------------------------------------------------------------

#[test]
fn roundtrip_through_id3_tag_and_junk() {
    let mut frames = vec![0x00, 0x13, 0xFF, 0x00];
    frames.extend(common::carrier(30, 20));
    let data = common::with_id3(&frames, 64);
    let report = inspect(&data);
    assert_eq!(report.tag_len, 74);
    assert_eq!(report.skipped_bytes, 4);
    assert_eq!(report.frame_count, 30);

    let config = EncryptConfig::new("tagged.txt").with_lsb_bits(3);
    let out = encrypt(&config, &data, b"behind a tag").unwrap();
    assert_eq!(&out.carrier[..74], &data[..74]);
    let got = decrypt(&out.carrier, &DecryptConfig::new(None, false, false, 3)).unwrap();
    assert_eq!(got.secret, b"behind a tag");
}

#[test]
fn roundtrip_mono_and_mpeg2_frames() {
    for header in [common::mpeg1_mono(), common::mpeg2_stereo()] {
        let anc: Vec<usize> = (0..50).map(|i| 5 + i % 11).collect();
        let data = common::carrier_with(&header, &anc, 99);
        assert_eq!(Mp3Stream::scan(&data).len(), 50);

        let plan = EmbeddingPlan::default().with_bits_per_byte(2);
        let (out, _) = embed_binary(&data, b"mixed geometry", &plan).unwrap();
        assert_eq!(extract_binary(&out, &plan).unwrap(), b"mixed geometry");
    }
}

#[test]
fn embedding_keeps_frame_layout() {
    let data = common::carrier(40, 16);
    let config = EncryptConfig::new("x").with_lsb_bits(4);
    let out = encrypt(&config, &data, &[0x5A; 100]).unwrap();
    assert_eq!(Mp3Stream::scan(&data).frames(), Mp3Stream::scan(&out.carrier).frames());
}

#[test]
fn only_ancillary_bytes_differ() {
    let data = common::carrier(80, 14);
    let mask = common::ancillary_mask(&data);
    let config = EncryptConfig::new("m.bin")
        .with_key("pw")
        .with_encryption(true)
        .with_random_embedding(true)
        .with_lsb_bits(2)
        .with_step(2)
        .with_start_frame(3);
    let out = encrypt(&config, &data, &[0xC3; 64]).unwrap();
    for (i, (a, b)) in data.iter().zip(&out.carrier).enumerate() {
        if !mask[i] {
            assert_eq!(a, b, "byte {i} outside ancillary regions changed");
        } else {
            assert_eq!(a & 0xFC, b & 0xFC, "high bits of byte {i} changed");
        }
    }
}

#[test]
fn max_bytes_caps_usage() {
    let data = common::carrier(30, 20);
    let plan = EmbeddingPlan::default().with_max_bytes(Some(100));
    assert_eq!(capacity_bits(&data, &plan).unwrap(), 100);
    // 100 bits hold the 32-bit prefix and 8 body bytes.
    let (out, report) = embed_binary(&data, b"capped!!", &plan).unwrap();
    assert_eq!(report.bytes_touched, 96);
    assert!(matches!(
        embed_binary(&data, &[0u8; 9], &plan),
        Err(StegoError::MessageTooLarge { .. })
    ));

    // Bytes past the cap are never touched.
    let slots: Vec<usize> = Mp3Stream::scan(&data)
        .frames()
        .iter()
        .flat_map(|f| f.ancillary_range())
        .collect();
    for &i in &slots[100..] {
        assert_eq!(out[i], data[i]);
    }

    assert_eq!(extract_binary(&out, &plan).unwrap(), b"capped!!");
}

#[test]
fn max_bytes_must_match_on_extraction() {
    let data = common::carrier(30, 20);
    let plan = EmbeddingPlan::default().with_max_bytes(Some(100));
    let (out, _) = embed_binary(&data, b"capped!!", &plan).unwrap();

    let tighter = plan.clone().with_max_bytes(Some(64));
    assert!(matches!(
        extract_binary(&out, &tighter),
        Err(StegoError::Decode(DecodeError::Truncated { declared: 8, available: 4 }))
    ));
}

// ---------------------------------------------------------------------------
// Extraction from carriers without a payload
// ---------------------------------------------------------------------------

#[test]
fn unmodified_carrier_never_panics() {
    for seed in 0..8 {
        let data = common::carrier_with(&common::mpeg1_stereo(), &[12; 40], seed);
        for bits in 1..=4 {
            let res = decrypt(&data, &DecryptConfig::new(None, false, false, bits));
            assert!(matches!(res, Err(StegoError::Decode(_))), "seed {seed}, bits {bits}");
        }
    }
}

#[test]
fn non_mp3_input_has_no_payload() {
    let res = extract_binary(b"plainly not audio", &EmbeddingPlan::default());
    assert!(matches!(res, Err(StegoError::Decode(DecodeError::NoPayload))));
    assert_eq!(inspect(b"plainly not audio").frame_count, 0);
}

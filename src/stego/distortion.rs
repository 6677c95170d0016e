// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Byte-level distortion between a carrier and its stego copy.
//!
//! Treats both buffers as 8-bit samples. This says nothing about audible
//! quality; it only shows how many low bits were disturbed.

/// Peak sample value for 8-bit data.
const PEAK: f64 = 255.0;

/// Mean squared difference over the common length of `a` and `b`.
pub fn mse(a: &[u8], b: &[u8]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let sum: u64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = x.abs_diff(y) as u64;
            d * d
        })
        .sum();
    sum as f64 / n as f64
}

/// Peak signal-to-noise ratio in dB; `f64::INFINITY` when nothing differs.
pub fn psnr(a: &[u8], b: &[u8]) -> f64 {
    let m = mse(a, b);
    if m == 0.0 {
        return f64::INFINITY;
    }
    10.0 * (PEAK * PEAK / m).log10()
}

// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Bit-level I/O for MPEG side information.
//!
//! [`BitReader`] is a bounds-checked cursor over a byte slice; every read
//! either returns the requested bits or fails with
//! [`Mp3Error::UnexpectedEof`] without moving the cursor. [`BitWriter`] is
//! its inverse and is used to synthesize side information. Both operate in
//! MSB-first bit order.

use super::error::{Mp3Error, Result};

/// Bit cursor over a byte slice, MSB-first.
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Absolute bit position from the start of `data`.
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Read `count` bits (0–32) and return them right-aligned.
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        debug_assert!(count <= 32);
        let count = count as usize;
        if self.pos + count > self.bit_len() {
            return Err(Mp3Error::UnexpectedEof);
        }
        let mut val = 0u32;
        for _ in 0..count {
            let byte = self.data[self.pos / 8];
            let bit = (byte >> (7 - (self.pos % 8))) & 1;
            val = (val << 1) | bit as u32;
            self.pos += 1;
        }
        Ok(val)
    }

    /// Advance past `count` bits whose values are not needed.
    pub fn skip_bits(&mut self, count: usize) -> Result<()> {
        if self.pos + count > self.bit_len() {
            return Err(Mp3Error::UnexpectedEof);
        }
        self.pos += count;
        Ok(())
    }

    /// Current bit position.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn bit_len(&self) -> usize {
        self.data.len() * 8
    }
}

/// Bit-level writer, MSB-first. The final partial byte is zero-padded.
pub struct BitWriter {
    output: Vec<u8>,
    buf: u8,
    bits_used: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self {
            output: Vec::new(),
            buf: 0,
            bits_used: 0,
        }
    }

    /// Write `count` bits (0–32) from the low bits of `value`.
    pub fn write_bits(&mut self, value: u32, count: u8) {
        debug_assert!(count <= 32);
        for i in (0..count).rev() {
            let bit = (value >> i) & 1;
            self.buf = (self.buf << 1) | bit as u8;
            self.bits_used += 1;
            if self.bits_used == 8 {
                self.output.push(self.buf);
                self.buf = 0;
                self.bits_used = 0;
            }
        }
    }

    /// Pad remaining bits with zeros and return the bytes.
    pub fn flush(mut self) -> Vec<u8> {
        if self.bits_used > 0 {
            self.buf <<= 8 - self.bits_used;
            self.output.push(self.buf);
        }
        self.output
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

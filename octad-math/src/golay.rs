// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Octad-Proprietary
// See LICENSE in the repository root for full license terms.

//! Extended Binary Golay Code \[24, 12, 8\]
//!
//! The extended Golay code is a self-dual binary code and the algebraic
//! foundation of the Leech lattice: every Leech minimal vector is described
//! in terms of Golay codewords or octads.
//!
//! # Construction
//!
//! Systematic generator `G = [I_12 | B]` where `B` is the classic 12x12
//! block: an 11x11 circulant over the quadratic residues mod 11, bordered
//! by an all-ones row and column (zero corner). `B` is symmetric and
//! `B * B = I` over GF(2), which the decoder relies on. The parity-check
//! matrix is `H = [Bᵗ | I_12]`.
//!
//! # Weight Distribution
//!
//! | Weight | Count | Name |
//! |--------|-------|------|
//! | 0      | 1     | zero word |
//! | 8      | 759   | octads |
//! | 12     | 2576  | dodecads |
//! | 16     | 759   | complements of octads |
//! | 24     | 1     | all-ones word |
//! | **Total** | **4096** | |
//!
//! # Decoding
//!
//! Two-stage syndrome search correcting every error pattern of weight <= 3:
//! the syndrome `s = r · Hᵗ` is checked directly (weight <= 3) and against
//! each row of `B` (weight <= 2); then the same two checks run on the
//! second syndrome `s · B`. A received word that survives all four stages
//! is more than 3 errors from every codeword and is reported as
//! uncorrectable — never silently "corrected" with a wrong guess.

use crate::error::{MathError, Result};

/// Rows of the `B` block as 12-bit masks (bit j = column j).
///
/// Row k (k < 11): bit j set iff (j + k) mod 11 is in {0} ∪ QR(11)
/// = {0, 1, 3, 4, 5, 9}, plus bit 11. Row 11 is all ones except bit 11.
const B_ROWS: [u16; 12] = [
    0xA3B, // 0,1,3,4,5,9,11
    0xD1D, // 0,2,3,4,8,10,11
    0xE8E, // 1,2,3,7,9,10,11
    0xB47, // 0,1,2,6,8,9,11
    0xDA3, // 0,1,5,7,8,10,11
    0xED1, // 0,4,6,7,9,10,11
    0xF68, // 3,5,6,8,9,10,11
    0xBB4, // 2,4,5,7,8,9,11
    0x9DA, // 1,3,4,6,7,8,11
    0x8ED, // 0,2,3,5,6,7,11
    0xC76, // 1,2,4,5,6,10,11
    0x7FF, // 0..=10
];

const WORD_MASK: u32 = 0xFF_FFFF;
const HALF_MASK: u32 = 0xFFF;

/// Multiply a 12-bit row vector by `B`: XOR of the rows selected by `m`.
fn times_b(m: u16) -> u16 {
    let mut acc = 0u16;
    let mut bits = m;
    while bits != 0 {
        let i = bits.trailing_zeros() as usize;
        acc ^= B_ROWS[i];
        bits &= bits - 1;
    }
    acc
}

/// The Extended Binary Golay Code \[24, 12, 8\].
///
/// Encoding and decoding are stateless (the `B` block is fixed); an
/// instance additionally carries the full codeword table and the octad
/// index used by the Leech lattice constructors.
#[derive(Debug, Clone)]
pub struct GolayCode {
    /// All 4096 codewords as packed 24-bit integers (bit i = coordinate i).
    codewords: Vec<u32>,
    /// Messages whose codewords have weight 8 (the 759 octads).
    octad_messages: Vec<u16>,
}

impl GolayCode {
    /// Generate all 4096 codewords and identify the 759 octads.
    pub fn new() -> Self {
        let mut codewords = Vec::with_capacity(4096);
        let mut octad_messages = Vec::with_capacity(759);

        for msg in 0u16..4096 {
            let cw = Self::encode(msg);
            if cw.count_ones() == 8 {
                octad_messages.push(msg);
            }
            codewords.push(cw);
        }

        Self {
            codewords,
            octad_messages,
        }
    }

    /// Encode a 12-bit message into a 24-bit codeword.
    ///
    /// Systematic: bits 0-11 carry the message, bits 12-23 the parity half
    /// `m · B`.
    pub fn encode(msg: u16) -> u32 {
        assert!(msg < 4096, "message must be 12 bits (0..4096)");
        (msg as u32) | ((times_b(msg) as u32) << 12)
    }

    /// Syndrome `r · Hᵗ` of a 24-bit word with `H = [Bᵗ | I_12]`.
    ///
    /// Zero exactly for codewords.
    pub fn syndrome(word: u32) -> u16 {
        let r1 = (word & HALF_MASK) as u16;
        let r2 = ((word >> 12) & HALF_MASK as u32) as u16;
        times_b(r1) ^ r2
    }

    /// Check whether a 24-bit word is a codeword.
    pub fn is_codeword(word: u32) -> bool {
        Self::syndrome(word & WORD_MASK) == 0
    }

    /// Decode a received 24-bit word to the nearest codeword, correcting
    /// up to 3 bit errors.
    ///
    /// Returns the corrected codeword and the number of corrected bits.
    /// Fails with [`MathError::Uncorrectable`] when the word is beyond the
    /// code's correction radius (distance > 3 from every codeword).
    pub fn decode(received: u32) -> Result<(u32, u32)> {
        let r = received & WORD_MASK;
        let s = Self::syndrome(r);

        let error: u32 = if s == 0 {
            0
        } else if s.count_ones() <= 3 {
            // Errors confined to the parity half.
            (s as u32) << 12
        } else if let Some((i, tail)) = Self::row_match(s, 2) {
            // One error in the message half at position i, the rest in the
            // parity half.
            (1 << i) | ((tail as u32) << 12)
        } else {
            // Transform with the second syndrome q = s · B. Since B² = I,
            // the same two checks now locate errors in the message half.
            let q = times_b(s);
            if q.count_ones() <= 3 {
                q as u32
            } else if let Some((i, head)) = Self::row_match(q, 2) {
                (head as u32) | (1 << (12 + i))
            } else {
                return Err(MathError::Uncorrectable);
            }
        };

        Ok((r ^ error, error.count_ones()))
    }

    /// Find a row `b_i` with `weight(s ^ b_i) <= max_weight`.
    fn row_match(s: u16, max_weight: u32) -> Option<(usize, u16)> {
        B_ROWS.iter().enumerate().find_map(|(i, &row)| {
            let residue = s ^ row;
            (residue.count_ones() <= max_weight).then_some((i, residue))
        })
    }

    /// All 4096 codewords as packed 24-bit integers.
    pub fn codewords(&self) -> &[u32] {
        &self.codewords
    }

    /// Number of octads (always 759).
    pub fn num_octads(&self) -> usize {
        self.octad_messages.len()
    }

    /// The 759 octads as sets of 8 coordinate indices.
    ///
    /// The octads form a Steiner system S(5, 8, 24): any 5 of the 24
    /// coordinates lie in exactly one octad.
    pub fn octads(&self) -> Vec<[usize; 8]> {
        self.octad_messages
            .iter()
            .map(|&msg| Self::support8(self.codewords[msg as usize]))
            .collect()
    }

    /// Support of a weight-8 codeword as sorted coordinate indices.
    fn support8(cw: u32) -> [usize; 8] {
        debug_assert_eq!(cw.count_ones(), 8);
        let mut positions = [0usize; 8];
        let mut pos = 0;
        for bit in 0..24 {
            if cw & (1 << bit) != 0 {
                positions[pos] = bit;
                pos += 1;
            }
        }
        positions
    }

    /// Unpack a 24-bit word into a coordinate array.
    pub fn to_bits(word: u32) -> [u8; 24] {
        let mut bits = [0u8; 24];
        for (i, b) in bits.iter_mut().enumerate() {
            *b = ((word >> i) & 1) as u8;
        }
        bits
    }

    /// Pack a coordinate array into a 24-bit word.
    pub fn from_bits(bits: &[u8]) -> u32 {
        assert!(bits.len() >= 24);
        let mut word = 0u32;
        for (i, &b) in bits.iter().take(24).enumerate() {
            if b != 0 {
                word |= 1 << i;
            }
        }
        word
    }
}

impl Default for GolayCode {
    fn default() -> Self {
        Self::new()
    }
}

//! Coxeter-Todd Lattice K12
//!
//! The densest known lattice packing in 12 dimensions: even, determinant
//! 729, minimum squared norm 4, kissing number 756.
//!
//! # Construction
//!
//! Over the Eisenstein integers E = Z[ω] (ω² = −1 − ω), reduction mod 2
//! gives E/2E ≅ GF(4). K12 is the preimage of the hexacode:
//!
//! ```text
//! K12 = { v ∈ E⁶ : v mod 2E ∈ H }
//! ```
//!
//! where H is the \[6, 3, 4\] hexacode over GF(4), presented as
//! `(a, b, c, φ(1), φ(ω), φ(ω²))` for quadratics `φ(x) = ax² + bx + c`.
//! Hexacode weights are 0, 4, and 6, which is what makes the lattice even.
//!
//! Each complex coordinate `a + bω` is carried as an integer pair, the
//! 18 module generators (3 lifted hexacode generators and 2E⁶, each with
//! its ω-multiple) are reduced to a 12-row integer basis of index 64 in
//! E⁶, and the result is embedded into R¹² via 1 ↦ (1, 0),
//! ω ↦ (−1/2, √3/2). Index, rank, and determinant are validated at
//! construction.
//!
//! # Minimal Vectors
//!
//! | Shape                    | Count | Construction |
//! |--------------------------|-------|--------------|
//! | 2u·eᵢ                    | 36    | doubled unit on one coordinate |
//! | weight-4 hexacode lifts  | 720   | 45 codewords × 2⁴ unit signs |

use nalgebra::{DMatrix, DVector};

use super::{Lattice, LatticeBasis, LatticeFamily};
use crate::error::{MathError, Result};
use crate::linalg;

/// An Eisenstein integer a + bω as an integer pair.
type Eisenstein = (i64, i64);

/// The six Eisenstein units: ±1, ±ω, ±ω².
const UNITS: [Eisenstein; 6] = [(1, 0), (-1, 0), (0, 1), (0, -1), (-1, -1), (1, 1)];

/// GF(4) multiplication; elements encoded as 0, 1, ω = 2, ω² = 3
/// (bit 0 = 1-component, bit 1 = ω-component; addition is XOR).
fn f4_mul(x: u8, y: u8) -> u8 {
    const OMEGA: u8 = 2;
    const OMEGA2: u8 = 3;
    match (x, y) {
        (0, _) | (_, 0) => 0,
        (1, z) | (z, 1) => z,
        (OMEGA, OMEGA) => OMEGA2,
        (OMEGA, OMEGA2) | (OMEGA2, OMEGA) => 1,
        (OMEGA2, OMEGA2) => OMEGA,
        _ => unreachable!("GF(4) elements are 0..=3"),
    }
}

/// Lift a GF(4) symbol to its canonical Eisenstein unit (0 stays 0).
fn lift_symbol(sym: u8) -> Eisenstein {
    match sym {
        0 => (0, 0),
        1 => (1, 0),
        2 => (0, 1),
        3 => (-1, -1), // ω² = −1 − ω
        _ => unreachable!("GF(4) elements are 0..=3"),
    }
}

/// Multiply an Eisenstein integer by ω: ω(a + bω) = −b + (a − b)ω.
fn times_omega((a, b): Eisenstein) -> Eisenstein {
    (-b, a - b)
}

/// All 64 hexacode words `(a, b, c, φ(1), φ(ω), φ(ω²))`.
fn hexacode_words() -> Vec<[u8; 6]> {
    const OMEGA: u8 = 2;
    const OMEGA2: u8 = 3;
    let mut words = Vec::with_capacity(64);
    for a in 0..4u8 {
        for b in 0..4u8 {
            for c in 0..4u8 {
                // x² permutes {1, ω, ω²} to {1, ω², ω}.
                let phi1 = a ^ b ^ c;
                let phi_w = f4_mul(a, OMEGA2) ^ f4_mul(b, OMEGA) ^ c;
                let phi_w2 = f4_mul(a, OMEGA) ^ f4_mul(b, OMEGA2) ^ c;
                words.push([a, b, c, phi1, phi_w, phi_w2]);
            }
        }
    }
    words
}

/// The Coxeter-Todd lattice K12.
#[derive(Debug, Clone)]
pub struct CoxeterToddLattice {
    basis: LatticeBasis,
    /// Hexacode words of weight 4 (exactly 45), kept for enumeration.
    weight4_words: Vec<[u8; 6]>,
}

impl CoxeterToddLattice {
    pub const KISSING_NUMBER: usize = 756;

    /// Expected determinant of the Gram matrix.
    pub const GRAM_DETERMINANT: f64 = 729.0;

    pub fn new() -> Result<Self> {
        let words = hexacode_words();
        let weight4_words: Vec<[u8; 6]> = words
            .iter()
            .filter(|w| w.iter().filter(|&&s| s != 0).count() == 4)
            .copied()
            .collect();
        if weight4_words.len() != 45 {
            return Err(MathError::Configuration(format!(
                "hexacode enumeration produced {} weight-4 words, expected 45",
                weight4_words.len()
            )));
        }

        let basis = Self::construct_basis()?;
        Ok(Self {
            basis,
            weight4_words,
        })
    }

    fn construct_basis() -> Result<LatticeBasis> {
        // Z-module generators in (a, b)-pair coordinates:
        // the three lifted hexacode generators and 2eᵢ, each together with
        // its ω-multiple.
        let hex_generators: [[u8; 6]; 3] = [
            [1, 0, 0, 1, 3, 2], // φ(x) = x²
            [0, 1, 0, 1, 2, 3], // φ(x) = x
            [0, 0, 1, 1, 1, 1], // φ(x) = 1
        ];

        let mut generators: Vec<Vec<i128>> = Vec::with_capacity(18);
        let mut push_pair_row = |coords: [Eisenstein; 6]| {
            let mut row = vec![0i128; 12];
            for (i, (a, b)) in coords.iter().enumerate() {
                row[2 * i] = *a as i128;
                row[2 * i + 1] = *b as i128;
            }
            generators.push(row);
        };

        for gen in &hex_generators {
            let lifted: [Eisenstein; 6] = std::array::from_fn(|i| lift_symbol(gen[i]));
            push_pair_row(lifted);
            push_pair_row(std::array::from_fn(|i| times_omega(lifted[i])));
        }
        for i in 0..6 {
            let mut doubled = [(0i64, 0i64); 6];
            doubled[i] = (2, 0);
            push_pair_row(doubled);
            let mut doubled_omega = [(0i64, 0i64); 6];
            doubled_omega[i] = times_omega((2, 0));
            push_pair_row(doubled_omega);
        }

        let hnf = linalg::hermite_normal_form(generators, 12)?;
        let covolume: i128 = (0..12).map(|i| hnf[i][i]).product();
        if covolume.abs() != 64 {
            return Err(MathError::SingularBasis(format!(
                "K12 generator reduction produced index {covolume} in E⁶, expected 64"
            )));
        }

        // Embed each (a, b) pair as a + bω with 1 ↦ (1, 0), ω ↦ (−1/2, √3/2).
        let half_sqrt3 = 3.0f64.sqrt() / 2.0;
        let rows = DMatrix::from_fn(12, 12, |i, j| {
            let a = hnf[i][2 * (j / 2)] as f64;
            let b = hnf[i][2 * (j / 2) + 1] as f64;
            if j % 2 == 0 {
                a - b / 2.0
            } else {
                b * half_sqrt3
            }
        });
        let basis = LatticeBasis::new(rows)?;

        let gram_det = basis.gram().determinant().abs();
        if (gram_det - Self::GRAM_DETERMINANT).abs() > 1e-6 * Self::GRAM_DETERMINANT {
            return Err(MathError::SingularBasis(format!(
                "K12 Gram determinant {gram_det}, expected 729"
            )));
        }
        for i in 0..12 {
            let row = basis.rows().row(i).transpose();
            if basis.norm_is_even(&row) != Some(true) {
                return Err(MathError::SingularBasis(format!(
                    "K12 basis row {i} has odd or non-integer squared norm"
                )));
            }
        }

        Ok(basis)
    }

    /// Embed six Eisenstein coordinates into R¹².
    fn embed(coords: [Eisenstein; 6]) -> DVector<f64> {
        let half_sqrt3 = 3.0f64.sqrt() / 2.0;
        DVector::from_iterator(
            12,
            coords.iter().flat_map(|&(a, b)| {
                [a as f64 - b as f64 / 2.0, b as f64 * half_sqrt3]
            }),
        )
    }
}

impl Lattice for CoxeterToddLattice {
    fn family(&self) -> LatticeFamily {
        LatticeFamily::CoxeterTodd
    }

    fn basis(&self) -> &LatticeBasis {
        &self.basis
    }

    fn basis_mut(&mut self) -> &mut LatticeBasis {
        &mut self.basis
    }

    fn min_norm_sq(&self) -> f64 {
        4.0
    }

    fn kissing_number(&self) -> Option<usize> {
        Some(Self::KISSING_NUMBER)
    }

    /// Chunk 0: the 36 doubled units; chunk 1: the 720 weight-4 lifts.
    fn num_minimal_vector_chunks(&self) -> usize {
        2
    }

    fn minimal_vector_chunk(&self, chunk: usize) -> Result<Vec<DVector<f64>>> {
        Ok(match chunk {
            0 => {
                let mut vectors = Vec::with_capacity(36);
                for i in 0..6 {
                    for &u in &UNITS {
                        let mut coords = [(0i64, 0i64); 6];
                        coords[i] = (2 * u.0, 2 * u.1);
                        vectors.push(Self::embed(coords));
                    }
                }
                vectors
            }
            1 => {
                // Each nonzero symbol lifts to its unit times ±1; both
                // signs stay congruent mod 2E, so all 2⁴ choices are in
                // the lattice.
                let mut vectors = Vec::with_capacity(720);
                for word in &self.weight4_words {
                    let support: Vec<usize> =
                        (0..6).filter(|&i| word[i] != 0).collect();
                    for signs in 0..16u8 {
                        let mut coords = [(0i64, 0i64); 6];
                        for (k, &i) in support.iter().enumerate() {
                            let (a, b) = lift_symbol(word[i]);
                            let s = if signs & (1 << k) == 0 { 1 } else { -1 };
                            coords[i] = (s * a, s * b);
                        }
                        vectors.push(Self::embed(coords));
                    }
                }
                vectors
            }
            _ => {
                return Err(MathError::Configuration(format!(
                    "K12 has 2 enumeration chunks, requested {chunk}"
                )))
            }
        })
    }
}

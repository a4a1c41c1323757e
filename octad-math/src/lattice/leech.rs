//! Leech Lattice (24D)
//!
//! The Leech lattice Λ24 is the unique even unimodular lattice in 24
//! dimensions with no norm-2 vectors. It achieves the densest sphere
//! packing in 24D and the maximum kissing number: 196,560.
//!
//! # Construction
//!
//! Built on the Extended Golay Code C24 \[24, 12, 8\]. In integer
//! coordinates (before the 1/√8 scaling) the lattice is the union of two
//! cosets:
//! - Even: all coordinates even, `(x/2) mod 2 ∈ C24`, `Σxᵢ ≡ 0 (mod 8)`
//! - Odd:  all coordinates odd, `((x−1)/2) mod 2 ∈ C24`, `Σxᵢ ≡ 4 (mod 8)`
//!
//! A generating set follows directly from that description — doubled Golay
//! generators, `4eᵢ − 4e₂₄`, `8e₂₄`, and the odd-coset representative
//! `(−3, 1²³)` — and is reduced to a 24-row integer basis whose
//! determinant must come out to exactly 2³⁶ (the index of Λ in Z²⁴).
//! Scaling by 1/√8 then yields a unimodular basis with minimum squared
//! norm 4. Rank and determinant are validated at construction; failing
//! either is fatal.
//!
//! # Minimal Vectors (squared norm 4, i.e. 32 in integer coordinates)
//!
//! | Shape           | Count   | Construction |
//! |-----------------|---------|--------------|
//! | (±4)² 0²²       | 1,104   | ±4 on two positions |
//! | (±2)⁸ 0¹⁶       | 97,152  | ±2 on a Golay octad, even number of minus signs |
//! | (∓3)(±1)²³      | 98,304  | one ∓3 + 23 ±1, sign pattern from a Golay codeword |
//!
//! Total: 1,104 + 97,152 + 98,304 = 196,560

use nalgebra::{DMatrix, DVector};

use super::{Lattice, LatticeBasis, LatticeFamily};
use crate::error::{MathError, Result};
use crate::golay::GolayCode;
use crate::linalg;

/// 1/√8: integer-coordinate vectors scale down by this factor.
const SCALE: f64 = std::f64::consts::FRAC_1_SQRT_2 / 2.0;

/// Index of the integer-coordinate Leech lattice in Z²⁴.
const EXPECTED_COVOLUME: i128 = 1 << 36;

/// The Leech lattice Λ24, built on the Extended Golay Code.
#[derive(Debug, Clone)]
pub struct LeechLattice {
    golay: GolayCode,
    basis: LatticeBasis,
}

/// Number of chunks the octad-shape generator is split into.
const OCTAD_CHUNKS: usize = 8;

impl LeechLattice {
    pub const KISSING_NUMBER: usize = 196_560;

    pub fn new() -> Result<Self> {
        let golay = GolayCode::new();
        let basis = Self::construct_basis(&golay)?;
        Ok(Self { golay, basis })
    }

    /// Access the underlying Extended Golay Code.
    pub fn golay_code(&self) -> &GolayCode {
        &self.golay
    }

    /// Build and validate the 1/√8-scaled basis.
    fn construct_basis(golay: &GolayCode) -> Result<LatticeBasis> {
        let mut generators: Vec<Vec<i128>> = Vec::with_capacity(37);

        // Doubled Golay generators: 2·[mᵢ | mᵢ·B] satisfies the even-coset
        // congruences (codeword weights are divisible by 4).
        for i in 0..12 {
            let cw = GolayCode::encode(1 << i);
            let row: Vec<i128> = (0..24)
                .map(|bit| if cw & (1 << bit) != 0 { 2 } else { 0 })
                .collect();
            generators.push(row);
        }

        // 4eⱼ − 4e₂₄ and 8e₂₄ generate the even-coset vectors congruent to
        // the zero codeword.
        for j in 0..23 {
            let mut row = vec![0i128; 24];
            row[j] = 4;
            row[23] = -4;
            generators.push(row);
        }
        let mut last = vec![0i128; 24];
        last[23] = 8;
        generators.push(last);

        // Odd-coset representative (−3, 1²³): sum 20 ≡ 4 (mod 8).
        let mut odd = vec![1i128; 24];
        odd[0] = -3;
        generators.push(odd);

        let hnf = linalg::hermite_normal_form(generators, 24)?;
        let covolume: i128 = (0..24).map(|i| hnf[i][i]).product();
        if covolume.abs() != EXPECTED_COVOLUME {
            return Err(MathError::SingularBasis(format!(
                "Leech generator reduction produced covolume {covolume}, expected 2^36"
            )));
        }

        let rows = DMatrix::from_fn(24, 24, |i, j| hnf[i][j] as f64 * SCALE);
        let basis = LatticeBasis::new(rows)?;

        // Unimodular and even, by construction — but checked, not assumed.
        let det = basis.determinant().abs();
        if (det - 1.0).abs() > 1e-6 {
            return Err(MathError::SingularBasis(format!(
                "Leech basis determinant {det}, expected 1"
            )));
        }
        for i in 0..24 {
            let row = basis.rows().row(i).transpose();
            if basis.norm_is_even(&row) != Some(true) {
                return Err(MathError::SingularBasis(format!(
                    "Leech basis row {i} has odd or non-integer squared norm"
                )));
            }
        }

        Ok(basis)
    }

    /// Scale an integer-coordinate vector by 1/√8.
    fn scaled(coords: impl IntoIterator<Item = i64>) -> DVector<f64> {
        DVector::from_iterator(24, coords.into_iter().map(|x| x as f64 * SCALE))
    }

    /// The 1,104 vectors of shape (±4)² 0²².
    fn shape_two_fours(&self) -> Vec<DVector<f64>> {
        let mut vectors = Vec::with_capacity(1104);
        for i in 0..24 {
            for j in (i + 1)..24 {
                for signs in 0..4u8 {
                    let mut v = [0i64; 24];
                    v[i] = if signs & 1 == 0 { 4 } else { -4 };
                    v[j] = if signs & 2 == 0 { 4 } else { -4 };
                    vectors.push(Self::scaled(v));
                }
            }
        }
        vectors
    }

    /// Octad-shape vectors (±2)⁸ 0¹⁶ for octads with index ≡ part (mod
    /// OCTAD_CHUNKS): ±2 on the octad support, even number of minus signs.
    fn shape_octads(&self, part: usize) -> Vec<DVector<f64>> {
        let octads = self.golay.octads();
        let mut vectors = Vec::new();
        for octad in octads.iter().skip(part).step_by(OCTAD_CHUNKS) {
            for sign_bits in 0u32..256 {
                if sign_bits.count_ones() % 2 != 0 {
                    continue;
                }
                let mut v = [0i64; 24];
                for (bit, &pos) in octad.iter().enumerate() {
                    v[pos] = if sign_bits & (1 << bit) == 0 { 2 } else { -2 };
                }
                vectors.push(Self::scaled(v));
            }
        }
        vectors
    }

    /// The 4,096 vectors of shape (∓3)(±1)²³ whose ±3 sits at `pos3`.
    ///
    /// Writing an odd-coset vector as `x = 2c + 4z + 1` with `c ∈ C24`
    /// forces, coordinate-wise:
    /// - `i ≠ pos3`: `cᵢ = 0 → +1`, `cᵢ = 1 → −1`
    /// - `i = pos3`: `cᵢ = 1 → +3`, `cᵢ = 0 → −3`
    ///
    /// The sum constraint `Σxᵢ ≡ 4 (mod 8)` holds automatically because
    /// every Golay codeword weight is divisible by 4, so all 24 × 4096
    /// position/codeword pairs produce valid minimal vectors.
    fn shape_three_ones(&self, pos3: usize) -> Vec<DVector<f64>> {
        let mut vectors = Vec::with_capacity(4096);
        for &cw in self.golay.codewords() {
            let coords = (0..24).map(|i| {
                let bit = (cw >> i) & 1;
                if i == pos3 {
                    if bit == 1 {
                        3
                    } else {
                        -3
                    }
                } else if bit == 0 {
                    1
                } else {
                    -1
                }
            });
            vectors.push(Self::scaled(coords));
        }
        vectors
    }
}

impl Lattice for LeechLattice {
    fn family(&self) -> LatticeFamily {
        LatticeFamily::Leech
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

    /// Chunk 0: (±4)²; chunks 1..=24: (∓3)(±1)²³ per ±3 position;
    /// chunks 25..=32: (±2)⁸ octad parts.
    fn num_minimal_vector_chunks(&self) -> usize {
        1 + 24 + OCTAD_CHUNKS
    }

    fn minimal_vector_chunk(&self, chunk: usize) -> Result<Vec<DVector<f64>>> {
        match chunk {
            0 => Ok(self.shape_two_fours()),
            c @ 1..=24 => Ok(self.shape_three_ones(c - 1)),
            c @ 25..=32 => Ok(self.shape_octads(c - 25)),
            _ => Err(MathError::Configuration(format!(
                "Leech has 33 enumeration chunks, requested {chunk}"
            ))),
        }
    }
}

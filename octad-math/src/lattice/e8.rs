// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Octad-Proprietary
// See LICENSE in the repository root for full license terms.

//! E8 Lattice
//!
//! The E8 lattice is the densest sphere packing in 8 dimensions
//! (Viazovska, 2016). Kissing number: 240.
//!
//! Construction: E8 = D8 ∪ (D8 + (1/2, ..., 1/2)), with
//! D8 = {x ∈ Z⁸ | Σxᵢ ∈ 2Z}. The canonical basis used here is
//! unimodular (det = 1) and even, both of which are verified at
//! construction rather than assumed.
//!
//! The 240 roots (squared norm 2) split into two types:
//! - 112 of shape (±1, ±1, 0⁶): C(8,2) position pairs × 4 sign patterns
//! - 128 of shape (±½)⁸ with an even number of negative signs

use nalgebra::{DMatrix, DVector};

use super::{Lattice, LatticeBasis, LatticeFamily};
use crate::error::{MathError, Result};

/// The E8 root lattice.
#[derive(Debug, Clone)]
pub struct E8Lattice {
    basis: LatticeBasis,
}

/// Canonical E8 row basis: seven D8 simple roots plus the half-vector.
/// Lower triangular, so det = 2 · 1⁶ · ½ = 1 by inspection.
fn canonical_basis() -> DMatrix<f64> {
    let mut rows = DMatrix::<f64>::zeros(8, 8);
    rows[(0, 0)] = 2.0;
    for i in 1..7 {
        rows[(i, i - 1)] = -1.0;
        rows[(i, i)] = 1.0;
    }
    for j in 0..8 {
        rows[(7, j)] = 0.5;
    }
    rows
}

impl E8Lattice {
    pub const KISSING_NUMBER: usize = 240;

    pub fn new() -> Result<Self> {
        let basis = LatticeBasis::new(canonical_basis())?;

        // Unimodularity and evenness are invariants of E8, not articles of
        // faith about the hardcoded rows.
        let det = basis.determinant().abs();
        if (det - 1.0).abs() > 1e-9 {
            return Err(MathError::SingularBasis(format!(
                "E8 basis determinant {det}, expected 1"
            )));
        }
        for i in 0..8 {
            let row = basis.rows().row(i).transpose();
            if basis.norm_is_even(&row) != Some(true) {
                return Err(MathError::SingularBasis(format!(
                    "E8 basis row {i} has odd or non-integer squared norm"
                )));
            }
        }

        Ok(Self { basis })
    }

    /// Sphere-packing density achieved by E8: π⁴/384 ≈ 0.25367.
    ///
    /// Computed from the basis (sphere radius = half the minimal
    /// distance, divided by the fundamental-domain volume) rather than
    /// returned as a constant, so a wrong basis cannot hide.
    pub fn packing_density(&self) -> f64 {
        let radius = (2.0f64).sqrt() / 2.0;
        let volume_sphere = std::f64::consts::PI.powi(4) / 24.0 * radius.powi(8);
        volume_sphere / self.basis.determinant().abs()
    }
}

impl Lattice for E8Lattice {
    fn family(&self) -> LatticeFamily {
        LatticeFamily::E8
    }

    fn basis(&self) -> &LatticeBasis {
        &self.basis
    }

    fn basis_mut(&mut self) -> &mut LatticeBasis {
        &mut self.basis
    }

    fn min_norm_sq(&self) -> f64 {
        2.0
    }

    fn kissing_number(&self) -> Option<usize> {
        Some(Self::KISSING_NUMBER)
    }

    /// Chunk 0: the 112 integer roots; chunk 1: the 128 half-integer roots.
    fn num_minimal_vector_chunks(&self) -> usize {
        2
    }

    fn minimal_vector_chunk(&self, chunk: usize) -> Result<Vec<DVector<f64>>> {
        Ok(match chunk {
            0 => {
                // (±1, ±1, 0⁶): 28 position pairs × 4 sign combinations.
                let mut roots = Vec::with_capacity(112);
                for i in 0..8 {
                    for j in (i + 1)..8 {
                        for signs in 0..4u8 {
                            let mut v = DVector::zeros(8);
                            v[i] = if signs & 1 == 0 { 1.0 } else { -1.0 };
                            v[j] = if signs & 2 == 0 { 1.0 } else { -1.0 };
                            roots.push(v);
                        }
                    }
                }
                roots
            }
            1 => {
                // (±½)⁸ with an even number of minus signs.
                let mut roots = Vec::with_capacity(128);
                for pattern in 0..256u16 {
                    if pattern.count_ones() % 2 != 0 {
                        continue;
                    }
                    let v = DVector::from_iterator(
                        8,
                        (0..8).map(|i| if pattern & (1 << i) == 0 { 0.5 } else { -0.5 }),
                    );
                    roots.push(v);
                }
                roots
            }
            _ => {
                return Err(MathError::Configuration(format!(
                    "E8 has 2 enumeration chunks, requested {chunk}"
                )))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_e8_construction_validates() {
        let e8 = E8Lattice::new().unwrap();
        assert_eq!(e8.dimension(), 8);
        assert_eq!(e8.kissing_number(), Some(240));
        assert!((e8.basis().determinant().abs() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_root_count_and_types() {
        let e8 = E8Lattice::new().unwrap();
        let integer_roots = e8.minimal_vector_chunk(0).unwrap();
        let half_roots = e8.minimal_vector_chunk(1).unwrap();
        assert_eq!(integer_roots.len(), 112);
        assert_eq!(half_roots.len(), 128);
        assert_eq!(e8.minimal_vectors().unwrap().len(), 240);
    }

    #[test]
    fn test_all_roots_have_norm_sq_two() {
        let e8 = E8Lattice::new().unwrap();
        for (i, root) in e8.minimal_vectors().unwrap().iter().enumerate() {
            let n2 = root.dot(root);
            assert!(
                (n2 - 2.0).abs() < 1e-9,
                "root {i} has squared norm {n2}, expected 2"
            );
        }
    }

    #[test]
    fn test_all_roots_are_lattice_points() {
        let e8 = E8Lattice::new().unwrap();
        for root in e8.minimal_vectors().unwrap() {
            assert!(e8.is_valid(&root), "root {root:?} failed membership");
            assert_eq!(e8.is_even(&root), Some(true));
        }
    }

    #[test]
    fn test_roots_are_distinct() {
        let e8 = E8Lattice::new().unwrap();
        let roots = e8.minimal_vectors().unwrap();
        let mut keys: Vec<Vec<i64>> = roots
            .iter()
            .map(|r| r.iter().map(|&x| (x * 2.0).round() as i64).collect())
            .collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 240, "duplicate roots in the enumeration");
    }

    #[test]
    fn test_packing_density() {
        let e8 = E8Lattice::new().unwrap();
        let density = e8.packing_density();
        assert!(
            (density - 0.25367).abs() < 1e-5,
            "E8 packing density {density}, expected ≈ 0.25367"
        );
        // Closed form π⁴/384.
        let exact = std::f64::consts::PI.powi(4) / 384.0;
        assert!((density - exact).abs() < 1e-12);
    }

    #[test]
    fn test_known_member_and_non_member() {
        let e8 = E8Lattice::new().unwrap();
        let member = DVector::from_row_slice(&[2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let halves = DVector::from_row_slice(&[0.5; 8]);
        let not_member = DVector::from_row_slice(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(e8.is_valid(&member));
        assert!(e8.is_valid(&halves));
        assert!(!e8.is_valid(&not_member));
    }
}

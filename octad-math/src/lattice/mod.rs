//! Lattice model: a validated basis with derived Gram matrix, plus the
//! concrete lattice families built on top of it.
//!
//! - E8: 8D, kissing number 240, densest packing in 8 dimensions
//! - Leech: 24D, kissing number 196,560, built on the extended Golay code
//! - Coxeter-Todd K12: 12D, kissing number 756, built on the hexacode
//! - Barnes-Wall family: dimensions 2^m from the recursive doubling of D4
//!
//! A lattice owns its basis exclusively. The basis is immutable after
//! construction except for the explicit [`LatticeBasis::reduce`] call,
//! which swaps in an LLL-reduced basis generating the same lattice and
//! recomputes the Gram matrix. Nothing here mutates behind a query.

pub mod barnes_wall;
pub mod coxeter_todd;
pub mod e8;
pub mod leech;

pub use barnes_wall::BarnesWallLattice;
pub use coxeter_todd::CoxeterToddLattice;
pub use e8::E8Lattice;
pub use leech::LeechLattice;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{MathError, Result};
use crate::linalg;
use crate::reduction;

/// Identifies a lattice family supported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LatticeFamily {
    /// E8 root lattice (8D).
    E8,
    /// Leech lattice Lambda_24 (24D).
    Leech,
    /// Coxeter-Todd lattice K12 (12D).
    CoxeterTodd,
    /// Barnes-Wall doubling family; dimension = 2^exponent, exponent >= 2.
    BarnesWall { exponent: u32 },
}

impl LatticeFamily {
    /// Parse a family selector such as `"e8"`, `"leech"`, `"k12"`, or
    /// `"bw16"` / `"barnes-wall-16"`.
    pub fn from_name(name: &str) -> Result<Self> {
        let lower = name.trim().to_ascii_lowercase();
        match lower.as_str() {
            "e8" => return Ok(Self::E8),
            "leech" => return Ok(Self::Leech),
            "k12" | "coxeter-todd" | "coxeter_todd" => return Ok(Self::CoxeterTodd),
            _ => {}
        }
        if let Some(dim_str) = lower
            .strip_prefix("barnes-wall-")
            .or_else(|| lower.strip_prefix("bw"))
        {
            let dim: usize = dim_str.parse().map_err(|_| {
                MathError::Configuration(format!("unknown lattice family '{name}'"))
            })?;
            if dim.is_power_of_two() && dim >= 4 {
                return Ok(Self::BarnesWall {
                    exponent: dim.trailing_zeros(),
                });
            }
            return Err(MathError::Configuration(format!(
                "Barnes-Wall dimension must be a power of two >= 4, got {dim}"
            )));
        }
        Err(MathError::Configuration(format!(
            "unknown lattice family '{name}' (expected e8, leech, k12, or bw<dim>)"
        )))
    }

    /// Dimension of the ambient space.
    pub fn dimension(&self) -> usize {
        match self {
            Self::E8 => 8,
            Self::Leech => 24,
            Self::CoxeterTodd => 12,
            Self::BarnesWall { exponent } => 1usize << exponent,
        }
    }
}

/// Construct a lattice of the given family.
pub fn build(family: LatticeFamily) -> Result<Box<dyn Lattice>> {
    Ok(match family {
        LatticeFamily::E8 => Box::new(E8Lattice::new()?),
        LatticeFamily::Leech => Box::new(LeechLattice::new()?),
        LatticeFamily::CoxeterTodd => Box::new(CoxeterToddLattice::new()?),
        LatticeFamily::BarnesWall { exponent } => Box::new(BarnesWallLattice::new(exponent)?),
    })
}

/// A full-rank row basis with its derived Gram matrix.
///
/// Rank is validated at construction: a rank-deficient basis is a fatal
/// construction error, never a silent degradation. The Gram matrix
/// `G = B Bᵗ` is derived and recomputed whenever the basis changes; it is
/// never stored independently of the basis it came from.
#[derive(Debug, Clone)]
pub struct LatticeBasis {
    rows: DMatrix<f64>,
    gram: DMatrix<f64>,
    tolerance: f64,
}

impl LatticeBasis {
    /// Validate and wrap a square row basis with the default tolerance.
    pub fn new(rows: DMatrix<f64>) -> Result<Self> {
        Self::with_tolerance(rows, linalg::DEFAULT_TOLERANCE)
    }

    /// Validate and wrap a square row basis with an explicit tolerance.
    pub fn with_tolerance(rows: DMatrix<f64>, tolerance: f64) -> Result<Self> {
        if tolerance <= 0.0 {
            return Err(MathError::Configuration(format!(
                "tolerance must be positive, got {tolerance}"
            )));
        }
        let n = rows.nrows();
        if rows.ncols() != n {
            return Err(MathError::SingularBasis(format!(
                "basis must be square, got {}x{}",
                rows.nrows(),
                rows.ncols()
            )));
        }
        let rank = linalg::rank(&rows, tolerance.max(1e-12));
        if rank < n {
            return Err(MathError::SingularBasis(format!(
                "basis has rank {rank}, expected {n}"
            )));
        }
        let gram = &rows * rows.transpose();
        Ok(Self {
            rows,
            gram,
            tolerance,
        })
    }

    pub fn dimension(&self) -> usize {
        self.rows.nrows()
    }

    /// Basis rows (row i = i-th basis vector).
    pub fn rows(&self) -> &DMatrix<f64> {
        &self.rows
    }

    /// Derived Gram matrix `B Bᵗ`.
    pub fn gram(&self) -> &DMatrix<f64> {
        &self.gram
    }

    /// Integrality / residual tolerance used by membership checks.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Coordinates `c` with `c · B = v`.
    pub fn coordinates_of(&self, v: &DVector<f64>) -> Result<DVector<f64>> {
        linalg::solve_coordinates(&self.rows, v, self.tolerance)
    }

    /// Lattice membership: integer coordinates within tolerance.
    pub fn contains(&self, v: &DVector<f64>) -> bool {
        match self.coordinates_of(v) {
            Ok(c) => linalg::is_integer_vector(&c, self.tolerance),
            Err(_) => false,
        }
    }

    /// Evenness of a vector's squared norm.
    ///
    /// Returns `None` when the squared norm is not an integer within
    /// tolerance — the caller sees the flag instead of a silently rounded
    /// verdict.
    pub fn norm_is_even(&self, v: &DVector<f64>) -> Option<bool> {
        let n2 = linalg::norm_sq(v);
        let nearest = n2.round();
        // Absolute tolerance scaled by the magnitude of the norm itself:
        // 24D minimal vectors already accumulate ~1e-15 per component.
        if (n2 - nearest).abs() > self.tolerance * (1.0 + nearest.abs()) {
            return None;
        }
        Some((nearest as i64).rem_euclid(2) == 0)
    }

    /// Replace the basis in place with its LLL reduction.
    ///
    /// The reduced basis generates the same lattice (unimodular change of
    /// basis only); the Gram matrix is recomputed from the new rows.
    pub fn reduce(&mut self, delta: f64) -> Result<()> {
        let reduced = reduction::lll(&self.rows, delta)?;
        self.gram = &reduced * reduced.transpose();
        self.rows = reduced;
        Ok(())
    }

    /// Determinant of the basis matrix (signed covolume).
    pub fn determinant(&self) -> f64 {
        linalg::determinant(&self.rows)
    }
}

/// Common interface of the concrete lattice families.
///
/// Implementations are safe for concurrent readers: all fields are written
/// once during construction (or during an explicit `&mut self` reduction)
/// and read-only afterwards.
pub trait Lattice: Send + Sync {
    /// Family tag of this lattice.
    fn family(&self) -> LatticeFamily;

    /// The validated basis.
    fn basis(&self) -> &LatticeBasis;

    /// Mutable basis access for the explicit reduction lifecycle step.
    fn basis_mut(&mut self) -> &mut LatticeBasis;

    /// Squared norm of the minimal nonzero vectors.
    fn min_norm_sq(&self) -> f64;

    /// Kissing number, when known in closed form for this family.
    ///
    /// `None` means the first shell must be enumerated (Barnes-Wall).
    fn kissing_number(&self) -> Option<usize>;

    /// Number of independent enumeration chunks for the minimal-vector
    /// generator. Chunks partition the combinatorial cases and share no
    /// mutable state, so a worker pool may generate them in any order.
    fn num_minimal_vector_chunks(&self) -> usize;

    /// Generate one chunk of minimal vectors (`chunk < num_chunks`).
    ///
    /// Combinatorial generators cannot fail; the generic search-based
    /// generator can exhaust its node budget.
    fn minimal_vector_chunk(&self, chunk: usize) -> Result<Vec<DVector<f64>>>;

    /// Dimension of the ambient space.
    fn dimension(&self) -> usize {
        self.basis().dimension()
    }

    /// Lattice membership within the basis tolerance.
    fn is_valid(&self, v: &DVector<f64>) -> bool {
        self.basis().contains(v)
    }

    /// Whether `v` has an even integer squared norm; `None` flags a
    /// non-integer squared norm.
    fn is_even(&self, v: &DVector<f64>) -> Option<bool> {
        self.basis().norm_is_even(v)
    }

    /// Generate the full set of minimal vectors (all chunks, in order).
    fn minimal_vectors(&self) -> Result<Vec<DVector<f64>>> {
        let mut all = Vec::new();
        for c in 0..self.num_minimal_vector_chunks() {
            all.extend(self.minimal_vector_chunk(c)?);
        }
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_from_name() {
        assert_eq!(LatticeFamily::from_name("e8").unwrap(), LatticeFamily::E8);
        assert_eq!(
            LatticeFamily::from_name("Leech").unwrap(),
            LatticeFamily::Leech
        );
        assert_eq!(
            LatticeFamily::from_name("k12").unwrap(),
            LatticeFamily::CoxeterTodd
        );
        assert_eq!(
            LatticeFamily::from_name("bw16").unwrap(),
            LatticeFamily::BarnesWall { exponent: 4 }
        );
        assert_eq!(
            LatticeFamily::from_name("barnes-wall-8").unwrap(),
            LatticeFamily::BarnesWall { exponent: 3 }
        );
    }

    #[test]
    fn test_family_from_name_rejects_unknown() {
        assert!(matches!(
            LatticeFamily::from_name("d4"),
            Err(MathError::Configuration(_))
        ));
        assert!(matches!(
            LatticeFamily::from_name("bw12"),
            Err(MathError::Configuration(_))
        ));
    }

    #[test]
    fn test_basis_rejects_rank_deficiency() {
        let rows = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        assert!(matches!(
            LatticeBasis::new(rows),
            Err(MathError::SingularBasis(_))
        ));
    }

    #[test]
    fn test_basis_membership_and_gram() {
        let rows = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.5, 1.0]);
        let basis = LatticeBasis::new(rows).unwrap();
        assert_eq!(basis.gram()[(0, 0)], 1.0);
        assert_eq!(basis.gram()[(1, 1)], 1.25);

        let inside = DVector::from_row_slice(&[1.5, 1.0]); // row0 + row1
        let outside = DVector::from_row_slice(&[0.5, 0.5]);
        assert!(basis.contains(&inside));
        assert!(!basis.contains(&outside));
    }

    #[test]
    fn test_norm_evenness_flags_non_integer() {
        let rows = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1.0]);
        let basis = LatticeBasis::new(rows).unwrap();
        let even = DVector::from_row_slice(&[1.0, 1.0]);
        let odd = DVector::from_row_slice(&[1.0, 0.0]);
        let fractional = DVector::from_row_slice(&[0.5, 0.5]);
        assert_eq!(basis.norm_is_even(&even), Some(true));
        assert_eq!(basis.norm_is_even(&odd), Some(false));
        assert_eq!(basis.norm_is_even(&fractional), None);
    }

    #[test]
    fn test_reduce_replaces_basis_and_gram() {
        let rows = DMatrix::from_row_slice(2, 2, &[201.0, 37.0, 1648.0, 297.0]);
        let mut basis = LatticeBasis::new(rows.clone()).unwrap();
        let det_before = basis.determinant().abs();
        basis.reduce(0.75).unwrap();
        assert!((basis.determinant().abs() - det_before).abs() < 1e-6);
        // Gram matches the new rows, not the old ones.
        let expected = basis.rows() * basis.rows().transpose();
        assert_eq!(basis.gram(), &expected);
        // Original rows still belong to the lattice.
        for i in 0..2 {
            assert!(basis.contains(&rows.row(i).transpose()));
        }
    }
}

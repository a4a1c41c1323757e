//! Barnes-Wall doubling family
//!
//! Dimensions 2^m (m >= 2) built by the recursive doubling
//!
//! ```text
//! B(2d) = | B(d)  B(d) |
//!         |  0    2·I  |
//! ```
//!
//! starting from the D4 base: the lattice {(u, u + 2z) : u ∈ L(d), z ∈ Z^d}.
//! The base level (m = 2) is D4 itself with minimum squared norm 2; every
//! doubled level has minimum squared norm 4 (a nonzero u contributes at
//! least 2 from each half or lands in 2Z^d, either way totalling >= 4, and
//! u = 0 leaves (0, 2z) with norm >= 4).
//!
//! Unlike E8 and Leech, the first shell has no closed-form count across
//! levels; minimal vectors come from the generic shell enumeration, so
//! `kissing_number()` is `None` until the shell is built.

use nalgebra::{DMatrix, DVector};

use super::{Lattice, LatticeBasis, LatticeFamily};
use crate::cvp;
use crate::error::{MathError, Result};
use crate::reduction;

/// Node budget for the generic first-shell enumeration. Sized for the
/// dimensions this family is used at (m <= 5 in practice).
const SHELL_ENUMERATION_BUDGET: u64 = 200_000_000;

/// A lattice from the recursive doubling family.
#[derive(Debug, Clone)]
pub struct BarnesWallLattice {
    exponent: u32,
    basis: LatticeBasis,
}

/// D4 row basis (determinant 2, all row sums even).
fn d4_basis() -> DMatrix<f64> {
    DMatrix::from_row_slice(
        4,
        4,
        &[
            1.0, 1.0, 0.0, 0.0, //
            -1.0, 1.0, 0.0, 0.0, //
            0.0, 1.0, 1.0, 0.0, //
            0.0, 0.0, 1.0, 1.0,
        ],
    )
}

/// One doubling step: [B B; 0 2I].
fn double(prev: &DMatrix<f64>) -> DMatrix<f64> {
    let d = prev.nrows();
    let mut next = DMatrix::<f64>::zeros(2 * d, 2 * d);
    for i in 0..d {
        for j in 0..d {
            next[(i, j)] = prev[(i, j)];
            next[(i, d + j)] = prev[(i, j)];
        }
        next[(d + i, d + i)] = 2.0;
    }
    next
}

impl BarnesWallLattice {
    /// Build the level with dimension `2^exponent` (`exponent >= 2`).
    pub fn new(exponent: u32) -> Result<Self> {
        if exponent < 2 {
            return Err(MathError::Configuration(format!(
                "Barnes-Wall exponent must be >= 2 (dimension 4), got {exponent}"
            )));
        }

        let mut rows = d4_basis();
        for _ in 2..exponent {
            rows = double(&rows);
        }

        let basis = LatticeBasis::new(rows)?;
        Ok(Self { exponent, basis })
    }

    pub fn exponent(&self) -> u32 {
        self.exponent
    }
}

impl Lattice for BarnesWallLattice {
    fn family(&self) -> LatticeFamily {
        LatticeFamily::BarnesWall {
            exponent: self.exponent,
        }
    }

    fn basis(&self) -> &LatticeBasis {
        &self.basis
    }

    fn basis_mut(&mut self) -> &mut LatticeBasis {
        &mut self.basis
    }

    fn min_norm_sq(&self) -> f64 {
        if self.exponent == 2 {
            2.0
        } else {
            4.0
        }
    }

    fn kissing_number(&self) -> Option<usize> {
        // No closed form across levels; enumerate the first shell.
        None
    }

    fn num_minimal_vector_chunks(&self) -> usize {
        1
    }

    /// Generic first-shell enumeration through the exact search machinery.
    ///
    /// The enumeration runs on an LLL-reduced copy of the basis (same
    /// lattice, far smaller search tree); the stored basis is untouched.
    fn minimal_vector_chunk(&self, chunk: usize) -> Result<Vec<DVector<f64>>> {
        if chunk != 0 {
            return Err(MathError::Configuration(format!(
                "Barnes-Wall has 1 enumeration chunk, requested {chunk}"
            )));
        }
        let reduced = reduction::lll(self.basis.rows(), 0.75)?;
        cvp::enumerate_shell(&reduced, self.min_norm_sq(), SHELL_ENUMERATION_BUDGET)
    }
}

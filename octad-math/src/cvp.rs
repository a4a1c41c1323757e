// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Octad-Proprietary
// See LICENSE in the repository root for full license terms.

//! Closest-vector solvers.
//!
//! Two algorithms with different contracts:
//!
//! - [`babai`] — nearest-plane rounding on a reduced basis. Polynomial
//!   time; always returns *a* lattice point, but for badly-conditioned
//!   bases the point is not guaranteed nearest. A documented
//!   approximation, not a bug. Callers needing exactness use the search.
//! - [`closest_vector_exact`] — recursive branch-and-bound over the
//!   Gram-Schmidt levels of the basis (Kannan-Fincke-Pohst with the
//!   Schnorr-Euchner zig-zag ordering). Coefficients at each level are
//!   enumerated outward from the nearest-plane center in nondecreasing
//!   distance order; a branch is pruned the moment its partial squared
//!   distance reaches the best distance found so far, and the best
//!   distance only shrinks. The search returns the global minimum or a
//!   typed budget failure — never a silently suboptimal point.

use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, Result};
use crate::linalg;
use crate::reduction;

/// Babai rounding: `c = v · Bᵗ · (B Bᵗ)⁻¹`, rounded per coordinate
/// (ties away from zero), returned as `c_rounded · B`.
///
/// The basis is expected to be LLL-reduced for the approximation factor
/// to be meaningful; reduction is the caller's explicit step.
pub fn babai(basis: &DMatrix<f64>, v: &DVector<f64>, tol: f64) -> Result<DVector<f64>> {
    let gram = basis * basis.transpose();
    let target = basis * v; // (v · Bᵗ)ᵗ
    let coords = gram.clone().lu().solve(&target).ok_or_else(|| {
        MathError::SingularBasis("Gram matrix is not invertible".to_string())
    })?;

    // Residual check, same contract as the coordinate solver.
    let residual = &gram * &coords - &target;
    if residual.amax() > tol * (1.0 + target.amax()) {
        return Err(MathError::SingularBasis(format!(
            "Gram solve residual {:.3e} beyond tolerance",
            residual.amax()
        )));
    }

    let rounded = linalg::round_vector(&coords);
    Ok(basis.transpose() * rounded)
}

/// Gram-Schmidt data for the enumeration: orthogonal row norms and the
/// change-of-basis coefficients mu[i][j] = <b_i, b*_j> / <b*_j, b*_j>.
struct GsDecomposition {
    mu: DMatrix<f64>,
    bstar_norm_sq: Vec<f64>,
    /// Target coordinates in the orthogonal frame.
    target: Vec<f64>,
}

impl GsDecomposition {
    fn new(basis: &DMatrix<f64>, v: &DVector<f64>) -> Result<Self> {
        let n = basis.nrows();
        let ortho = reduction::gram_schmidt(basis);

        let mut bstar_norm_sq = Vec::with_capacity(n);
        let mut mu = DMatrix::<f64>::zeros(n, n);
        let mut target = Vec::with_capacity(n);

        for j in 0..n {
            let oj = ortho.row(j).transpose();
            let norm_sq = oj.dot(&oj);
            if norm_sq <= 0.0 || !norm_sq.is_finite() {
                return Err(MathError::SingularBasis(format!(
                    "Gram-Schmidt vector {j} vanished; basis is rank-deficient"
                )));
            }
            bstar_norm_sq.push(norm_sq);
            target.push(v.dot(&oj) / norm_sq);
            for i in 0..n {
                mu[(i, j)] = basis.row(i).transpose().dot(&oj) / norm_sq;
            }
        }

        Ok(Self {
            mu,
            bstar_norm_sq,
            target,
        })
    }
}

struct SearchState<'a> {
    gs: &'a GsDecomposition,
    coeffs: Vec<f64>,
    best_coeffs: Vec<f64>,
    best_dist_sq: f64,
    nodes: u64,
    budget: u64,
}

impl SearchState<'_> {
    /// Explore level `k` with the accumulated squared distance of the
    /// levels above it. Levels run from n−1 down to 0; a negative level
    /// means a full coefficient vector.
    fn descend(&mut self, k: isize, partial_dist_sq: f64) -> Result<()> {
        if k < 0 {
            if partial_dist_sq < self.best_dist_sq {
                self.best_dist_sq = partial_dist_sq;
                self.best_coeffs.copy_from_slice(&self.coeffs);
            }
            return Ok(());
        }
        let k = k as usize;

        // Center of the slab interval at this level given the choices
        // already made at the levels above.
        let mut center = self.gs.target[k];
        for j in (k + 1)..self.coeffs.len() {
            center -= self.gs.mu[(j, k)] * self.coeffs[j];
        }

        // Zig-zag: c, c±1, c∓1, ... in nondecreasing |center − c| order,
        // so the first pruned candidate ends the whole level.
        let first = center.round();
        let mut candidate = first;
        let step = if center - first >= 0.0 { 1.0 } else { -1.0 };
        loop {
            let delta = center - candidate;
            let add = delta * delta * self.gs.bstar_norm_sq[k];
            if partial_dist_sq + add >= self.best_dist_sq {
                break;
            }

            self.nodes += 1;
            if self.nodes > self.budget {
                return Err(MathError::SearchBudgetExceeded {
                    visited: self.nodes,
                    budget: self.budget,
                });
            }

            self.coeffs[k] = candidate;
            self.descend(k as isize - 1, partial_dist_sq + add)?;

            // Reflect to the other side of the center, stepping outward
            // when leaving the preferred side; the resulting order is
            // f, f+s, f−s, f+2s, ... with nondecreasing |center − c|.
            candidate = 2.0 * first - candidate
                + if (candidate - first) * step <= 0.0 { step } else { 0.0 };
        }

        Ok(())
    }
}

/// Exact closest vector by branch-and-bound.
///
/// Starts from an infinite radius that shrinks monotonically as feasible
/// points are found (the first leaf is exactly the nearest-plane point,
/// so pruning engages immediately). `budget` bounds the number of visited
/// search nodes; exhausting it yields
/// [`MathError::SearchBudgetExceeded`] rather than an unbounded stall.
pub fn closest_vector_exact(
    basis: &DMatrix<f64>,
    v: &DVector<f64>,
    budget: u64,
) -> Result<DVector<f64>> {
    let n = basis.nrows();
    let gs = GsDecomposition::new(basis, v)?;

    let mut state = SearchState {
        gs: &gs,
        coeffs: vec![0.0; n],
        best_coeffs: vec![0.0; n],
        best_dist_sq: f64::INFINITY,
        nodes: 0,
        budget,
    };
    state.descend(n as isize - 1, 0.0)?;

    let coeffs = DVector::from_vec(state.best_coeffs);
    Ok(basis.transpose() * coeffs)
}

/// Enumerate every lattice vector with `0 < |x|² <= radius_sq + slack`.
///
/// Shares the branch-and-bound machinery with the CVP search (target = 0,
/// fixed radius, collect instead of minimize). Used as the generic
/// first-shell generator for families without a combinatorial
/// enumeration.
pub fn enumerate_shell(
    basis: &DMatrix<f64>,
    radius_sq: f64,
    budget: u64,
) -> Result<Vec<DVector<f64>>> {
    let n = basis.nrows();
    let origin = DVector::zeros(n);
    let gs = GsDecomposition::new(basis, &origin)?;
    let slack = 1e-9 * (1.0 + radius_sq);

    let mut coeffs = vec![0.0f64; n];
    let mut found: Vec<DVector<f64>> = Vec::new();
    let mut nodes = 0u64;

    collect_shell(
        &gs,
        n as isize - 1,
        0.0,
        radius_sq + slack,
        &mut coeffs,
        &mut found,
        &mut nodes,
        budget,
    )?;

    Ok(found
        .into_iter()
        .map(|c| basis.transpose() * c)
        .filter(|x| x.dot(x) > slack)
        .collect())
}

#[allow(clippy::too_many_arguments)]
fn collect_shell(
    gs: &GsDecomposition,
    k: isize,
    partial_dist_sq: f64,
    bound: f64,
    coeffs: &mut Vec<f64>,
    found: &mut Vec<DVector<f64>>,
    nodes: &mut u64,
    budget: u64,
) -> Result<()> {
    if k < 0 {
        found.push(DVector::from_vec(coeffs.clone()));
        return Ok(());
    }
    let k = k as usize;

    let mut center = 0.0;
    for j in (k + 1)..coeffs.len() {
        center -= gs.mu[(j, k)] * coeffs[j];
    }

    let first = center.round();
    let mut candidate = first;
    let side = if center - first >= 0.0 { 1.0 } else { -1.0 };
    loop {
        let delta = center - candidate;
        let add = delta * delta * gs.bstar_norm_sq[k];
        if partial_dist_sq + add > bound {
            break;
        }

        *nodes += 1;
        if *nodes > budget {
            return Err(MathError::SearchBudgetExceeded {
                visited: *nodes,
                budget,
            });
        }

        coeffs[k] = candidate;
        collect_shell(gs, k as isize - 1, partial_dist_sq + add, bound, coeffs, found, nodes, budget)?;

        candidate = 2.0 * first - candidate
            + if (candidate - first) * side <= 0.0 { side } else { 0.0 };
    }
    Ok(())
}

//! Dense linear-algebra kernel used by every component above it.
//!
//! Bases are row matrices: row i of a `DMatrix<f64>` is the i-th basis
//! vector, and lattice coordinates multiply from the left (`c · B = v`).
//! All approximate comparisons go through a single absolute tolerance so
//! membership tests, CVP validation, and the test suite agree on what
//! "integer" means; the default is [`DEFAULT_TOLERANCE`].

use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, Result};

/// Default absolute tolerance for integrality and residual checks.
///
/// This is a contract parameter, not an implementation detail: every
/// membership check in the crate uses it unless the caller overrides it.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Euclidean dot product.
pub fn dot(u: &DVector<f64>, v: &DVector<f64>) -> f64 {
    u.dot(v)
}

/// Squared Euclidean norm.
pub fn norm_sq(v: &DVector<f64>) -> f64 {
    v.dot(v)
}

/// Projection coefficient of `u` onto `v`: `<u,v> / <v,v>`.
///
/// The denominator is the caller's responsibility; a zero `v` here means a
/// degenerate basis slipped past validation.
pub fn projection_coeff(u: &DVector<f64>, v: &DVector<f64>) -> f64 {
    u.dot(v) / v.dot(v)
}

/// Solve `c · B = v` for the row-coordinate vector `c`.
///
/// Fails with [`MathError::SingularBasis`] when `B` is not invertible or
/// the residual of the computed solution exceeds `tol` (the system is
/// inconsistent beyond floating tolerance).
pub fn solve_coordinates(
    basis: &DMatrix<f64>,
    v: &DVector<f64>,
    tol: f64,
) -> Result<DVector<f64>> {
    let n = basis.nrows();
    if basis.ncols() != n || v.len() != n {
        return Err(MathError::SingularBasis(format!(
            "expected a square {n}x{n} system, got {}x{} basis and length-{} vector",
            basis.nrows(),
            basis.ncols(),
            v.len()
        )));
    }

    // c · B = v  <=>  Bᵗ cᵗ = vᵗ
    let lu = basis.transpose().lu();
    let c = lu.solve(v).ok_or_else(|| {
        MathError::SingularBasis(format!("{n}x{n} basis is not invertible"))
    })?;

    // Guard against a nearly-singular LU producing a garbage solution.
    let residual = basis.transpose() * &c - v;
    let scale = 1.0 + v.amax();
    if residual.amax() > tol * scale {
        return Err(MathError::SingularBasis(format!(
            "solve residual {:.3e} exceeds tolerance {:.3e}",
            residual.amax(),
            tol * scale
        )));
    }

    Ok(c)
}

/// True when every component of `c` is within `tol` of an integer.
pub fn is_integer_vector(c: &DVector<f64>, tol: f64) -> bool {
    c.iter().all(|&x| (x - x.round()).abs() <= tol)
}

/// Component-wise round to nearest integer (ties away from zero).
pub fn round_vector(c: &DVector<f64>) -> DVector<f64> {
    DVector::from_iterator(c.len(), c.iter().map(|&x| x.round()))
}

/// Determinant of a square matrix.
pub fn determinant(m: &DMatrix<f64>) -> f64 {
    m.determinant()
}

/// Numerical rank with absolute singular-value cutoff `tol`.
pub fn rank(m: &DMatrix<f64>, tol: f64) -> usize {
    m.clone().rank(tol)
}

/// Hermite-style row reduction of an integer generating set.
///
/// Takes `rows` (each of length `n`, possibly more rows than `n`) spanning
/// a full-rank sublattice of Zⁿ and reduces them in place to `n`
/// independent rows in row-echelon form via unimodular row
/// operations (swaps, negations, integer combinations), so the returned
/// rows generate exactly the same lattice. The product of the diagonal
/// entries is the lattice covolume.
///
/// Fails with [`MathError::SingularBasis`] when the generators do not span
/// an `n`-dimensional lattice.
pub fn hermite_normal_form(mut rows: Vec<Vec<i128>>, n: usize) -> Result<Vec<Vec<i128>>> {
    for row in &rows {
        debug_assert_eq!(row.len(), n);
    }

    let mut pivot_row = 0;
    for col in 0..n {
        // Euclid over the column: repeatedly subtract multiples of the
        // smallest nonzero entry until only one row below `pivot_row`
        // still has a nonzero entry in this column.
        loop {
            let mut best: Option<(usize, i128)> = None;
            for (i, row) in rows.iter().enumerate().skip(pivot_row) {
                let a = row[col];
                if a != 0 && best.map_or(true, |(_, b)| a.abs() < b.abs()) {
                    best = Some((i, a));
                }
            }
            let (best_idx, best_val) = match best {
                Some(b) => b,
                None => {
                    return Err(MathError::SingularBasis(format!(
                        "integer generators span rank {col}, expected {n}"
                    )))
                }
            };

            rows.swap(pivot_row, best_idx);
            let mut reduced_any = false;
            for i in (pivot_row + 1)..rows.len() {
                let q = rows[i][col].div_euclid(best_val);
                if q != 0 {
                    for k in 0..n {
                        rows[i][k] -= q * rows[pivot_row][k];
                    }
                }
                if rows[i][col] != 0 {
                    reduced_any = true;
                }
            }
            if !reduced_any {
                break;
            }
        }

        if rows[pivot_row][col] < 0 {
            for k in 0..n {
                rows[pivot_row][k] = -rows[pivot_row][k];
            }
        }
        pivot_row += 1;
    }

    // Everything below the n-th row must have cancelled to zero.
    for row in rows.iter().skip(n) {
        debug_assert!(row.iter().all(|&x| x == 0));
    }

    rows.truncate(n);
    Ok(rows)
}

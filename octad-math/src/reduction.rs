//! Gram-Schmidt orthogonalization and LLL basis reduction.
//!
//! The reducer works on row bases and recomputes the orthogonalization
//! after every size-reduction or swap. Incremental updates would be
//! faster, but a stale orthogonal basis is a correctness bug, not a
//! performance shortcut, so the whole orthogonalization is refreshed each
//! time exactly as the swap loop expects.

use nalgebra::DMatrix;

use crate::error::{MathError, Result};

/// Classical Gram-Schmidt without normalization.
///
/// Row i of the result is `b_i - sum_{j<i} mu_ij b*_j`. The output rows
/// are pairwise orthogonal and span the same flag of subspaces as the
/// input rows; lengths are not normalized.
pub fn gram_schmidt(basis: &DMatrix<f64>) -> DMatrix<f64> {
    let (n, dim) = basis.shape();
    let mut ortho = DMatrix::<f64>::zeros(n, dim);

    for i in 0..n {
        let mut v = basis.row(i).transpose();
        for j in 0..i {
            let bj = ortho.row(j).transpose();
            let denom = bj.dot(&bj);
            if denom > 0.0 {
                let mu = v.dot(&bj) / denom;
                v -= bj * mu;
            }
        }
        ortho.set_row(i, &v.transpose());
    }

    ortho
}

/// LLL-reduce a row basis with Lovász parameter `delta`.
///
/// Standard size-reduction/swap loop: each `b_k` is reduced against every
/// earlier row by the rounded projection coefficient; the Lovász condition
/// `|b*_k|^2 >= (delta - mu^2) |b*_{k-1}|^2` decides whether to advance or
/// to swap and step back. Swaps strictly decrease a potential bounded
/// below, so the loop terminates. Rounding ties go away from zero.
///
/// The returned basis generates the same lattice (unimodular steps only).
/// `delta` outside (0.25, 1) is rejected as a configuration error.
pub fn lll(basis: &DMatrix<f64>, delta: f64) -> Result<DMatrix<f64>> {
    if !(delta > 0.25 && delta < 1.0) {
        return Err(MathError::Configuration(format!(
            "LLL delta must lie in (0.25, 1), got {delta}"
        )));
    }

    let n = basis.nrows();
    let mut b = basis.clone();
    if n < 2 {
        return Ok(b);
    }

    let mut ortho = gram_schmidt(&b);
    let mut k = 1;

    while k < n {
        // Size-reduce b_k against b_{k-1} .. b_0.
        for j in (0..k).rev() {
            let bk = b.row(k).transpose();
            let oj = ortho.row(j).transpose();
            let mu = bk.dot(&oj) / oj.dot(&oj);
            if mu.abs() > 0.5 {
                let r = mu.round();
                let reduced = b.row(k) - b.row(j) * r;
                b.set_row(k, &reduced);
                ortho = gram_schmidt(&b);
            }
        }

        let bk = b.row(k).transpose();
        let ok = ortho.row(k).transpose();
        let ok1 = ortho.row(k - 1).transpose();
        let mu = bk.dot(&ok1) / ok1.dot(&ok1);

        if ok.dot(&ok) >= (delta - mu * mu) * ok1.dot(&ok1) {
            k += 1;
        } else {
            b.swap_rows(k, k - 1);
            ortho = gram_schmidt(&b);
            k = k.max(2) - 1;
        }
    }

    Ok(b)
}

// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Octad-Proprietary
// See LICENSE in the repository root for full license terms.

//! LatticeQuantizer — per-lattice quantization facade.
//!
//! Wraps one lattice instance together with its compute backend, an
//! LLL-reduced working basis for the nearest-plane path, and the two
//! optional derived structures (root system, approximate-neighbor index).
//! Both derived structures are populated only by their explicit `build_*`
//! calls and are plain optional fields — no query ever mutates the
//! quantizer behind the caller's back.

use anyhow::{anyhow, ensure, Context, Result};
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use octad_math::lattice::{self, Lattice, LatticeFamily};
use octad_math::{cvp, reduction, MathError};

use crate::backend::{create_backend, ComputeBackend};
use crate::config::{LshParams, QuantizerConfig};
use crate::lsh::LshIndex;
use crate::pool::WorkerPool;

/// The quantization engine for a single lattice instance.
pub struct LatticeQuantizer {
    lattice: Box<dyn Lattice>,
    /// LLL-reduced copy of the basis used by the solvers; generates the
    /// same lattice (reduction is unimodular), so answers are identical.
    reduced: DMatrix<f64>,
    config: QuantizerConfig,
    backend: Box<dyn ComputeBackend>,
    /// First shell of the lattice, present after `build_root_system`.
    root_system: Option<Vec<DVector<f64>>>,
    /// Approximate-neighbor index, present after `build_approx_index`.
    approx_index: Option<LshIndex>,
}

impl LatticeQuantizer {
    /// Wrap a lattice with the given configuration.
    ///
    /// Reduces a working copy of the basis once, up front, so every
    /// nearest-plane query runs against a reduced basis.
    pub fn new(lattice: Box<dyn Lattice>, config: QuantizerConfig) -> Result<Self> {
        config.validate()?;
        let backend = create_backend(config.backend)?;
        let reduced = reduction::lll(lattice.basis().rows(), config.lll_delta)
            .context("initial basis reduction failed")?;
        Ok(Self {
            lattice,
            reduced,
            config,
            backend,
            root_system: None,
            approx_index: None,
        })
    }

    /// Construct the lattice of `family` and wrap it.
    pub fn for_family(family: LatticeFamily, config: QuantizerConfig) -> Result<Self> {
        let lattice = lattice::build(family)
            .with_context(|| format!("failed to construct {family:?}"))?;
        Self::new(lattice, config)
    }

    pub fn family(&self) -> LatticeFamily {
        self.lattice.family()
    }

    pub fn dimension(&self) -> usize {
        self.lattice.dimension()
    }

    /// The lattice's own basis rows (not the reduced working copy).
    pub fn basis(&self) -> &DMatrix<f64> {
        self.lattice.basis().rows()
    }

    /// Gram matrix of the lattice basis.
    pub fn gram_matrix(&self) -> &DMatrix<f64> {
        self.lattice.basis().gram()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Explicitly re-reduce the lattice's own basis in place (unimodular
    /// change of basis; same lattice). The working copy follows.
    pub fn reduce_basis(&mut self) -> Result<()> {
        self.lattice.basis_mut().reduce(self.config.lll_delta)?;
        self.reduced = self.lattice.basis().rows().clone();
        Ok(())
    }

    /// Lattice membership within the configured tolerance.
    pub fn is_valid(&self, v: &DVector<f64>) -> bool {
        self.lattice.is_valid(v)
    }

    /// Evenness of a vector's squared norm (`None` flags a non-integer
    /// squared norm).
    pub fn is_even(&self, v: &DVector<f64>) -> Option<bool> {
        self.lattice.is_even(v)
    }

    /// Closest lattice point to `v`.
    ///
    /// `exact = false` runs Babai nearest-plane on the reduced basis:
    /// polynomial time, always a lattice point, not guaranteed nearest.
    /// `exact = true` runs the branch-and-bound search: the true nearest
    /// point, or a typed [`MathError::SearchBudgetExceeded`] when the
    /// configured node budget runs out (retry with Babai or raise the
    /// budget).
    pub fn closest_vector(&self, v: &DVector<f64>, exact: bool) -> Result<DVector<f64>> {
        ensure!(
            v.len() == self.dimension(),
            "query has dimension {}, lattice is {}-dimensional",
            v.len(),
            self.dimension()
        );
        let point = if exact {
            cvp::closest_vector_exact(&self.reduced, v, self.config.exact_node_budget)?
        } else {
            cvp::babai(&self.reduced, v, self.config.tolerance)?
        };
        debug_assert!(self.is_valid(&point), "solver returned a non-lattice point");
        Ok(point)
    }

    /// Enumerate and cache the lattice's first shell, fanning the
    /// independent combinatorial chunks out over `pool`.
    ///
    /// Chunk outputs share no mutable state and are concatenated in chunk
    /// order; the shell is a set, so ordering carries no meaning. Returns
    /// the number of vectors. Idempotent: rebuilding produces the same
    /// set.
    pub fn build_root_system(&mut self, pool: &WorkerPool) -> Result<usize> {
        let lattice = &self.lattice;
        let chunks = lattice.num_minimal_vector_chunks();
        let parts: std::result::Result<Vec<Vec<DVector<f64>>>, MathError> = pool.install(|| {
            (0..chunks)
                .into_par_iter()
                .map(|c| lattice.minimal_vector_chunk(c))
                .collect()
        });
        let roots: Vec<DVector<f64>> = parts?.into_iter().flatten().collect();

        if let Some(expected) = lattice.kissing_number() {
            ensure!(
                roots.len() == expected,
                "enumerated {} minimal vectors, expected {expected}",
                roots.len()
            );
        }
        tracing::debug!(
            count = roots.len(),
            family = ?lattice.family(),
            "root system built"
        );
        let count = roots.len();
        self.root_system = Some(roots);
        Ok(count)
    }

    /// The cached first shell, if built.
    pub fn root_system(&self) -> Option<&[DVector<f64>]> {
        self.root_system.as_deref()
    }

    /// Kissing number: the family's closed form where one exists,
    /// otherwise the size of the built root system.
    pub fn kissing_number(&self) -> Option<usize> {
        self.lattice
            .kissing_number()
            .or_else(|| self.root_system.as_ref().map(Vec::len))
    }

    /// Build the approximate-neighbor index over the cached root system.
    ///
    /// Requires `build_root_system` first: the index is defined over a
    /// snapshot of precomputed points, and which snapshot exists must be
    /// the caller's explicit decision.
    pub fn build_approx_index(&mut self, params: &LshParams) -> Result<()> {
        params.validate()?;
        let roots = self
            .root_system
            .as_ref()
            .ok_or_else(|| anyhow!("build_root_system must run before build_approx_index"))?;
        self.approx_index = Some(LshIndex::build(roots, params)?);
        Ok(())
    }

    /// Approximate closest vector via the LSH shortlist.
    ///
    /// Ranks the query's bucket candidates exactly (through the compute
    /// backend) and returns the best. An empty candidate union falls back
    /// to the exact search — never to "no neighbor"; if the exact search
    /// then exhausts its budget, the nearest-plane answer is returned as
    /// the final fallback.
    pub fn approx_closest_vector(&self, v: &DVector<f64>) -> Result<DVector<f64>> {
        ensure!(
            v.len() == self.dimension(),
            "query has dimension {}, lattice is {}-dimensional",
            v.len(),
            self.dimension()
        );
        let index = self
            .approx_index
            .as_ref()
            .ok_or_else(|| anyhow!("build_approx_index must run before approx queries"))?;
        let roots = self
            .root_system
            .as_ref()
            .ok_or_else(|| anyhow!("root system missing despite built index"))?;

        let candidates = index.candidates(v);
        if let Some((best, _)) = self.backend.nearest_of_candidates(roots, &candidates, v) {
            return Ok(roots[best].clone());
        }

        tracing::debug!("empty LSH bucket union, falling back to exact search");
        match cvp::closest_vector_exact(&self.reduced, v, self.config.exact_node_budget) {
            Ok(p) => Ok(p),
            Err(MathError::SearchBudgetExceeded { visited, budget }) => {
                tracing::warn!(visited, budget, "exact fallback over budget, using nearest-plane");
                Ok(cvp::babai(&self.reduced, v, self.config.tolerance)?)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Sphere-packing density of this lattice: the volume of one packing
    /// sphere (radius = half the minimal distance) over the volume of the
    /// fundamental domain. All supported families are even-dimensional.
    pub fn packing_density(&self) -> f64 {
        let n = self.dimension();
        debug_assert!(n % 2 == 0, "supported families are even-dimensional");
        let radius = self.lattice.min_norm_sq().sqrt() / 2.0;
        let half_n = (n / 2) as i32;
        let ball = std::f64::consts::PI.powi(half_n) * radius.powi(n as i32)
            / factorial(n as u64 / 2);
        ball / self.lattice.basis().determinant().abs()
    }
}

fn factorial(k: u64) -> f64 {
    (1..=k).map(|i| i as f64).product()
}

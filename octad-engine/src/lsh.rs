//! Random-hyperplane locality-sensitive hashing over a point-set snapshot.
//!
//! Each table hashes a vector to the sign pattern of `num_hashes` random
//! Gaussian projections; a query unions the candidate indices found in
//! its bucket across all tables. The index is a performance aid, never a
//! source of truth: an empty candidate union means "fall back to the
//! exact path", not "no neighbor exists". The projections are drawn from
//! a seeded RNG so index construction is reproducible.

use std::collections::HashMap;

use anyhow::{ensure, Result};
use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

use crate::config::LshParams;

/// A built approximate-neighbor index over a fixed snapshot of points.
pub struct LshIndex {
    /// Per-table projection matrix (num_hashes x dim).
    projections: Vec<DMatrix<f64>>,
    /// Per-table bucket map: hash -> indices into the indexed point set.
    tables: Vec<HashMap<u32, Vec<usize>>>,
    num_points: usize,
    dimension: usize,
}

impl LshIndex {
    /// Index a snapshot of points.
    ///
    /// The index stores only bucket assignments; the caller keeps the
    /// points themselves and resolves candidate indices against them.
    pub fn build(points: &[DVector<f64>], params: &LshParams) -> Result<Self> {
        ensure!(!points.is_empty(), "cannot index an empty point set");
        ensure!(
            params.num_hashes >= 1 && params.num_hashes <= 32,
            "num_hashes must be 1..=32, got {}",
            params.num_hashes
        );
        ensure!(params.num_tables >= 1, "num_tables must be nonzero");

        let dimension = points[0].len();
        let mut rng = StdRng::seed_from_u64(params.seed);

        let projections: Vec<DMatrix<f64>> = (0..params.num_tables)
            .map(|_| {
                DMatrix::from_fn(params.num_hashes, dimension, |_, _| {
                    StandardNormal.sample(&mut rng)
                })
            })
            .collect();

        let mut tables: Vec<HashMap<u32, Vec<usize>>> =
            vec![HashMap::new(); params.num_tables];
        for (idx, point) in points.iter().enumerate() {
            ensure!(
                point.len() == dimension,
                "point {idx} has dimension {}, expected {dimension}",
                point.len()
            );
            for (table, projection) in tables.iter_mut().zip(&projections) {
                let h = Self::hash_with(projection, point);
                table.entry(h).or_default().push(idx);
            }
        }

        Ok(Self {
            projections,
            tables,
            num_points: points.len(),
            dimension,
        })
    }

    /// Sign-pattern hash of a vector under one table's projections.
    fn hash_with(projection: &DMatrix<f64>, v: &DVector<f64>) -> u32 {
        let projected = projection * v;
        projected
            .iter()
            .enumerate()
            .fold(0u32, |h, (i, &x)| if x > 0.0 { h | (1 << i) } else { h })
    }

    /// Candidate indices for a query: the union of its bucket across all
    /// tables, sorted and deduplicated.
    ///
    /// An empty result means no bucket matched — the caller must fall
    /// back to exact search rather than treat this as "no neighbor".
    pub fn candidates(&self, v: &DVector<f64>) -> Vec<usize> {
        let mut found: Vec<usize> = self
            .tables
            .iter()
            .zip(&self.projections)
            .filter_map(|(table, projection)| table.get(&Self::hash_with(projection, v)))
            .flatten()
            .copied()
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }

    /// Number of points in the indexed snapshot.
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Dimension of the indexed points.
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

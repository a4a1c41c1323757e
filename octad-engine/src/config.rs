// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Octad-Proprietary
// See LICENSE in the repository root for full license terms.

//! Runtime configuration for the lattice quantizer.
//!
//! Defines the per-quantizer parameters (reduction quality, tolerances,
//! search budget), compute backend selection, and approximate-index
//! parameters.

use octad_math::MathError;
use serde::{Deserialize, Serialize};

/// Compute backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendSelection {
    /// Host (CPU) dense linear algebra.
    Cpu,
    /// Device-accelerated backend on the given CUDA device.
    Gpu { device_id: usize },
}

/// Parameters for the random-hyperplane approximate-neighbor index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LshParams {
    /// Sign bits per table (hash width). Must be 1..=32.
    pub num_hashes: usize,
    /// Number of independent hash tables.
    pub num_tables: usize,
    /// RNG seed for the hyperplane projections; a fixed seed makes index
    /// construction reproducible.
    pub seed: u64,
}

impl Default for LshParams {
    fn default() -> Self {
        Self {
            num_hashes: 12,
            num_tables: 6,
            seed: 0x0C7A_D5EE,
        }
    }
}

/// Full configuration for a [`crate::quantizer::LatticeQuantizer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantizerConfig {
    /// Lovász parameter for the LLL reduction backing the nearest-plane
    /// path. Must lie in (0.25, 1).
    pub lll_delta: f64,
    /// Absolute tolerance for integrality / membership checks.
    pub tolerance: f64,
    /// Node budget for the exact closest-vector search; exhaustion is a
    /// recoverable, typed failure rather than an unbounded stall.
    pub exact_node_budget: u64,
    /// Which compute backend ranks candidate distances.
    pub backend: BackendSelection,
}

impl Default for QuantizerConfig {
    fn default() -> Self {
        Self {
            lll_delta: 0.75,
            tolerance: octad_math::linalg::DEFAULT_TOLERANCE,
            exact_node_budget: 20_000_000,
            backend: BackendSelection::Cpu,
        }
    }
}

impl QuantizerConfig {
    /// Stronger reduction for exactness-critical workloads.
    pub fn exactness_critical() -> Self {
        Self {
            lll_delta: 0.99,
            exact_node_budget: 200_000_000,
            ..Self::default()
        }
    }

    /// Validate every parameter, reporting the first violation.
    pub fn validate(&self) -> Result<(), MathError> {
        if !(self.lll_delta > 0.25 && self.lll_delta < 1.0) {
            return Err(MathError::Configuration(format!(
                "lll_delta must lie in (0.25, 1), got {}",
                self.lll_delta
            )));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(MathError::Configuration(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            )));
        }
        if self.exact_node_budget == 0 {
            return Err(MathError::Configuration(
                "exact_node_budget must be nonzero".to_string(),
            ));
        }
        Ok(())
    }
}

impl LshParams {
    /// Validate the index parameters.
    pub fn validate(&self) -> Result<(), MathError> {
        if self.num_hashes == 0 || self.num_hashes > 32 {
            return Err(MathError::Configuration(format!(
                "num_hashes must be 1..=32, got {}",
                self.num_hashes
            )));
        }
        if self.num_tables == 0 {
            return Err(MathError::Configuration(
                "num_tables must be nonzero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        QuantizerConfig::default().validate().unwrap();
        QuantizerConfig::exactness_critical().validate().unwrap();
    }

    #[test]
    fn test_validation_catches_bad_delta() {
        let mut config = QuantizerConfig::default();
        config.lll_delta = 1.5;
        assert!(config.validate().is_err());
        config.lll_delta = 0.25;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_catches_bad_lsh() {
        let mut params = LshParams::default();
        params.num_hashes = 0;
        assert!(params.validate().is_err());

        let mut params = LshParams::default();
        params.num_hashes = 33;
        assert!(params.validate().is_err());

        let mut params = LshParams::default();
        params.num_tables = 0;
        assert!(params.validate().is_err());
        assert!(LshParams::default().validate().is_ok());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = QuantizerConfig::exactness_critical();
        let json = serde_json::to_string(&config).unwrap();
        let restored: QuantizerConfig = serde_json::from_str(&json).unwrap();
        assert!((restored.lll_delta - 0.99).abs() < 1e-12);
        assert_eq!(restored.backend, BackendSelection::Cpu);
        assert_eq!(restored.exact_node_budget, config.exact_node_budget);
    }
}

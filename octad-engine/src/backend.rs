//! Compute-backend strategy for candidate distance ranking.
//!
//! The quantizer routes its brute-force distance work through a
//! [`ComputeBackend`] trait object selected at construction, so a host
//! implementation and a device-accelerated one share an identical
//! contract. This build ships the host path; selecting the GPU backend
//! reports a typed configuration error after logging the fallback
//! condition.

use anyhow::{bail, Result};
use nalgebra::DVector;

use crate::config::BackendSelection;

/// Distance-ranking primitives over a fixed point set.
pub trait ComputeBackend: Send + Sync {
    /// Human-readable backend name for logs and stats.
    fn name(&self) -> &'static str;

    /// Index and squared distance of the point nearest to `query`.
    /// `None` iff `points` is empty.
    fn nearest_point(
        &self,
        points: &[DVector<f64>],
        query: &DVector<f64>,
    ) -> Option<(usize, f64)>;

    /// Nearest among a candidate subset given by indices into `points`.
    /// Out-of-range candidates are ignored; `None` iff no candidate is
    /// in range.
    fn nearest_of_candidates(
        &self,
        points: &[DVector<f64>],
        candidates: &[usize],
        query: &DVector<f64>,
    ) -> Option<(usize, f64)> {
        candidates
            .iter()
            .filter_map(|&i| {
                let p = points.get(i)?;
                Some((i, (query - p).norm_squared()))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Host dense linear algebra backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostBackend;

impl ComputeBackend for HostBackend {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn nearest_point(
        &self,
        points: &[DVector<f64>],
        query: &DVector<f64>,
    ) -> Option<(usize, f64)> {
        points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, (query - p).norm_squared()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Instantiate the backend named by the configuration.
pub fn create_backend(selection: BackendSelection) -> Result<Box<dyn ComputeBackend>> {
    match selection {
        BackendSelection::Cpu => Ok(Box::new(HostBackend)),
        BackendSelection::Gpu { device_id } => {
            tracing::warn!("GPU backend requested (device {device_id}) but not compiled in");
            bail!("GPU backend is not available in this build (requested device {device_id})")
        }
    }
}

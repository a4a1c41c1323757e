// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Octad-Proprietary
// See LICENSE in the repository root for full license terms.

//! Lattice quantization engine.
//!
//! Stateful orchestration over `octad-math`: per-lattice quantizer
//! facades with explicit lifecycle steps (construct → optionally reduce →
//! optionally build root system → optionally build approximate index),
//! compute-backend selection, a caller-owned worker pool for parallel
//! enumeration, and the batch Golay codec front end.

pub mod backend;
pub mod codec;
pub mod config;
pub mod lsh;
pub mod pool;
pub mod quantizer;

pub use backend::{ComputeBackend, HostBackend};
pub use codec::BlockCodec;
pub use config::{BackendSelection, LshParams, QuantizerConfig};
pub use lsh::LshIndex;
pub use pool::WorkerPool;
pub use quantizer::LatticeQuantizer;

// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Octad-Proprietary
// See LICENSE in the repository root for full license terms.

//! Lattice quantization mathematics.
//!
//! The pure-math half of the engine: exact-enough dense linear algebra,
//! Gram-Schmidt/LLL reduction, the extended binary Golay code, the
//! supported lattice families (E8, Leech, Coxeter-Todd, Barnes-Wall), and
//! the closest-vector solvers. Everything here is stateless or
//! write-once; orchestration (configuration, backends, worker pools,
//! approximate indexes) lives in `octad-engine`.

pub mod cvp;
pub mod error;
pub mod golay;
pub mod lattice;
pub mod linalg;
pub mod reduction;

pub use error::{MathError, Result};
pub use golay::GolayCode;
pub use lattice::{
    BarnesWallLattice, CoxeterToddLattice, E8Lattice, Lattice, LatticeBasis, LatticeFamily,
    LeechLattice,
};

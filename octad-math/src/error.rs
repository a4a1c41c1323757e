//! Failure taxonomy shared by every algorithm in this crate.
//!
//! Construction-time failures (`SingularBasis`, `Configuration`) are fatal:
//! a lattice is never handed out in a half-built state. Query-time failures
//! (`Uncorrectable`, `SearchBudgetExceeded`) are typed results the caller
//! can recover from — never NaN or garbage vectors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MathError {
    /// The basis matrix is rank-deficient / non-invertible, or a linear
    /// system over it is inconsistent beyond the configured tolerance.
    #[error("singular basis: {0}")]
    SingularBasis(String),

    /// The received word is farther than the Golay code's guaranteed
    /// correction radius (more than 3 bit errors).
    #[error("uncorrectable word: no error pattern of weight <= 3 matches the syndrome")]
    Uncorrectable,

    /// The exact closest-vector search ran out of its node budget.
    /// Recoverable: retry with the nearest-plane heuristic or raise the budget.
    #[error("exact search exceeded its node budget ({visited} nodes visited, budget {budget})")]
    SearchBudgetExceeded { visited: u64, budget: u64 },

    /// An invalid parameter (LLL delta out of range, unknown lattice
    /// family, bad index parameters).
    #[error("configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_condition() {
        let e = MathError::SingularBasis("rank 7 of 8".into());
        assert!(e.to_string().contains("singular"));

        let e = MathError::SearchBudgetExceeded {
            visited: 1001,
            budget: 1000,
        };
        assert!(e.to_string().contains("1001"));
        assert!(e.to_string().contains("1000"));
    }
}

//! Error handling for the sigmoid pipeline.
//!
//! Every failure aborts the current driver invocation; nothing is retried.
//! The four kinds mirror the stages of the pipeline: parameter/key setup,
//! modular arithmetic misuse, noise exhaustion, and decryption/decoding.

use std::fmt;

/// Sigmoid pipeline error.
#[derive(Debug)]
pub enum SigmoidError {
    /// The FHE library rejected the requested (N, q, t) triple, or no
    /// batching-friendly plaintext prime of the requested size exists.
    /// Raised at initialization; fatal.
    Parameter(String),

    /// Arithmetic misuse, such as inverting zero or feeding the evaluator
    /// a malformed ciphertext. Indicates a programming bug.
    Domain(String),

    /// The evaluated ciphertext carries more residual noise than decryption
    /// tolerates. Fatal for the current parameter set.
    NoiseBudgetExhausted(String),

    /// Decoding produced an empty or malformed slot vector.
    Decryption(String),
}

impl fmt::Display for SigmoidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigmoidError::Parameter(msg) => write!(f, "parameter error: {}", msg),
            SigmoidError::Domain(msg) => write!(f, "domain error: {}", msg),
            SigmoidError::NoiseBudgetExhausted(msg) => {
                write!(f, "noise budget exhausted: {}", msg)
            }
            SigmoidError::Decryption(msg) => write!(f, "decryption error: {}", msg),
        }
    }
}

impl std::error::Error for SigmoidError {}

/// Result type for sigmoid pipeline operations.
pub type Result<T> = std::result::Result<T, SigmoidError>;

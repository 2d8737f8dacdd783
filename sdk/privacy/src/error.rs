//! Error types for note proof assembly and proving.
use thiserror::Error;

/// Errors raised while turning a settled note into prover inputs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrivacyError {
    /// The note has no tree index or hash path yet; retry after settlement
    #[error("Note {commitment} is not settled yet (no tree index or hash path)")]
    NoteNotSettled { commitment: String },

    /// The hash path does not have one level per tree level
    #[error("Malformed hash path: {levels} levels, tree depth is {depth}")]
    MalformedHashPath { levels: usize, depth: usize },

    /// Raw hash path bytes could not be decoded
    #[error("Invalid hash path encoding: {0}")]
    InvalidHashPathEncoding(String),

    /// The leaf index does not fit in a tree of the configured depth
    #[error("Leaf index {index} out of range for tree depth {depth}")]
    LeafIndexOutOfRange { index: u64, depth: usize },

    /// The external prover failed or returned garbage
    #[error("Prover error: {0}")]
    Prover(String),
}

impl PrivacyError {
    /// The hash path is unusable (wrong depth or undecodable); re-fetch it.
    pub fn is_malformed_path(&self) -> bool {
        matches!(
            self,
            PrivacyError::MalformedHashPath { .. } | PrivacyError::InvalidHashPathEncoding(_)
        )
    }
}

/// Result type for note proof operations
pub type Result<T> = std::result::Result<T, PrivacyError>;

//! Error types for ranking sessions.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankError {
    /// The sequence number does not match the outstanding request, or no
    /// request is outstanding. Nothing was changed.
    #[error("Invalid decision: expected sequence {}, got {got}", fmt_expected(.expected))]
    InvalidDecision { expected: Option<u64>, got: u64 },

    /// `Decision::Equal` submitted while ties are forbidden. Nothing was changed.
    #[error("Ties are not allowed in this session")]
    TieNotAllowed,

    #[error("Duplicate item ID: {0}")]
    DuplicateItem(i64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A snapshot failed validation. The session cannot be resumed from it.
    #[error("Corrupt session state: {0}")]
    CorruptState(String),
}

fn fmt_expected(expected: &Option<u64>) -> String {
    match expected {
        Some(seq) => seq.to_string(),
        None => "none (no request outstanding)".to_string(),
    }
}

/// Result type for ranking operations.
pub type Result<T> = std::result::Result<T, RankError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_decision_message() {
        let err = RankError::InvalidDecision { expected: Some(4), got: 3 };
        assert_eq!(err.to_string(), "Invalid decision: expected sequence 4, got 3");

        let err = RankError::InvalidDecision { expected: None, got: 1 };
        assert!(err.to_string().contains("no request outstanding"));
    }
}

use thiserror::Error;

/// Errors raised anywhere in the matching pipeline.
///
/// Every variant is terminal for the current run; nothing in the crate retries.
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Format error at row {row}: {reason}")]
    Format { row: usize, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Alignment error: reference has {reference_len} genes, sample has {sample_len}")]
    LengthMismatch {
        reference_len: usize,
        sample_len: usize,
    },

    #[error("Alignment error at position {position}: reference '{reference}' != sample '{sample}'")]
    Alignment {
        position: usize,
        reference: String,
        sample: String,
    },

    #[error("Computation error: {0}")]
    Computation(String),
}

impl MatchError {
    /// True for both flavours of misaligned input.
    pub fn is_alignment(&self) -> bool {
        matches!(
            self,
            MatchError::LengthMismatch { .. } | MatchError::Alignment { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;

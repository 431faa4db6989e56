use std::path::PathBuf;

/// Failures raised by the bank-backed provider and bank loading.
#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("Unknown exercise type: '{0}'")]
    UnknownExerciseType(String),
    #[error("No exercises of type '{exercise_type}' at level '{level}'")]
    UnknownLevel {
        exercise_type: String,
        level: String,
    },
    #[error("Exercise index {index} is out of range (bank holds {len})")]
    IndexOutOfRange { index: u64, len: usize },
    #[error("Exercise has no answer to evaluate against")]
    MissingAnswer,
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse exercise bank: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid exercise in '{exercise_type}/{level}' at position {position}: {source}")]
    Invalid {
        exercise_type: String,
        level: String,
        position: usize,
        #[source]
        source: lingo_core::ContractError,
    },
}

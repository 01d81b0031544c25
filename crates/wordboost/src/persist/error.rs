use crate::repr::EnsembleValidationError;

/// Errors raised while saving or loading a model.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported schema version {found}, this build reads version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("expected model type `{expected}`, found `{found}`")]
    UnexpectedModelType { expected: &'static str, found: String },

    #[error("malformed model: {0}")]
    Validation(String),

    #[error("invalid ensemble: {0}")]
    InvalidEnsemble(#[from] EnsembleValidationError),
}

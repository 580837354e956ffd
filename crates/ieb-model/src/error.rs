use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown backoff kind: {0}")]
    UnknownKind(String),

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;

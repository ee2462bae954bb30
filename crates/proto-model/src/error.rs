use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid component id: {0:?}")]
    InvalidComponentId(String),
    #[error("invalid composition id: {0:?}")]
    InvalidCompositionId(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;

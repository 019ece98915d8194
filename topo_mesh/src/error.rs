use thiserror::Error;

/// Failure to read an elevation out of a label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed elevation text {0:?}")]
    Malformed(String),
}

/// Errors from assembling mesh geometry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("need at least 3 distinct points, got {found}")]
    InsufficientPoints { found: usize },
}

/// Error reported by a model store, carrying the host error code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (code {code})")]
pub struct StoreError {
    pub code: i32,
    pub message: String,
}

impl StoreError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Reasons a mesh construction run aborts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstructionError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("no markers on the source layer")]
    NoMarkers,

    #[error("no labels on the source layer")]
    NoLabels,

    #[error("only {found} markers matched a label, need at least 3")]
    InsufficientMatches { found: usize },

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("model store error: {message} (code {code:?})")]
    StoreRejected { code: Option<i32>, message: String },
}

impl From<StoreError> for ConstructionError {
    fn from(err: StoreError) -> Self {
        Self::StoreRejected {
            code: Some(err.code),
            message: err.message,
        }
    }
}

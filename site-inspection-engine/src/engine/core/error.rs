use thiserror::Error;

/// Result alias for fallible viewer operations.
pub type ViewerResult<T> = Result<T, ViewerError>;

/// Local, recoverable failures. None of these stop the viewport; callers log and skip.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Element bounding box is missing, has the wrong shape or holds non-finite values.
    #[error("element '{guid}' has a malformed bounding box: {reason}")]
    MalformedBoundingBox { guid: String, reason: String },

    /// Point cloud payload could not be turned into position triples.
    #[error("point cloud payload is malformed: {0}")]
    MalformedPointPayload(String),

    /// Runtime configuration holds a value the viewport cannot use.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Command name received from the frontend has no binding.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Status code outside COMPLETO, PARCIAL, INICIADO, AUSENTE.
    #[error("unknown status code: {0}")]
    UnknownStatus(String),
}

impl ViewerError {
    pub fn malformed_bbox(guid: &str, reason: impl Into<String>) -> Self {
        Self::MalformedBoundingBox {
            guid: guid.to_string(),
            reason: reason.into(),
        }
    }
}

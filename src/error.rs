use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("AWS error: {0}")]
    AwsError(String),
    #[error("AWS service error: {0}")]
    AwsServiceError(String),
}

impl CanvasError {
    /// The bare message, without the category prefix used by `Display`.
    pub fn message(&self) -> &str {
        match self {
            CanvasError::ValidationError(msg)
            | CanvasError::ConfigError(msg)
            | CanvasError::SerializationError(msg)
            | CanvasError::ResponseError(msg)
            | CanvasError::AwsError(msg)
            | CanvasError::AwsServiceError(msg) => msg,
        }
    }

    /// True for failures raised while calling the model or reading its answer.
    pub fn is_invocation(&self) -> bool {
        matches!(
            self,
            CanvasError::SerializationError(_)
                | CanvasError::ResponseError(_)
                | CanvasError::AwsError(_)
                | CanvasError::AwsServiceError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CanvasError>;

// src/error.rs

/// Failure to turn an image handle into its base64 text.
///
/// Produced by an [`ImageEncoder`](crate::encoder::ImageEncoder) and passed
/// through the normalizer untouched.
#[derive(thiserror::Error, Debug)]
pub enum EncodingError {
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Encoding task failed: {0}")]
    Task(String),
    #[error("Encoder error: {0}")]
    Encoder(String),
    #[error("Payload serialization error: {0}")]
    Payload(#[from] serde_json::Error),
}

impl From<tokio::task::JoinError> for EncodingError {
    fn from(err: tokio::task::JoinError) -> Self {
        EncodingError::Task(err.to_string())
    }
}

/// Failure to load a [`UnitParams`](crate::unit_config::UnitParams) preset.
#[derive(thiserror::Error, Debug)]
pub enum PresetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

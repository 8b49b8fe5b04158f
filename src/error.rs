use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnhanceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {parameter} = {value} ({reason})")]
    InvalidConfiguration {
        parameter: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write report: {0}")]
    Report(#[from] serde_json::Error),
}

impl EnhanceError {
    pub(crate) fn invalid_config(
        parameter: &'static str,
        value: impl ToString,
        reason: &'static str,
    ) -> Self {
        EnhanceError::InvalidConfiguration {
            parameter,
            value: value.to_string(),
            reason,
        }
    }
}

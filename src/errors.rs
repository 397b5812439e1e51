use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file type: {path}. Only image files are supported.")]
    InvalidFileType { path: String },

    #[error("File too large: {path}. Maximum size is {max_mb}MB.")]
    FileTooLarge { path: String, max_mb: u64 },

    #[error("Upload failed: {reason}")]
    UploadFailed { reason: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Campaign cannot start yet: {reason}")]
    CampaignNotReady { reason: String },
}

/// Convert to string for display layers
impl From<AppError> for String {
    fn from(error: AppError) -> Self {
        error.to_string()
    }
}

/// Custom result type
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(field: &str, message: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn upload_failed(reason: impl Into<String>) -> Self {
        Self::UploadFailed {
            reason: reason.into(),
        }
    }

    pub fn file_not_found(path: &str) -> Self {
        Self::FileNotFound {
            path: path.to_string(),
        }
    }

    pub fn invalid_file_type(path: &str) -> Self {
        Self::InvalidFileType {
            path: path.to_string(),
        }
    }

    pub fn file_too_large(path: &str, max_mb: u64) -> Self {
        Self::FileTooLarge {
            path: path.to_string(),
            max_mb,
        }
    }

    pub fn campaign_not_ready(reason: &str) -> Self {
        Self::CampaignNotReady {
            reason: reason.to_string(),
        }
    }

    /// Whether trying the same request again could succeed. The orchestrator
    /// never retries on its own; this only feeds diagnostics.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::Network(_) | AppError::UploadFailed { .. } | AppError::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_failures_are_retryable() {
        let err = AppError::upload_failed("Pinata API error 500");
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "Upload failed: Pinata API error 500");
    }

    #[test]
    fn test_validation_errors_are_not_retryable() {
        let err = AppError::validation("required_amount", "Must be greater than 0");
        assert!(!err.is_retryable());

        let message: String = err.into();
        assert_eq!(
            message,
            "Validation error: required_amount - Must be greater than 0"
        );
    }

    #[test]
    fn test_campaign_not_ready_is_not_retryable() {
        let err = AppError::campaign_not_ready("files have not been uploaded");
        assert!(!err.is_retryable());
    }
}

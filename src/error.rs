use thiserror::Error;

/// The only two ways an import can fail. Everything after the fetch degrades
/// to default field values instead of erroring.
#[derive(Debug, Clone, Error)]
pub enum ImportError {
    #[error("URL không hợp lệ: {0}")]
    InvalidUrl(String),

    #[error("Không thể tải trang: {message}")]
    FetchFailed {
        message: String,
        /// HTTP status of the failed proxy call, if the request got that far.
        status: Option<u16>,
    },
}

impl ImportError {
    pub fn fetch(message: impl Into<String>) -> Self {
        ImportError::FetchFailed {
            message: message.into(),
            status: None,
        }
    }

    pub fn http_status(status: u16) -> Self {
        ImportError::FetchFailed {
            message: format!("HTTP {}", status),
            status: Some(status),
        }
    }

    /// Network errors, rate limits and upstream 5xx are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ImportError::InvalidUrl(_) => false,
            ImportError::FetchFailed { status: None, .. } => true,
            ImportError::FetchFailed {
                status: Some(code), ..
            } => *code == 429 || (500..600).contains(code),
        }
    }
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChatError>;

/// Failures surfaced to the user at the point where they occur
#[derive(Debug, Error)]
pub enum ChatError {
    /// Missing or malformed API key. No provider call is made.
    #[error("credential error: {0}")]
    Credential(String),

    /// The PDF could not be read; nothing is added to the transcript.
    #[error("could not extract text from PDF: {0}")]
    Extraction(String),

    /// The provider rejected the request or reported an error mid-stream.
    #[error("provider error{}: {message}", status_suffix(.status))]
    Provider { status: Option<u16>, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The reply was interrupted before the provider finished it.
    #[error("reply cancelled")]
    Cancelled,
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

impl ChatError {
    pub fn provider(status: Option<u16>, message: impl Into<String>) -> Self {
        ChatError::Provider {
            status,
            message: message.into(),
        }
    }
}

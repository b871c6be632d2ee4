use std::time::Duration;

use thiserror::Error;

/// Failures talking to the remote record store. A missing record is not an
/// error: lookups report it as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("remote store is not configured")]
    NotConfigured,

    #[error("remote store did not respond within {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("remote store returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("failed to decode remote response: {0}")]
    Decode(String),
}

impl StoreError {
    /// Message shown in the dashboard's alert banner when a save fails.
    pub fn save_failure_message(&self) -> &'static str {
        match self {
            StoreError::NotConfigured => {
                "Remote storage is not configured, so your data could not be saved."
            }
            StoreError::Timeout(_) => "The remote store did not respond in time. Please try again.",
            _ => "Failed to save data. Please check the remote store setup.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_details() {
        let err = StoreError::Service {
            status: 401,
            message: "Invalid API key".into(),
        };
        assert_eq!(err.to_string(), "remote store returned 401: Invalid API key");
        assert_eq!(
            StoreError::Timeout(Duration::from_millis(1500)).to_string(),
            "remote store did not respond within 1500ms"
        );
    }

    #[test]
    fn save_messages_distinguish_causes() {
        assert!(StoreError::NotConfigured
            .save_failure_message()
            .contains("not configured"));
        assert!(StoreError::Timeout(Duration::from_secs(5))
            .save_failure_message()
            .contains("in time"));
        assert!(StoreError::Transport("refused".into())
            .save_failure_message()
            .starts_with("Failed to save data"));
    }
}

//! Error types for the pixelate-and-publish pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or stage a selected file
    #[error("File selection failed: {0}")]
    Selection(String),

    /// Failed to encode a rasterized snapshot
    #[error("Snapshot encoding failed: {0}")]
    Encode(String),

    /// The upload request could not be completed (connect, timeout, body read)
    #[error("Publish transport error: {0}")]
    Transport(String),

    /// The upload endpoint answered, but not in the expected shape
    #[error("Upload protocol error: {0}")]
    Protocol(String),

    /// A publish was triggered while another one is still in flight
    #[error("A publish is already in flight")]
    PublishInFlight,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_failure() {
        let e = Error::Protocol("response missing `data` field".into());
        assert!(e.to_string().contains("missing `data`"));

        let e = Error::Transport("connection refused".into());
        assert!(e.to_string().starts_with("Publish transport error"));
    }
}

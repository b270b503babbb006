// src/error.rs
use thiserror::Error;

/// Message shown for any failure on the way to the server.
pub const UPLOAD_FAILED: &str = "Upload failed! Please try again.";

/// Message shown when the server answers without a usable explanation.
pub const GENERIC_FAILURE: &str = "Something went wrong!";

/// Message shown when the camera had nothing to give.
pub const NO_FRAME: &str = "No image captured. Try again!";

/// The still image could not be turned into an upload payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("image encoding has no ',' between metadata and data")]
    MissingSeparator,

    #[error("image encoding does not declare a media type")]
    MissingMediaType,

    #[error("image payload is not valid base64: {0}")]
    InvalidPayload(String),
}

/// Anything that went wrong talking to the recognition service.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Request(String),

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("server reply was not valid JSON: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_decode() {
            TransportError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            TransportError::Status(status.as_u16())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        TransportError::Decode(e.to_string())
    }
}

/// Everything that can stop an attempt from producing a recognition.
///
/// None of these ever reach the caller of a trigger; the controller turns
/// each one into a terminal state with a short notice.
#[derive(Error, Debug)]
pub enum AttemptError {
    #[error("no frame available from the camera")]
    CaptureUnavailable,

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("reply has no recognizable status")]
    ClassificationMismatch { message: Option<String> },
}

impl AttemptError {
    /// Short human-readable notice for the presentation layer.
    pub fn user_message(&self) -> String {
        match self {
            AttemptError::CaptureUnavailable => NO_FRAME.to_string(),
            AttemptError::Encoding(_) | AttemptError::Transport(_) => UPLOAD_FAILED.to_string(),
            AttemptError::ClassificationMismatch { message } => message
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_and_encoding_failures_share_the_upload_notice() {
        let e = AttemptError::from(TransportError::Timeout);
        assert_eq!(e.user_message(), UPLOAD_FAILED);

        let e = AttemptError::from(EncodingError::MissingMediaType);
        assert_eq!(e.user_message(), UPLOAD_FAILED);
    }

    #[test]
    fn mismatch_prefers_server_message() {
        let e = AttemptError::ClassificationMismatch {
            message: Some("bad lighting".into()),
        };
        assert_eq!(e.user_message(), "bad lighting");

        let e = AttemptError::ClassificationMismatch { message: None };
        assert_eq!(e.user_message(), GENERIC_FAILURE);

        let e = AttemptError::ClassificationMismatch {
            message: Some(String::new()),
        };
        assert_eq!(e.user_message(), GENERIC_FAILURE);
    }
}

// src/capture/still.rs
use base64::{engine::general_purpose, Engine as _};
use std::fmt;

/// One encoded video frame, carried in its self-describing
/// `data:<mime>;base64,<payload>` form.
///
/// Never changes after creation; the attempt that captured it owns it until
/// it is handed to the encoder.
#[derive(Clone, PartialEq, Eq)]
pub struct StillImage {
    data_uri: String,
}

impl StillImage {
    /// Wrap an already-encoded data URI exactly as a camera produced it.
    pub fn from_data_uri(data_uri: impl Into<String>) -> Self {
        Self {
            data_uri: data_uri.into(),
        }
    }

    /// Build the data URI for raw encoded image bytes.
    pub fn from_bytes(media_type: &str, bytes: &[u8]) -> Self {
        let payload = general_purpose::STANDARD.encode(bytes);
        Self {
            data_uri: format!("data:{};base64,{}", media_type, payload),
        }
    }

    pub fn as_data_uri(&self) -> &str {
        &self.data_uri
    }

    pub fn len(&self) -> usize {
        self.data_uri.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data_uri.is_empty()
    }
}

// Frames are large; keep logs readable.
impl fmt::Debug for StillImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: String = self.data_uri.chars().take(32).collect();
        f.debug_struct("StillImage")
            .field("head", &head)
            .field("len", &self.data_uri.len())
            .finish()
    }
}

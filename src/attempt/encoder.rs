// src/attempt/encoder.rs
use base64::{engine::general_purpose, Engine as _};

use crate::capture::StillImage;
use crate::error::EncodingError;

pub const DEFAULT_FILE_NAME: &str = "captured.jpg";

/// Binary upload ready for a multipart body.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadPayload {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadPayload")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Decode a still image into an upload payload.
///
/// The metadata segment ends at the first `,`; the media type is whatever
/// sits between its first `:` and the next `;`.
pub fn encode(image: &StillImage, file_name: Option<&str>) -> Result<UploadPayload, EncodingError> {
    let (meta, data) = image
        .as_data_uri()
        .split_once(',')
        .ok_or(EncodingError::MissingSeparator)?;

    let media_type = media_type(meta).ok_or(EncodingError::MissingMediaType)?;

    let bytes = general_purpose::STANDARD
        .decode(data)
        .map_err(|e| EncodingError::InvalidPayload(e.to_string()))?;

    Ok(UploadPayload {
        file_name: file_name.unwrap_or(DEFAULT_FILE_NAME).to_string(),
        media_type: media_type.to_string(),
        bytes,
    })
}

fn media_type(meta: &str) -> Option<&str> {
    let (_, rest) = meta.split_once(':')?;
    let (mime, _) = rest.split_once(';')?;
    let mime = mime.trim();
    if mime.is_empty() {
        None
    } else {
        Some(mime)
    }
}

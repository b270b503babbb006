// src/service/http.rs
use anyhow::Result;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use log::{info, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::connector::RecognitionService;
use crate::attempt::encoder::UploadPayload;
use crate::attempt::outcome::ServiceReply;
use crate::config::Settings;
use crate::error::{EncodingError, TransportError};

/// Multipart field the backend reads the frame from.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub student_name: String,
    pub timestamp_ist: String,
    pub day_ist: String,
    #[serde(default)]
    pub photo_base64: Option<String>,
}

impl AttendanceRecord {
    /// Decoded JPEG of the cropped face, if the server sent one.
    pub fn photo_bytes(&self) -> Result<Option<Vec<u8>>, EncodingError> {
        self.photo_base64
            .as_deref()
            .map(|b64| {
                general_purpose::STANDARD
                    .decode(b64)
                    .map_err(|e| EncodingError::InvalidPayload(e.to_string()))
            })
            .transpose()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttendanceList {
    pub count: usize,
    pub items: Vec<AttendanceRecord>,
}

#[derive(Deserialize)]
struct HealthReply {
    message: String,
}

/// HTTP client for the attendance backend.
pub struct HttpRecognitionService {
    base_url: String,
    recognize_path: String,
    client: Client,
}

impl HttpRecognitionService {
    pub fn new(settings: &Settings) -> Result<Self> {
        info!("Using recognition service at {}", settings.server_url);

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .build()?;

        Ok(Self {
            base_url: settings.server_url.trim_end_matches('/').to_string(),
            recognize_path: settings.recognize_path.clone(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Backend banner from `GET /`.
    pub async fn health(&self) -> Result<String, TransportError> {
        let response = self.client.get(self.url("/")).send().await?;
        let reply: HealthReply = read_json(response).await?;
        Ok(reply.message)
    }

    pub async fn students(&self) -> Result<Vec<Student>, TransportError> {
        let response = self.client.get(self.url("/students")).send().await?;
        read_json(response).await
    }

    /// Most recent attendance records, newest first.
    pub async fn attendance(&self, limit: u32) -> Result<AttendanceList, TransportError> {
        let response = self
            .client
            .get(self.url("/attendance/list"))
            .query(&[("limit", limit)])
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn attendance_photo(&self, id: i64) -> Result<Vec<u8>, TransportError> {
        let url = self.url(&format!("/attendance/{}/photo", id));
        let response = check_status(self.client.get(url).send().await?)?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl RecognitionService for HttpRecognitionService {
    async fn submit(&self, payload: UploadPayload) -> Result<ServiceReply, TransportError> {
        info!(
            "Uploading {} ({}, {} bytes)",
            payload.file_name,
            payload.media_type,
            payload.bytes.len()
        );

        let part = Part::bytes(payload.bytes)
            .file_name(payload.file_name)
            .mime_str(&payload.media_type)?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self
            .client
            .post(self.url(&self.recognize_path))
            .multipart(form)
            .send()
            .await?;

        read_json(response).await
    }
}

fn check_status(response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        warn!("{} answered {}", response.url(), status);
        Err(TransportError::Status(status.as_u16()))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
    let response = check_status(response)?;
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_cleanly() {
        let settings = Settings {
            server_url: "http://example.test:8000/".into(),
            ..Settings::default()
        };
        let service = HttpRecognitionService::new(&settings).unwrap();
        assert_eq!(service.url("/recognize/"), "http://example.test:8000/recognize/");
        assert_eq!(service.url("students"), "http://example.test:8000/students");
    }

    #[test]
    fn attendance_photo_decodes() {
        let record: AttendanceRecord = serde_json::from_str(
            r#"{"id":3,"student_name":"Alice","timestamp_ist":"t","day_ist":"Monday","photo_base64":"/9j/"}"#,
        )
        .unwrap();
        assert_eq!(record.photo_bytes().unwrap(), Some(vec![0xFF, 0xD8, 0xFF]));

        let bare: AttendanceRecord = serde_json::from_str(
            r#"{"id":4,"student_name":"Bob","timestamp_ist":"t","day_ist":"Monday","photo_base64":null}"#,
        )
        .unwrap();
        assert_eq!(bare.photo_bytes().unwrap(), None);
    }
}

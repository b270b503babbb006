// src/service/connector.rs
use async_trait::async_trait;

use crate::attempt::encoder::UploadPayload;
use crate::attempt::outcome::ServiceReply;
use crate::error::TransportError;

/// The recognition backend as the attempt controller sees it.
#[async_trait]
pub trait RecognitionService: Send + Sync {
    /// Upload one frame and return the decoded reply.
    async fn submit(&self, payload: UploadPayload) -> Result<ServiceReply, TransportError>;
}

#[async_trait]
impl<S: RecognitionService + ?Sized> RecognitionService for std::sync::Arc<S> {
    async fn submit(&self, payload: UploadPayload) -> Result<ServiceReply, TransportError> {
        (**self).submit(payload).await
    }
}

// src/capture/camera.rs
use super::still::StillImage;

/// Source of still frames.
pub trait Camera: Send + Sync {
    /// Capture the current frame, or `None` if no frame is available.
    fn capture_frame(&self) -> Option<StillImage>;
}

impl<C: Camera + ?Sized> Camera for std::sync::Arc<C> {
    fn capture_frame(&self) -> Option<StillImage> {
        (**self).capture_frame()
    }
}

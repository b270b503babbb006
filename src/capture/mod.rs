// src/capture/mod.rs
pub mod camera;
pub mod snapshot;
pub mod still;

pub use camera::Camera;
pub use snapshot::FileCamera;
pub use still::StillImage;

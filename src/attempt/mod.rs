// src/attempt/mod.rs
pub mod controller;
pub mod encoder;
pub mod machine;
pub mod outcome;

pub use controller::{AttemptController, TriggerResult};
pub use encoder::{encode, UploadPayload};
pub use machine::{AttemptState, AttemptView, Notice, NoticeKind};
pub use outcome::{RecognitionOutcome, ServiceReply};

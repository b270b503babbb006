// src/service/mod.rs
pub mod connector;
pub mod http;

pub use connector::RecognitionService;
pub use http::{AttendanceList, AttendanceRecord, HttpRecognitionService, Student};

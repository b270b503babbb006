// src/lib.rs
//! Face-recognition attendance client.
//!
//! A frame is taken from a [`capture::Camera`], decoded into an upload by
//! [`attempt::encoder`], posted to the backend through a
//! [`service::RecognitionService`], and the reply is classified into a
//! [`attempt::RecognitionOutcome`]. [`attempt::AttemptController`] owns the
//! whole sequence; [`present`] turns its state into text.

pub mod attempt;
pub mod capture;
pub mod config;
pub mod error;
pub mod present;
pub mod service;

// src/attempt/outcome.rs
use log::info;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{AttemptError, GENERIC_FAILURE};

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_UNKNOWN: &str = "unknown";

/// Decoded JSON body of a `/recognize/` reply. Every field is optional;
/// what is present decides the outcome.
///
/// Fields that are not strings, or are blank, decode as `None` so an odd
/// but well-formed reply is classified instead of failing the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceReply {
    #[serde(default, deserialize_with = "text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub student: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub time_ist: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub day: Option<String>,
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

/// Result of one completed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionOutcome {
    Recognized { identity: String },
    Unrecognized,
    Failed { message: String },
}

impl RecognitionOutcome {
    /// Classify a server reply.
    ///
    /// Unknown status values become `Failed`; a reply with no status at
    /// all, or a success without an identity, is a mismatch.
    pub fn classify(reply: &ServiceReply) -> Result<Self, AttemptError> {
        let Some(status) = reply.status.as_deref() else {
            return Err(AttemptError::ClassificationMismatch {
                message: reply.message.clone(),
            });
        };

        if let (Some(time), Some(day)) = (&reply.time_ist, &reply.day) {
            info!("Server stamped reply '{}' at {} ({})", status, time, day);
        }

        match status {
            STATUS_SUCCESS => match &reply.student {
                Some(identity) => Ok(RecognitionOutcome::Recognized {
                    identity: identity.clone(),
                }),
                None => Err(AttemptError::ClassificationMismatch {
                    message: reply.message.clone(),
                }),
            },
            STATUS_UNKNOWN => Ok(RecognitionOutcome::Unrecognized),
            _ => Ok(RecognitionOutcome::Failed {
                message: reply
                    .message
                    .clone()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            }),
        }
    }

    /// Fold any attempt failure into a `Failed` outcome.
    pub fn from_error(error: &AttemptError) -> Self {
        RecognitionOutcome::Failed {
            message: error.user_message(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, RecognitionOutcome::Recognized { .. })
    }

    /// Transient notice text for this outcome.
    pub fn notice_text(&self) -> String {
        match self {
            RecognitionOutcome::Recognized { identity } => {
                format!("Attendance marked for {}", identity)
            }
            RecognitionOutcome::Unrecognized => "Face not recognized!".to_string(),
            RecognitionOutcome::Failed { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(json: &str) -> ServiceReply {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn success_is_recognized() {
        let outcome =
            RecognitionOutcome::classify(&reply(r#"{"status":"success","student":"Alice"}"#));
        assert_eq!(
            outcome.unwrap(),
            RecognitionOutcome::Recognized {
                identity: "Alice".into()
            }
        );
    }

    #[test]
    fn success_with_full_metadata() {
        let json = r#"{"status":"success","student":"Bob","time_ist":"2025-01-01T09:00:00+05:30","day":"Wednesday","message":"Attendance marked"}"#;
        assert!(RecognitionOutcome::classify(&reply(json)).unwrap().is_recognized());
    }

    #[test]
    fn unknown_is_unrecognized() {
        let json = r#"{"status":"unknown","message":"Face not recognized"}"#;
        assert_eq!(
            RecognitionOutcome::classify(&reply(json)).unwrap(),
            RecognitionOutcome::Unrecognized
        );
    }

    #[test]
    fn other_status_uses_message_or_fallback() {
        let with = reply(r#"{"status":"error","message":"bad lighting"}"#);
        assert_eq!(
            RecognitionOutcome::classify(&with).unwrap(),
            RecognitionOutcome::Failed {
                message: "bad lighting".into()
            }
        );

        let without = reply(r#"{"status":"weird"}"#);
        assert_eq!(
            RecognitionOutcome::classify(&without).unwrap(),
            RecognitionOutcome::Failed {
                message: GENERIC_FAILURE.into()
            }
        );
    }

    #[test]
    fn duplicate_is_failed_with_server_message() {
        let json = r#"{"status":"duplicate","student":"Alice","message":"Attendance already marked today"}"#;
        assert_eq!(
            RecognitionOutcome::classify(&reply(json)).unwrap(),
            RecognitionOutcome::Failed {
                message: "Attendance already marked today".into()
            }
        );
    }

    #[test]
    fn missing_status_is_a_mismatch() {
        let err = RecognitionOutcome::classify(&reply(r#"{"detail":"nope"}"#)).unwrap_err();
        assert!(matches!(err, AttemptError::ClassificationMismatch { message: None }));
        assert_eq!(
            RecognitionOutcome::from_error(&err),
            RecognitionOutcome::Failed {
                message: GENERIC_FAILURE.into()
            }
        );
    }

    #[test]
    fn blank_message_falls_back_to_generic() {
        for json in [
            r#"{"status":"error","message":""}"#,
            r#"{"status":"error","message":"   "}"#,
        ] {
            assert_eq!(
                RecognitionOutcome::classify(&reply(json)).unwrap(),
                RecognitionOutcome::Failed {
                    message: GENERIC_FAILURE.into()
                },
                "{json}"
            );
        }
    }

    #[test]
    fn numeric_status_is_a_mismatch_keeping_message() {
        let err = RecognitionOutcome::classify(&reply(r#"{"status":500,"message":"db down"}"#))
            .unwrap_err();
        assert!(matches!(err, AttemptError::ClassificationMismatch { .. }));
        assert_eq!(
            RecognitionOutcome::from_error(&err),
            RecognitionOutcome::Failed {
                message: "db down".into()
            }
        );
    }

    #[test]
    fn object_message_uses_generic_fallback() {
        let json = r#"{"status":"error","message":{"detail":"x"}}"#;
        assert_eq!(
            RecognitionOutcome::classify(&reply(json)).unwrap(),
            RecognitionOutcome::Failed {
                message: GENERIC_FAILURE.into()
            }
        );
    }

    #[test]
    fn identity_is_passed_through_unchanged() {
        let json = r#"{"status":"success","student":" Alice "}"#;
        assert_eq!(
            RecognitionOutcome::classify(&reply(json)).unwrap(),
            RecognitionOutcome::Recognized {
                identity: " Alice ".into()
            }
        );

        let blank = r#"{"status":"success","student":"  "}"#;
        assert!(RecognitionOutcome::classify(&reply(blank)).is_err());
    }

    #[test]
    fn success_without_student_is_a_mismatch() {
        let err = RecognitionOutcome::classify(&reply(r#"{"status":"success"}"#)).unwrap_err();
        assert!(matches!(err, AttemptError::ClassificationMismatch { .. }));
    }
}

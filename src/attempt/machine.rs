// src/attempt/machine.rs
//! Lifecycle of a single attendance attempt as a pure transition function.
//!
//! `step` never performs I/O. It maps the current view and an event to the
//! next view plus an [`Effect`] describing what the controller has to do
//! next. Events that make no sense in the current state are rejected with
//! `None` and leave the view untouched.

use chrono::{DateTime, Local};

use super::outcome::RecognitionOutcome;
use crate::capture::StillImage;
use crate::error::NO_FRAME;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptState {
    Idle,
    Capturing,
    Submitting,
    Completed(RecognitionOutcome),
}

impl AttemptState {
    pub fn is_busy(&self) -> bool {
        matches!(self, AttemptState::Capturing | AttemptState::Submitting)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Short-lived message for the user, shown once and then forgotten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Everything the presentation layer reads after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptView {
    pub state: AttemptState,
    /// Frame that produced the current outcome.
    pub image: Option<StillImage>,
    pub completed_at: Option<DateTime<Local>>,
    pub notice: Option<Notice>,
}

impl Default for AttemptView {
    fn default() -> Self {
        Self {
            state: AttemptState::Idle,
            image: None,
            completed_at: None,
            notice: None,
        }
    }
}

impl AttemptView {
    fn bare(state: AttemptState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    pub fn outcome(&self) -> Option<&RecognitionOutcome> {
        match &self.state {
            AttemptState::Completed(outcome) => Some(outcome),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    Trigger,
    FrameReady(StillImage),
    FrameMissing,
    Finished {
        outcome: RecognitionOutcome,
        image: StillImage,
        at: DateTime<Local>,
    },
    Reset,
}

#[derive(Debug, Clone)]
pub enum Effect {
    None,
    CaptureFrame,
    Submit(StillImage),
}

pub fn step(view: &AttemptView, event: Event) -> Option<(AttemptView, Effect)> {
    match (&view.state, event) {
        (AttemptState::Idle | AttemptState::Completed(_), Event::Trigger) => Some((
            AttemptView::bare(AttemptState::Capturing),
            Effect::CaptureFrame,
        )),

        (AttemptState::Capturing, Event::FrameMissing) => Some((
            AttemptView {
                notice: Some(Notice::error(NO_FRAME)),
                ..AttemptView::bare(AttemptState::Idle)
            },
            Effect::None,
        )),

        (AttemptState::Capturing, Event::FrameReady(image)) => Some((
            AttemptView::bare(AttemptState::Submitting),
            Effect::Submit(image),
        )),

        (AttemptState::Submitting, Event::Finished { outcome, image, at }) => {
            let notice = if outcome.is_recognized() {
                Notice::success(outcome.notice_text())
            } else {
                Notice::error(outcome.notice_text())
            };
            Some((
                AttemptView {
                    state: AttemptState::Completed(outcome),
                    image: Some(image),
                    completed_at: Some(at),
                    notice: Some(notice),
                },
                Effect::None,
            ))
        }

        (AttemptState::Idle | AttemptState::Completed(_), Event::Reset) => {
            Some((AttemptView::default(), Effect::None))
        }

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> StillImage {
        StillImage::from_bytes("image/jpeg", &[1, 2, 3])
    }

    fn completed(outcome: RecognitionOutcome) -> AttemptView {
        AttemptView {
            state: AttemptState::Completed(outcome),
            image: Some(frame()),
            completed_at: Some(Local::now()),
            notice: Some(Notice::success("done")),
        }
    }

    #[test]
    fn happy_path() {
        let idle = AttemptView::default();

        let (capturing, effect) = step(&idle, Event::Trigger).unwrap();
        assert_eq!(capturing.state, AttemptState::Capturing);
        assert!(matches!(effect, Effect::CaptureFrame));

        let (submitting, effect) = step(&capturing, Event::FrameReady(frame())).unwrap();
        assert_eq!(submitting.state, AttemptState::Submitting);
        assert!(matches!(effect, Effect::Submit(ref img) if *img == frame()));

        let at = Local::now();
        let outcome = RecognitionOutcome::Recognized {
            identity: "Alice".into(),
        };
        let (done, effect) = step(
            &submitting,
            Event::Finished {
                outcome: outcome.clone(),
                image: frame(),
                at,
            },
        )
        .unwrap();
        assert!(matches!(effect, Effect::None));
        assert_eq!(done.outcome(), Some(&outcome));
        assert_eq!(done.image, Some(frame()));
        assert_eq!(done.completed_at, Some(at));
        assert_eq!(done.notice.unwrap().kind, NoticeKind::Success);
    }

    #[test]
    fn trigger_ignored_while_busy() {
        for state in [AttemptState::Capturing, AttemptState::Submitting] {
            let view = AttemptView::bare(state);
            assert!(step(&view, Event::Trigger).is_none());
        }
    }

    #[test]
    fn missing_frame_returns_to_idle_with_notice() {
        let capturing = AttemptView::bare(AttemptState::Capturing);
        let (idle, _) = step(&capturing, Event::FrameMissing).unwrap();
        assert_eq!(idle.state, AttemptState::Idle);
        assert_eq!(idle.notice, Some(Notice::error(NO_FRAME)));
        assert!(idle.image.is_none());
    }

    #[test]
    fn retrigger_clears_previous_outcome() {
        let view = completed(RecognitionOutcome::Unrecognized);
        let (next, _) = step(&view, Event::Trigger).unwrap();
        assert_eq!(next, AttemptView::bare(AttemptState::Capturing));
    }

    #[test]
    fn reset_only_when_not_busy() {
        let view = completed(RecognitionOutcome::Failed {
            message: "x".into(),
        });
        let (idle, _) = step(&view, Event::Reset).unwrap();
        assert_eq!(idle, AttemptView::default());

        assert!(step(&AttemptView::bare(AttemptState::Submitting), Event::Reset).is_none());
    }

    #[test]
    fn stray_events_are_rejected() {
        let idle = AttemptView::default();
        assert!(step(&idle, Event::FrameMissing).is_none());
        assert!(step(&idle, Event::FrameReady(frame())).is_none());
        assert!(step(
            &AttemptView::bare(AttemptState::Capturing),
            Event::Finished {
                outcome: RecognitionOutcome::Unrecognized,
                image: frame(),
                at: Local::now(),
            }
        )
        .is_none());
    }
}

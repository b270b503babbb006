// src/attempt/controller.rs
use chrono::Local;
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

use super::encoder;
use super::machine::{step, AttemptView, Effect, Event, Notice};
use super::outcome::RecognitionOutcome;
use crate::capture::{Camera, StillImage};
use crate::error::{AttemptError, UPLOAD_FAILED};
use crate::service::RecognitionService;

/// What a call to [`AttemptController::trigger`] ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerResult {
    /// Another attempt was already running; nothing happened.
    Ignored,
    /// The camera had no frame; no request was sent.
    Aborted,
    Completed(RecognitionOutcome),
}

/// Owns the single attempt state and runs attempts one at a time.
///
/// Presentation code reads the state through [`subscribe`](Self::subscribe)
/// and never writes it.
pub struct AttemptController<C, S> {
    camera: C,
    service: S,
    file_name: String,
    busy: AtomicBool,
    view: watch::Sender<AttemptView>,
}

impl<C: Camera, S: RecognitionService> AttemptController<C, S> {
    pub fn new(camera: C, service: S) -> Self {
        let (view, _) = watch::channel(AttemptView::default());
        Self {
            camera,
            service,
            file_name: encoder::DEFAULT_FILE_NAME.to_string(),
            busy: AtomicBool::new(false),
            view,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<AttemptView> {
        self.view.subscribe()
    }

    pub fn view(&self) -> AttemptView {
        self.view.borrow().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Run one full attempt. Never fails: every error ends up in the view.
    pub async fn trigger(&self) -> TriggerResult {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Trigger ignored, attempt already in flight");
            return TriggerResult::Ignored;
        }
        let _guard = BusyGuard { owner: self };

        self.run().await
    }

    /// Back to `Idle`, forgetting the last outcome. Refused while busy.
    pub fn reset(&self) -> bool {
        if self.is_busy() {
            debug!("Reset refused, attempt in flight");
            return false;
        }
        self.apply(Event::Reset).is_some()
    }

    fn apply(&self, event: Event) -> Option<Effect> {
        let mut effect = None;
        self.view.send_if_modified(|view| match step(view, event) {
            Some((next, next_effect)) => {
                debug!("Attempt state -> {:?}", next.state);
                *view = next;
                effect = Some(next_effect);
                true
            }
            None => false,
        });
        effect
    }

    async fn run(&self) -> TriggerResult {
        if !matches!(self.apply(Event::Trigger), Some(Effect::CaptureFrame)) {
            return TriggerResult::Ignored;
        }
        info!("Attempt started");

        let Some(frame) = self.camera.capture_frame() else {
            warn!("{}", AttemptError::CaptureUnavailable);
            self.apply(Event::FrameMissing);
            return TriggerResult::Aborted;
        };

        let image = match self.apply(Event::FrameReady(frame)) {
            Some(Effect::Submit(image)) => image,
            _ => return TriggerResult::Ignored,
        };

        let outcome = match self.submit(&image).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Attempt failed: {}", e);
                RecognitionOutcome::from_error(&e)
            }
        };
        info!("Attempt finished: {:?}", outcome);

        self.apply(Event::Finished {
            outcome: outcome.clone(),
            image,
            at: Local::now(),
        });
        TriggerResult::Completed(outcome)
    }

    async fn submit(&self, image: &StillImage) -> Result<RecognitionOutcome, AttemptError> {
        let payload = encoder::encode(image, Some(&self.file_name))?;
        let reply = self.service.submit(payload).await?;
        RecognitionOutcome::classify(&reply)
    }
}

/// Clears the busy flag however the attempt ends, including when the
/// trigger future is dropped mid-flight.
struct BusyGuard<'a, C, S> {
    owner: &'a AttemptController<C, S>,
}

impl<C, S> Drop for BusyGuard<'_, C, S> {
    fn drop(&mut self) {
        self.owner.view.send_if_modified(|view| {
            if view.state.is_busy() {
                warn!("Attempt abandoned while {:?}", view.state);
                *view = AttemptView {
                    notice: Some(Notice::error(UPLOAD_FAILED)),
                    ..AttemptView::default()
                };
                true
            } else {
                false
            }
        });
        self.owner.busy.store(false, Ordering::SeqCst);
    }
}

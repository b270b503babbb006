// src/present.rs
use tokio::sync::watch;

use crate::attempt::{AttemptState, AttemptView, NoticeKind, RecognitionOutcome};

pub const BUSY_TEXT: &str = "Processing...";
pub const PLACEHOLDER_TEXT: &str = "Captured image will appear here";

/// Main line of text for the current view.
pub fn headline(view: &AttemptView) -> String {
    match &view.state {
        AttemptState::Capturing | AttemptState::Submitting => BUSY_TEXT.to_string(),
        AttemptState::Completed(RecognitionOutcome::Recognized { identity }) => {
            format!("Attendance marked: {}", identity)
        }
        AttemptState::Completed(RecognitionOutcome::Unrecognized) => {
            "Face not recognized!".to_string()
        }
        AttemptState::Completed(RecognitionOutcome::Failed { message }) => message.clone(),
        AttemptState::Idle => match &view.notice {
            Some(notice) => notice.text.clone(),
            None => PLACEHOLDER_TEXT.to_string(),
        },
    }
}

/// Headline plus the notice, capture time and frame size, one per line.
pub fn render(view: &AttemptView) -> String {
    let mut out = headline(view);

    if let Some(notice) = &view.notice {
        if view.state != AttemptState::Idle {
            let mark = match notice.kind {
                NoticeKind::Success => "[ok]",
                NoticeKind::Error => "[!!]",
            };
            out.push_str(&format!("\n  {} {}", mark, notice.text));
        }
    }
    if let Some(at) = view.completed_at {
        out.push_str(&format!("\n  at {}", at.format("%Y-%m-%d %H:%M:%S")));
    }
    if let Some(image) = &view.image {
        out.push_str(&format!("\n  frame: {} bytes encoded", image.len()));
    }
    out
}

/// Print every state change until the controller goes away.
pub async fn console(mut rx: watch::Receiver<AttemptView>) {
    while rx.changed().await.is_ok() {
        let text = render(&rx.borrow_and_update());
        println!("{}", text);
    }
}

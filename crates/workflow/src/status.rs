use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

/// Default display window for a status message.
pub const DEFAULT_STATUS_DISPLAY: Duration = Duration::from_secs(8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Success,
    Failure,
}

/// A message shown to the user after a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
    #[serde(skip)]
    shown_at: Instant,
}

impl Status {
    pub fn is_success(&self) -> bool {
        self.kind == StatusKind::Success
    }
}

/// Holds the latest status message and hides it once its window elapses.
///
/// Success and failure messages clear the same way. A new message replaces
/// the old one and restarts the window.
#[derive(Debug, Clone)]
pub struct StatusSlot {
    window: Duration,
    current: Option<Status>,
}

impl StatusSlot {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            current: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn show_success(&mut self, text: impl Into<String>) {
        self.show(StatusKind::Success, text.into());
    }

    pub fn show_failure(&mut self, text: impl Into<String>) {
        self.show(StatusKind::Failure, text.into());
    }

    fn show(&mut self, kind: StatusKind, text: String) {
        self.current = Some(Status {
            kind,
            text,
            shown_at: Instant::now(),
        });
    }

    /// The visible message, if its window has not elapsed.
    pub fn current(&self) -> Option<&Status> {
        self.current
            .as_ref()
            .filter(|status| status.shown_at.elapsed() < self.window)
    }

    pub fn is_visible(&self) -> bool {
        self.current().is_some()
    }

    /// Drop an expired message. Returns `true` if one was dropped.
    pub fn sweep(&mut self) -> bool {
        if self.current.is_some() && !self.is_visible() {
            self.current = None;
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

impl Default for StatusSlot {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_DISPLAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn success_clears_after_window() {
        let mut slot = StatusSlot::default();
        slot.show_success("Emails sent successfully to donors");

        tokio::time::advance(Duration::from_secs(7)).await;
        assert_eq!(
            slot.current().map(|s| s.text.as_str()),
            Some("Emails sent successfully to donors")
        );

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(slot.current().is_none());
        assert!(slot.sweep());
        assert!(!slot.sweep());
    }

    #[tokio::test(start_paused = true)]
    async fn failure_clears_the_same_way() {
        let mut slot = StatusSlot::new(Duration::from_secs(2));
        slot.show_failure("Notification failed");
        assert!(!slot.current().unwrap().is_success());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(!slot.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn new_message_restarts_window() {
        let mut slot = StatusSlot::new(Duration::from_secs(8));
        slot.show_failure("first");
        tokio::time::advance(Duration::from_secs(6)).await;
        slot.show_success("second");
        tokio::time::advance(Duration::from_secs(6)).await;

        assert_eq!(slot.current().unwrap().text, "second");
    }
}

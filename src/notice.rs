//! Transient user notifications ("toasts").

use tokio::sync::broadcast;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Fans notices out to every subscribed view. Sending with no subscribers is fine.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notice>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }

    pub fn success(&self, message: impl Into<String>) {
        let message = message.into();
        info!(notice = %message, "Success notice");
        self.publish(NoticeLevel::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        error!(notice = %message, "Error notice");
        self.publish(NoticeLevel::Error, message);
    }

    fn publish(&self, level: NoticeLevel, message: String) {
        let _ = self.sender.send(Notice { level, message });
    }
}

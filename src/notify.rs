//! Notification dispatcher: best-effort SMS-style messages.
//!
//! Request handlers push onto an unbounded channel and return immediately.
//! A single background worker drains the channel and hands each message to
//! a [`NotificationSink`]. Failed deliveries are logged and dropped.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Delivery to {phone} failed: {reason}")]
    Delivery { phone: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    BookingConfirmation,
    EmergencyAlert,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BookingConfirmation => "booking_confirmation",
            Self::EmergencyAlert => "emergency_alert",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub phone: String,
    pub message: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, phone: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            phone: phone.into(),
            message: message.into(),
        }
    }
}

/// Where notifications finally go (SMS gateway, push service, log).
pub trait NotificationSink: Send + Sync {
    fn deliver<'a>(&'a self, notification: &'a Notification) -> BoxFuture<'a, Result<(), NotifyError>>;
}

/// Default sink: writes each message to the log.
pub struct LogSink;

impl NotificationSink for LogSink {
    fn deliver<'a>(&'a self, notification: &'a Notification) -> BoxFuture<'a, Result<(), NotifyError>> {
        Box::pin(async move {
            tracing::info!(
                kind = notification.kind.as_str(),
                phone = %mask_phone(&notification.phone),
                message = %notification.message,
                "SMS notification"
            );
            Ok(())
        })
    }
}

pub type NotificationReceiver = UnboundedReceiver<Notification>;

/// Cloneable handle used by request handlers.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: UnboundedSender<Notification>,
}

impl Notifier {
    /// A notifier plus the receiving end, for callers that run their own worker.
    pub fn channel() -> (Self, NotificationReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Spawn the delivery worker. It exits once every `Notifier` clone is dropped.
    pub fn spawn(sink: Arc<dyn NotificationSink>) -> (Self, JoinHandle<()>) {
        let (notifier, receiver) = Self::channel();
        let handle = tokio::spawn(run_worker(receiver, sink));
        (notifier, handle)
    }

    /// Queue a notification. Never blocks and never fails the caller.
    pub fn dispatch(&self, notification: Notification) {
        if let Err(e) = self.sender.send(notification) {
            tracing::warn!(
                phone = %mask_phone(&e.0.phone),
                "Notification worker stopped, message dropped"
            );
        }
    }
}

pub async fn run_worker(mut receiver: NotificationReceiver, sink: Arc<dyn NotificationSink>) {
    while let Some(notification) = receiver.recv().await {
        if let Err(e) = sink.deliver(&notification).await {
            tracing::error!(
                kind = notification.kind.as_str(),
                error = %e,
                "Notification delivery failed"
            );
        }
    }
    tracing::debug!("Notification worker stopped");
}

/// Phone numbers in logs keep only their last four characters.
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    let keep = chars.len().saturating_sub(4);
    chars
        .iter()
        .enumerate()
        .map(|(i, c)| if i < keep { '*' } else { *c })
        .collect()
}

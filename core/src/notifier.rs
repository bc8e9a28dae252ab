//! Outbound notification seam
//!
//! The tracker only knows it can hand a finished message to a [`Notifier`].
//! Delivery failures are reported back but never retried or queued.

use std::error::Error as StdError;
use std::future::Future;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport failed: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    #[error("notification rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

pub trait Notifier: Send + Sync {
    /// Deliver one formatted message
    fn send(&self, message: &str) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// Writes notifications to the log instead of delivering them.
/// Used when no webhook is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        tracing::info!(target: "dropwatch::notification", "{}", message);
        Ok(())
    }
}

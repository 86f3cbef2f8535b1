//! Background email queue
//!
//! A bounded in-process queue with a single worker task. Submission is
//! explicit and fallible: a job is either accepted by the queue or the
//! caller gets an error immediately. Delivery failures are the worker's
//! concern: each job is attempted a fixed number of times with a fixed
//! backoff delay between attempts, then dropped with a logged error.

use crate::config::QueueConfig;
use crate::email::{EmailMessage, Mailer};
use crate::error::{AppError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Handle for submitting email jobs
#[derive(Clone)]
pub struct EmailQueue {
    sender: mpsc::Sender<EmailMessage>,
}

impl EmailQueue {
    /// Create a queue and the receiver half for its worker
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<EmailMessage>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    /// Submit a job. Succeeds once the queue has accepted the job; delivery
    /// is not awaited.
    pub fn submit(&self, message: EmailMessage) -> Result<()> {
        self.sender.try_send(message).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Email queue rejected job: {}", e))
        })
    }
}

/// Consume jobs from the queue until the sender side is dropped.
///
/// Spawn with `tokio::spawn(run_worker(receiver, mailer, config))`.
pub async fn run_worker(
    mut receiver: mpsc::Receiver<EmailMessage>,
    mailer: Arc<dyn Mailer>,
    config: QueueConfig,
) {
    while let Some(message) = receiver.recv().await {
        deliver(&*mailer, &message, &config).await;
    }
    info!("Email queue worker stopped");
}

async fn deliver(mailer: &dyn Mailer, message: &EmailMessage, config: &QueueConfig) {
    for attempt in 1..=config.max_attempts {
        match mailer.send(message).await {
            Ok(()) => {
                info!(to = %message.to, attempt, "Email sent");
                return;
            }
            Err(e) if attempt < config.max_attempts => {
                error!(to = %message.to, attempt, "Email send failed, retrying: {}", e);
                tokio::time::sleep(Duration::from_secs(config.backoff_secs)).await;
            }
            Err(e) => {
                error!(
                    to = %message.to,
                    attempts = config.max_attempts,
                    "Email send failed, dropping job: {}",
                    e
                );
            }
        }
    }
}

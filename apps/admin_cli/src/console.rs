//! Terminal presenters for notifications and confirmation prompts.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use client_core::{Confirmer, Notifier};
use shared::protocol::{Confirmation, Notification};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Default)]
pub struct ConsoleNotifier {
    errors: AtomicUsize,
}

impl ConsoleNotifier {
    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::SeqCst)
    }
}

impl Notifier for ConsoleNotifier {
    fn add(&self, notification: Notification) {
        let line = format_notification(&notification);
        if notification.is_error() {
            self.errors.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(detail = %notification.detail, "error notification");
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}

pub fn format_notification(notification: &Notification) -> String {
    format!("[{}] {}", notification.summary, notification.detail)
}

/// Asks on stdin. Anything other than an explicit yes declines.
pub struct StdinConfirmer;

#[async_trait]
impl Confirmer for StdinConfirmer {
    async fn confirm(&self, confirmation: &Confirmation) -> bool {
        let mut stdout = io::stdout();
        let prompt = format!("{}\n{} [s/N] ", confirmation.header, confirmation.message);
        if stdout.write_all(prompt.as_bytes()).await.is_err() || stdout.flush().await.is_err() {
            return false;
        }

        let mut answer = String::new();
        match BufReader::new(io::stdin()).read_line(&mut answer).await {
            Ok(_) => is_affirmative(&answer),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read confirmation");
                false
            }
        }
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "si" | "sí" | "y" | "yes"
    )
}

//! Null email sender implementation

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use fl_core::services::verification::EmailSender;
use fl_shared::utils::{identifier, mask};

/// Null email sender for development and testing
///
/// Mirrors [`crate::sms::NullSmsSender`] for the email channel: logs
/// instead of delivering, counts accepted messages, and can simulate
/// failures for testing failover paths.
#[derive(Clone)]
pub struct NullEmailSender {
    sent_count: Arc<AtomicU64>,
    simulate_failure: bool,
    console_output: bool,
}

impl NullEmailSender {
    pub fn new() -> Self {
        Self {
            sent_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: false,
            console_output: true,
        }
    }

    /// Create a sender with configurable options
    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            sent_count: Arc::new(AtomicU64::new(0)),
            simulate_failure,
            console_output,
        }
    }

    /// Total number of messages accepted so far
    pub fn sent_count(&self) -> u64 {
        self.sent_count.load(Ordering::SeqCst)
    }

    /// Reset the sent counter
    pub fn reset_counter(&self) {
        self.sent_count.store(0, Ordering::SeqCst);
    }
}

impl Default for NullEmailSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailSender for NullEmailSender {
    async fn send_email(
        &self,
        address: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<String, String> {
        let masked = mask::mask_email(address);

        if !identifier::is_valid_email(address) {
            return Err(format!("invalid recipient address: {}", masked));
        }

        if self.simulate_failure {
            warn!(
                recipient = %masked,
                provider = "null",
                "Null email sender simulating failure"
            );
            return Err("simulated email sending failure".to_string());
        }

        let message_id = format!("null-email-{}", Uuid::new_v4());
        let count = self.sent_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("NULL EMAIL SENDER - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("At: {}", Utc::now().to_rfc3339());
            println!("To: {}", masked);
            println!("Subject: {}", subject);
            println!("Message ID: {}", message_id);
            println!("Body: {}", html_body);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            provider = "null",
            recipient = %masked,
            message_id = %message_id,
            subject = %subject,
            "Email accepted by null sender"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "NullEmail"
    }
}

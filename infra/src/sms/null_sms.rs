//! Null SMS sender implementation
//!
//! A sender for development and offline operation that logs messages
//! instead of handing them to a gateway.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use fl_core::services::verification::SmsSender;
use fl_shared::utils::{identifier, mask};

/// Null SMS sender for development and testing
///
/// This implementation:
/// - Logs messages instead of sending them
/// - Validates recipient numbers like a real gateway would
/// - Generates message ids
/// - Tracks a sent counter for assertions
#[derive(Clone)]
pub struct NullSmsSender {
    /// Counter for the number of messages accepted
    sent_count: Arc<AtomicU64>,
    /// Whether to fail every send (for testing failover paths)
    simulate_failure: bool,
    /// Whether to echo messages to the console
    console_output: bool,
}

impl NullSmsSender {
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

impl Default for NullSmsSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsSender for NullSmsSender {
    async fn send_sms(&self, phone: &str, message: &str) -> Result<String, String> {
        let masked = mask::mask_phone(phone);

        // Reject what a real gateway would reject
        if !identifier::is_valid_phone(phone) {
            return Err(format!("invalid recipient number: {}", masked));
        }

        if self.simulate_failure {
            warn!(
                recipient = %masked,
                provider = "null",
                "Null SMS sender simulating failure"
            );
            return Err("simulated SMS sending failure".to_string());
        }

        let message_id = format!("null-sms-{}", Uuid::new_v4());
        let count = self.sent_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("NULL SMS SENDER - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("At: {}", Utc::now().to_rfc3339());
            println!("To: {}", masked);
            println!("Message ID: {}", message_id);
            println!("Content: {}", message);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            provider = "null",
            recipient = %masked,
            message_id = %message_id,
            message_length = message.len(),
            "SMS accepted by null sender"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "NullSms"
    }
}

//! Main verification service implementation

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};

use fl_shared::utils::{identifier, mask};

use crate::domain::entities::verification_record::{
    Channel, Purpose, RecordKey, VerificationRecord,
};
use crate::errors::{VerificationError, VerificationResult};

use super::config::VerificationServiceConfig;
use super::dispatcher::ChannelDispatcher;
use super::generator::CodeGenerator;
use super::rate_limiter::SendRateLimiter;
use super::store::{ConsumeOutcome, VerificationStore};
use super::sweeper::SweepTask;
use super::traits::VerificationStatusCallback;
use super::types::{RequestCodeResult, VerificationStatus};

/// Verification service for issuing and checking one-time codes
///
/// Owns the pending-code store, the send rate limiter and the expiry
/// sweep; delivery and the post-verification callback are injected
/// capabilities.
pub struct VerificationService<S: VerificationStore + 'static> {
    /// Store of pending codes
    store: Arc<S>,
    /// Delivery across SMS and email senders
    dispatcher: ChannelDispatcher,
    /// Minimum-interval limiter for sends
    rate_limiter: SendRateLimiter,
    /// Code generator
    generator: CodeGenerator,
    /// Callback notified after successful verification
    status_callback: Arc<dyn VerificationStatusCallback>,
    /// Service configuration
    config: VerificationServiceConfig,
    /// Background expired-record sweep
    sweep_task: SweepTask,
}

impl<S: VerificationStore + 'static> VerificationService<S> {
    /// Create a new verification service and start its sweep task
    ///
    /// Must be called from within a tokio runtime. The dispatcher's
    /// per-attempt timeout and quoted code lifetime are aligned with
    /// `config` here, so callers only wire senders into it.
    ///
    /// # Arguments
    ///
    /// * `store` - Pending-code storage implementation
    /// * `dispatcher` - Delivery senders for both channels
    /// * `status_callback` - Invoked after successful verification
    /// * `config` - Service configuration
    pub fn new(
        store: Arc<S>,
        dispatcher: ChannelDispatcher,
        status_callback: Arc<dyn VerificationStatusCallback>,
        config: VerificationServiceConfig,
    ) -> Self {
        let dispatcher = dispatcher
            .with_send_timeout(StdDuration::from_secs(config.send_timeout_seconds))
            .with_ttl_minutes(config.ttl_minutes);

        let sweep_task = SweepTask::spawn(
            Arc::clone(&store),
            StdDuration::from_secs(config.sweep_interval_minutes * 60),
        );

        Self {
            store,
            dispatcher,
            rate_limiter: SendRateLimiter::new(config.rate_limit_window_seconds),
            generator: CodeGenerator::new(config.code_length),
            status_callback,
            config,
            sweep_task,
        }
    }

    /// Issue a verification code and deliver it over the given channel
    ///
    /// This method:
    /// 1. Normalizes and validates the identifier
    /// 2. Checks the send rate limit for the key
    /// 3. Generates a new code and stores it, replacing any prior code
    /// 4. Dispatches the code (primary sender, then fallback)
    /// 5. Records the send against the rate limit window
    ///
    /// A code that could not be delivered by any sender is discarded
    /// again and the call fails with `DispatchFailure`.
    ///
    /// # Arguments
    ///
    /// * `identifier` - Phone number (SMS) or email address (EMAIL)
    /// * `channel` - Delivery channel
    /// * `purpose` - Business purpose of the code
    /// * `user_id` - Opaque user reference handed back on verification
    ///
    /// # Returns
    ///
    /// * `Ok(RequestCodeResult)` - Expiry, masked identifier and resend time
    /// * `Err(VerificationError)` - If validation, limiting or delivery fails
    pub async fn request_code(
        &self,
        identifier: &str,
        channel: Channel,
        purpose: Purpose,
        user_id: &str,
    ) -> VerificationResult<RequestCodeResult> {
        let normalized = normalize_identifier(identifier, channel)?;
        let masked = mask_identifier(&normalized, channel);
        let key = RecordKey::new(channel, &normalized);

        self.ensure_not_rate_limited(&key, &masked, channel, Utc::now())?;

        let code = self.generator.generate();
        let record = VerificationRecord::new(
            normalized.clone(),
            channel,
            code.clone(),
            purpose,
            user_id.to_string(),
            self.config.ttl_minutes,
            self.config.max_attempts,
        );
        let expires_at = record.expires_at;

        // Upsert replaces any prior pending code for this key
        self.store.put(record).await;

        tracing::info!(
            identifier = %masked,
            channel = %channel,
            purpose = %purpose,
            event = "code_issued",
            "Issued new verification code"
        );

        let dispatch = self.dispatcher.send(channel, &normalized, &code, purpose).await;

        // One send consumes one window whether or not delivery worked,
        // so a broken channel cannot be hammered with retries.
        let sent_at = Utc::now();
        self.rate_limiter.record(&key, sent_at);

        if !dispatch.delivered {
            self.store.delete(&key).await;
            tracing::error!(
                identifier = %masked,
                channel = %channel,
                event = "request_rolled_back",
                "Delivery failed through all senders; discarded pending code"
            );
            return Err(VerificationError::DispatchFailure);
        }

        if dispatch.via_fallback {
            tracing::warn!(
                identifier = %masked,
                channel = %channel,
                event = "fallback_delivery",
                "Verification code delivered via fallback sender"
            );
        }

        Ok(RequestCodeResult {
            expires_at,
            masked_identifier: masked,
            next_resend_at: sent_at
                + Duration::seconds(self.config.rate_limit_window_seconds as i64),
        })
    }

    /// Check a submitted code against the pending record for the key
    ///
    /// The whole decision (expiry, comparison, attempt counting, removal)
    /// runs as one atomic store step, so racing calls cannot double-spend
    /// attempts or resurrect a consumed code.
    ///
    /// # Arguments
    ///
    /// * `identifier` - Phone number (SMS) or email address (EMAIL)
    /// * `channel` - Channel the code was requested on
    /// * `code` - The submitted verification code
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The code matched; the record is consumed
    /// * `Err(VerificationError)` - Why verification did not succeed
    pub async fn verify_code(
        &self,
        identifier: &str,
        channel: Channel,
        code: &str,
    ) -> VerificationResult<()> {
        let normalized = normalize_identifier(identifier, channel)?;
        let masked = mask_identifier(&normalized, channel);

        // Malformed codes are rejected before touching the store so they
        // do not burn an attempt. The expected length is the generator's
        // effective (clamped) length, not the raw configured value.
        if code.len() != self.generator.length() as usize
            || !code.chars().all(|c| c.is_ascii_digit())
        {
            tracing::warn!(
                identifier = %masked,
                channel = %channel,
                code_length = code.len(),
                event = "invalid_code_format",
                "Invalid verification code format provided"
            );
            return Err(VerificationError::InvalidInput {
                message: "invalid verification code format".to_string(),
            });
        }

        let key = RecordKey::new(channel, &normalized);
        match self.store.consume(&key, code, Utc::now()).await {
            ConsumeOutcome::Missing => {
                tracing::warn!(
                    identifier = %masked,
                    channel = %channel,
                    event = "code_not_found",
                    "No pending verification code for identifier"
                );
                Err(VerificationError::NotFoundOrExpired)
            }
            ConsumeOutcome::Expired => {
                tracing::warn!(
                    identifier = %masked,
                    channel = %channel,
                    event = "code_expired",
                    "Verification code expired"
                );
                Err(VerificationError::Expired)
            }
            ConsumeOutcome::Verified { record } => {
                tracing::info!(
                    identifier = %masked,
                    channel = %channel,
                    event = "code_verified",
                    "Verification code successfully verified"
                );
                if let Err(e) = self
                    .status_callback
                    .on_verified(&record.user_id, channel, &record.identifier)
                    .await
                {
                    // Verification itself already succeeded; the callback
                    // failure is an observability concern, not the caller's
                    tracing::error!(
                        identifier = %masked,
                        channel = %channel,
                        error = %e,
                        event = "status_callback_failed",
                        "Verification status callback failed"
                    );
                }
                Ok(())
            }
            ConsumeOutcome::Mismatch { remaining_attempts } => {
                tracing::warn!(
                    identifier = %masked,
                    channel = %channel,
                    remaining_attempts = remaining_attempts,
                    event = "code_mismatch",
                    "Wrong verification code submitted"
                );
                Err(VerificationError::CodeMismatch { remaining_attempts })
            }
            ConsumeOutcome::Exhausted => {
                tracing::error!(
                    identifier = %masked,
                    channel = %channel,
                    event = "max_attempts_exceeded",
                    "Maximum verification attempts exceeded"
                );
                Err(VerificationError::AttemptsExceeded)
            }
        }
    }

    /// Read-only snapshot of the pending verification for a key
    ///
    /// Never mutates state; malformed identifiers simply report no
    /// pending record.
    pub async fn get_status(&self, identifier: &str, channel: Channel) -> VerificationStatus {
        let normalized = match channel {
            Channel::Sms => identifier::normalize_phone(identifier),
            Channel::Email => identifier::normalize_email(identifier),
        };
        let key = RecordKey::new(channel, &normalized);

        match self.store.get(&key).await {
            Some(record) => {
                let now = Utc::now();
                VerificationStatus {
                    exists: true,
                    expired: record.is_expired_at(now),
                    attempts: record.attempts,
                    max_attempts: record.max_attempts,
                    seconds_remaining: record.seconds_remaining_at(now),
                    purpose: Some(record.purpose),
                }
            }
            None => VerificationStatus::absent(),
        }
    }

    /// Discard any pending code for the key and issue a fresh one
    ///
    /// The rate limiter still applies and is checked before the pending
    /// record is discarded, so a rejected resend leaves the prior code
    /// verifiable.
    pub async fn resend_code(
        &self,
        identifier: &str,
        channel: Channel,
        purpose: Purpose,
        user_id: &str,
    ) -> VerificationResult<RequestCodeResult> {
        let normalized = normalize_identifier(identifier, channel)?;
        let masked = mask_identifier(&normalized, channel);
        let key = RecordKey::new(channel, &normalized);

        self.ensure_not_rate_limited(&key, &masked, channel, Utc::now())?;

        self.store.delete(&key).await;
        tracing::info!(
            identifier = %masked,
            channel = %channel,
            event = "resend_requested",
            "Discarded pending code before resend"
        );

        self.request_code(identifier, channel, purpose, user_id).await
    }

    fn ensure_not_rate_limited(
        &self,
        key: &RecordKey,
        masked: &str,
        channel: Channel,
        now: chrono::DateTime<Utc>,
    ) -> VerificationResult<()> {
        if !self.rate_limiter.is_limited(key, now) {
            return Ok(());
        }
        let retry_after_seconds = self
            .rate_limiter
            .seconds_until_allowed(key, now)
            .unwrap_or(self.config.rate_limit_window_seconds as i64);
        tracing::warn!(
            identifier = %masked,
            channel = %channel,
            retry_after_seconds = retry_after_seconds,
            event = "rate_limit_exceeded",
            "Verification code request rate limit exceeded"
        );
        Err(VerificationError::RateLimited {
            retry_after_seconds,
        })
    }

    /// Stop the background sweep task
    ///
    /// Also happens automatically when the service is dropped.
    pub fn shutdown(&self) {
        tracing::info!(
            event = "service_shutdown",
            "Stopping verification service background tasks"
        );
        self.sweep_task.shutdown();
    }
}

fn normalize_identifier(raw: &str, channel: Channel) -> VerificationResult<String> {
    match channel {
        Channel::Sms => {
            let normalized = identifier::normalize_phone(raw);
            if !identifier::is_valid_phone(&normalized) {
                return Err(VerificationError::InvalidInput {
                    message: "invalid phone number format".to_string(),
                });
            }
            Ok(normalized)
        }
        Channel::Email => {
            let normalized = identifier::normalize_email(raw);
            if !identifier::is_valid_email(&normalized) {
                return Err(VerificationError::InvalidInput {
                    message: "invalid email address format".to_string(),
                });
            }
            Ok(normalized)
        }
    }
}

fn mask_identifier(normalized: &str, channel: Channel) -> String {
    match channel {
        Channel::Sms => mask::mask_phone(normalized),
        Channel::Email => mask::mask_email(normalized),
    }
}

//! Code delivery across SMS and email channels with sender fallback

use std::time::Duration;

use tracing::{error, info, warn};

use fl_shared::utils::mask;

use crate::domain::entities::verification_record::{Channel, Purpose, DEFAULT_TTL_MINUTES};

use super::traits::{EmailSender, SmsSender};

/// Outcome of a delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// Whether any sender accepted the message
    pub delivered: bool,
    /// Whether the successful delivery went through the fallback sender
    pub via_fallback: bool,
}

/// Delivers verification codes through a primary sender per channel,
/// falling back to a secondary sender when the primary fails
///
/// Delivery failures never escape this type; the returned result says
/// what happened. Every sender attempt runs under its own timeout so a
/// hung provider cannot stall the request path.
pub struct ChannelDispatcher {
    sms: Box<dyn SmsSender>,
    sms_fallback: Option<Box<dyn SmsSender>>,
    email: Box<dyn EmailSender>,
    email_fallback: Option<Box<dyn EmailSender>>,
    send_timeout: Duration,
    ttl_minutes: i64,
}

impl ChannelDispatcher {
    /// Create a dispatcher with the given primary senders
    ///
    /// The owning service aligns `send_timeout` and the advertised code
    /// lifetime with its configuration at construction.
    pub fn new(sms: Box<dyn SmsSender>, email: Box<dyn EmailSender>) -> Self {
        Self {
            sms,
            sms_fallback: None,
            email,
            email_fallback: None,
            send_timeout: Duration::from_secs(10),
            ttl_minutes: DEFAULT_TTL_MINUTES,
        }
    }

    /// Add a fallback SMS sender tried when the primary fails
    pub fn with_sms_fallback(mut self, fallback: Box<dyn SmsSender>) -> Self {
        self.sms_fallback = Some(fallback);
        self
    }

    /// Add a fallback email sender tried when the primary fails
    pub fn with_email_fallback(mut self, fallback: Box<dyn EmailSender>) -> Self {
        self.email_fallback = Some(fallback);
        self
    }

    /// Set the timeout budget for each individual sender attempt
    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    /// Set the code lifetime quoted in message texts
    pub fn with_ttl_minutes(mut self, ttl_minutes: i64) -> Self {
        self.ttl_minutes = ttl_minutes;
        self
    }

    /// Deliver a code to an identifier over the given channel
    pub async fn send(
        &self,
        channel: Channel,
        identifier: &str,
        code: &str,
        purpose: Purpose,
    ) -> DispatchResult {
        match channel {
            Channel::Sms => self.send_via_sms(identifier, code, purpose).await,
            Channel::Email => self.send_via_email(identifier, code, purpose).await,
        }
    }

    async fn send_via_sms(&self, phone: &str, code: &str, purpose: Purpose) -> DispatchResult {
        let message = self.sms_text(code, purpose);
        let masked = mask::mask_phone(phone);

        match self.try_sms(self.sms.as_ref(), phone, &message).await {
            Ok(message_id) => {
                info!(
                    recipient = %masked,
                    provider = self.sms.provider_name(),
                    message_id = %message_id,
                    event = "code_dispatched",
                    "Verification code sent via SMS"
                );
                return DispatchResult {
                    delivered: true,
                    via_fallback: false,
                };
            }
            Err(e) => {
                warn!(
                    recipient = %masked,
                    provider = self.sms.provider_name(),
                    error = %e,
                    event = "primary_send_failed",
                    "Primary SMS sender failed, trying fallback"
                );
            }
        }

        let fallback = match &self.sms_fallback {
            Some(fallback) => fallback,
            None => {
                error!(
                    recipient = %masked,
                    event = "dispatch_failed",
                    "No fallback SMS sender configured"
                );
                return DispatchResult {
                    delivered: false,
                    via_fallback: false,
                };
            }
        };

        match self.try_sms(fallback.as_ref(), phone, &message).await {
            Ok(message_id) => {
                info!(
                    recipient = %masked,
                    provider = fallback.provider_name(),
                    message_id = %message_id,
                    event = "code_dispatched_fallback",
                    "Verification code sent via fallback SMS sender"
                );
                DispatchResult {
                    delivered: true,
                    via_fallback: true,
                }
            }
            Err(e) => {
                error!(
                    recipient = %masked,
                    provider = fallback.provider_name(),
                    error = %e,
                    event = "dispatch_failed",
                    "Both primary and fallback SMS senders failed"
                );
                DispatchResult {
                    delivered: false,
                    via_fallback: false,
                }
            }
        }
    }

    async fn send_via_email(&self, address: &str, code: &str, purpose: Purpose) -> DispatchResult {
        let subject = self.email_subject(purpose);
        let body = self.email_body(code, purpose);
        let masked = mask::mask_email(address);

        match self
            .try_email(self.email.as_ref(), address, &subject, &body)
            .await
        {
            Ok(message_id) => {
                info!(
                    recipient = %masked,
                    provider = self.email.provider_name(),
                    message_id = %message_id,
                    event = "code_dispatched",
                    "Verification code sent via email"
                );
                return DispatchResult {
                    delivered: true,
                    via_fallback: false,
                };
            }
            Err(e) => {
                warn!(
                    recipient = %masked,
                    provider = self.email.provider_name(),
                    error = %e,
                    event = "primary_send_failed",
                    "Primary email sender failed, trying fallback"
                );
            }
        }

        let fallback = match &self.email_fallback {
            Some(fallback) => fallback,
            None => {
                error!(
                    recipient = %masked,
                    event = "dispatch_failed",
                    "No fallback email sender configured"
                );
                return DispatchResult {
                    delivered: false,
                    via_fallback: false,
                };
            }
        };

        match self
            .try_email(fallback.as_ref(), address, &subject, &body)
            .await
        {
            Ok(message_id) => {
                info!(
                    recipient = %masked,
                    provider = fallback.provider_name(),
                    message_id = %message_id,
                    event = "code_dispatched_fallback",
                    "Verification code sent via fallback email sender"
                );
                DispatchResult {
                    delivered: true,
                    via_fallback: true,
                }
            }
            Err(e) => {
                error!(
                    recipient = %masked,
                    provider = fallback.provider_name(),
                    error = %e,
                    event = "dispatch_failed",
                    "Both primary and fallback email senders failed"
                );
                DispatchResult {
                    delivered: false,
                    via_fallback: false,
                }
            }
        }
    }

    async fn try_sms(
        &self,
        sender: &dyn SmsSender,
        phone: &str,
        message: &str,
    ) -> Result<String, String> {
        match tokio::time::timeout(self.send_timeout, sender.send_sms(phone, message)).await {
            Ok(result) => result,
            Err(_) => Err(format!(
                "{} timed out after {}s",
                sender.provider_name(),
                self.send_timeout.as_secs()
            )),
        }
    }

    async fn try_email(
        &self,
        sender: &dyn EmailSender,
        address: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, String> {
        match tokio::time::timeout(self.send_timeout, sender.send_email(address, subject, body))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(format!(
                "{} timed out after {}s",
                sender.provider_name(),
                self.send_timeout.as_secs()
            )),
        }
    }

    fn sms_text(&self, code: &str, purpose: Purpose) -> String {
        format!(
            "Your FundiLink {} code is: {}. It expires in {} minutes.",
            purpose_label(purpose),
            code,
            self.ttl_minutes
        )
    }

    fn email_subject(&self, purpose: Purpose) -> String {
        format!("Your FundiLink {} code", purpose_label(purpose))
    }

    fn email_body(&self, code: &str, purpose: Purpose) -> String {
        format!(
            "<p>Your FundiLink {} code is <strong>{}</strong>.</p>\
             <p>The code expires in {} minutes. If you did not request it, \
             you can safely ignore this email.</p>",
            purpose_label(purpose),
            code,
            self.ttl_minutes
        )
    }
}

fn purpose_label(purpose: Purpose) -> &'static str {
    match purpose {
        Purpose::Verification => "verification",
        Purpose::PasswordReset => "password reset",
        Purpose::Login => "login",
        Purpose::PhoneChange => "phone change",
        Purpose::EmailChange => "email change",
    }
}

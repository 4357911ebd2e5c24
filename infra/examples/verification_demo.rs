//! Example demonstrating the verification code flow with null senders
//!
//! Run with: cargo run --example verification_demo

use std::sync::Arc;

use fl_core::domain::entities::{Channel, Purpose};
use fl_core::services::verification::{
    ChannelDispatcher, MemoryVerificationStore, VerificationService, VerificationServiceConfig,
};
use fl_infra::{NullEmailSender, NullSmsSender, NullStatusCallback};
use fl_shared::config::VerificationSettings;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Development settings: short resend window, frequent sweeps
    let settings = VerificationSettings::development();
    let config = VerificationServiceConfig::from(settings);

    let dispatcher = ChannelDispatcher::new(
        Box::new(NullSmsSender::new()),
        Box::new(NullEmailSender::new()),
    );
    let service = VerificationService::new(
        Arc::new(MemoryVerificationStore::new()),
        dispatcher,
        Arc::new(NullStatusCallback::new()),
        config,
    );

    let phone = "+27821234567";

    println!("\n=== Requesting a verification code ===");
    match service
        .request_code(phone, Channel::Sms, Purpose::Verification, "demo-user")
        .await
    {
        Ok(result) => {
            println!("Code sent to {}", result.masked_identifier);
            println!("Expires at: {}", result.expires_at);
            println!("Next resend allowed at: {}", result.next_resend_at);
        }
        Err(e) => {
            eprintln!("Request failed: {}", e);
            return;
        }
    }

    println!("\n=== Checking status ===");
    let status = service.get_status(phone, Channel::Sms).await;
    println!(
        "Pending: {}, attempts: {}/{}, seconds remaining: {}",
        status.exists, status.attempts, status.max_attempts, status.seconds_remaining
    );

    println!("\n=== Submitting a wrong code ===");
    match service.verify_code(phone, Channel::Sms, "000000").await {
        Ok(()) => println!("Verified (unexpected)"),
        Err(e) => println!("Rejected: {} (code {})", e, e.code()),
    }

    println!("\n=== Requesting again inside the resend window ===");
    match service
        .resend_code(phone, Channel::Sms, Purpose::Verification, "demo-user")
        .await
    {
        Ok(_) => println!("Resent (window already passed)"),
        Err(e) => println!("Rejected: {} (code {})", e, e.code()),
    }

    println!("\nThe delivered code is visible in the null sender output above.");
    println!("Submit it through verify_code to complete the flow.");

    service.shutdown();
}

//! No-op verification status callback

use async_trait::async_trait;
use tracing::debug;

use fl_core::domain::entities::Channel;
use fl_core::services::verification::VerificationStatusCallback;

/// Callback that acknowledges verifications without acting on them
///
/// Used when the embedding application has no user-management layer to
/// notify, such as demos and standalone deployments.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStatusCallback;

impl NullStatusCallback {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl VerificationStatusCallback for NullStatusCallback {
    async fn on_verified(
        &self,
        user_id: &str,
        channel: Channel,
        _identifier: &str,
    ) -> Result<(), String> {
        debug!(
            user_id = %user_id,
            channel = %channel,
            "Verification acknowledged by null callback"
        );
        Ok(())
    }
}

//! Waiting between delivery attempts.

use async_trait::async_trait;
use std::time::Duration;

/// Non-blocking wait used by the retry loop.
///
/// The retry logic only asks for "wait this long", so it runs unchanged
/// under any executor or under a test double that returns immediately.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// [`Delay`] backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

/// Power-down between wake cycles
#[async_trait]
pub trait DeepSleep: Send {
    /// Arm the wake timer and suspend until it fires
    async fn deep_sleep(&mut self, duration: Duration);
}

/// Host stand-in for the RTC alarm: waits on a tokio timer
#[derive(Debug, Default)]
pub struct TimerSleep;

#[async_trait]
impl DeepSleep for TimerSleep {
    async fn deep_sleep(&mut self, duration: Duration) {
        info!("Going to deep sleep for {}s", duration.as_secs());
        tokio::time::sleep(duration).await;
    }
}

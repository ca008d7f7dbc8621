//! Timers and frame yields behind an injectable trait.
//!
//! All cosmetic delays (notice display, preloader fade, cross-fade) go
//! through a [`Scheduler`] so tests can run them without waiting.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

/// Approximate length of one rendered frame.
pub const FRAME: Duration = Duration::from_millis(16);

#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Suspend for `duration`.
    async fn sleep(&self, duration: Duration);

    /// Yield one rendering frame so layout can settle.
    async fn next_frame(&self) {
        self.sleep(FRAME).await;
    }
}

/// Real timers on the tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[async_trait]
impl Scheduler for TokioScheduler {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Completes every wait immediately, recording what was requested.
#[derive(Debug, Default)]
pub struct InstantScheduler {
    waits: Mutex<Vec<Duration>>,
    frames: Mutex<usize>,
}

impl InstantScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every sleep requested so far, in order.
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().map(|w| w.clone()).unwrap_or_default()
    }

    /// Number of frame yields requested so far.
    pub fn frames(&self) -> usize {
        self.frames.lock().map(|f| *f).unwrap_or_default()
    }
}

#[async_trait]
impl Scheduler for InstantScheduler {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut waits) = self.waits.lock() {
            waits.push(duration);
        }
        tokio::task::yield_now().await;
    }

    async fn next_frame(&self) {
        if let Ok(mut frames) = self.frames.lock() {
            *frames += 1;
        }
        tokio::task::yield_now().await;
    }
}

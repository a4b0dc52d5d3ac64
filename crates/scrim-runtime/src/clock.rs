#![forbid(unsafe_code)]

//! Awaitable animation frames.
//!
//! A [`FrameClock`] yields once per frame with the time elapsed since the
//! previous frame. Animations advance by that delta, so a host that falls
//! behind still finishes on schedule with fewer, larger steps.

use futures::future::LocalBoxFuture;
use web_time::Duration;

/// Nominal frame interval (~60 Hz).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Source of animation frames.
pub trait FrameClock {
    /// Wait for the next frame and return the time elapsed since this call.
    fn next_frame(&self) -> LocalBoxFuture<'static, Duration>;
}

/// Frame clock backed by tokio timers.
///
/// Honors paused/advanced tokio time, which keeps fade tests deterministic.
#[cfg(feature = "tokio-clock")]
#[derive(Debug, Clone, Copy)]
pub struct TokioFrameClock {
    interval: Duration,
}

#[cfg(feature = "tokio-clock")]
impl TokioFrameClock {
    /// Clock ticking at [`FRAME_INTERVAL`].
    pub fn new() -> Self {
        Self::with_interval(FRAME_INTERVAL)
    }

    /// Clock ticking at `interval` (clamped to at least 1ms).
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
        }
    }
}

#[cfg(feature = "tokio-clock")]
impl Default for TokioFrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "tokio-clock")]
impl FrameClock for TokioFrameClock {
    fn next_frame(&self) -> LocalBoxFuture<'static, Duration> {
        let interval = self.interval;
        Box::pin(async move {
            let start = tokio::time::Instant::now();
            tokio::time::sleep(interval).await;
            start.elapsed()
        })
    }
}

/// Frame clock backed by browser timeouts.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutFrameClock;

#[cfg(target_arch = "wasm32")]
impl FrameClock for TimeoutFrameClock {
    fn next_frame(&self) -> LocalBoxFuture<'static, Duration> {
        Box::pin(async move {
            let start = web_time::Instant::now();
            gloo_timers::future::TimeoutFuture::new(FRAME_INTERVAL.as_millis() as u32).await;
            start.elapsed()
        })
    }
}

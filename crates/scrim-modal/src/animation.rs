#![forbid(unsafe_code)]

//! Tweening for backdrop fades and panel slides.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use scrim_modal::animation::{Easing, Tween};
//!
//! let mut fade = Tween::new(0.0, 1.0, Duration::from_millis(750), Easing::Swing);
//! fade.advance(Duration::from_millis(375));
//! assert!((fade.value() - 0.5).abs() < 1e-9);
//! ```
//!
//! # Invariants
//!
//! - Progress is always in [0.0, 1.0]
//! - `value()` equals `from` at progress 0 and `to` at progress 1
//! - A zero-duration tween is complete on construction
//!
//! # Failure Modes
//!
//! - Advancing a complete tween is a no-op

use serde::{Deserialize, Serialize};
use web_time::Duration;

// ============================================================================
// Easing Functions
// ============================================================================

/// Easing curve applied to tween progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Linear interpolation.
    Linear,
    /// Cosine S-curve; the classic default for DOM fades.
    #[default]
    Swing,
    /// Smooth ease-out (decelerating) - good for entrances.
    EaseOut,
    /// Smooth ease-in (accelerating) - good for exits.
    EaseIn,
    /// Smooth S-curve - good for general transitions.
    EaseInOut,
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0).
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Swing => 0.5 - (t * std::f64::consts::PI).cos() / 2.0,
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseIn => t * t * t,
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
        }
    }
}

// ============================================================================
// Tween
// ============================================================================

/// Interpolates a scalar from `from` to `to` over a fixed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
}

impl Tween {
    /// Create a tween starting at progress 0.
    pub fn new(from: f64, to: f64, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration,
            easing,
        }
    }

    /// Create a fade between two opacities.
    ///
    /// `full` is the duration of a complete 0→1 fade; a partial fade (for
    /// example reversing a half-finished fade-in) takes proportionally less.
    pub fn fade(from: f64, to: f64, full: Duration) -> Self {
        let from = from.clamp(0.0, 1.0);
        let to = to.clamp(0.0, 1.0);
        let duration = full.mul_f64((to - from).abs());
        Self::new(from, to, duration, Easing::Swing)
    }

    /// Advance by `delta`. Returns `true` if this call completed the tween.
    pub fn advance(&mut self, delta: Duration) -> bool {
        if self.is_complete() {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(delta).min(self.duration);
        self.is_complete()
    }

    /// Linear progress in [0.0, 1.0].
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Current interpolated value.
    pub fn value(&self) -> f64 {
        let eased = self.easing.apply(self.progress());
        self.from + (self.to - self.from) * eased
    }

    /// Whether the tween has reached its end value.
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Target value.
    pub fn target(&self) -> f64 {
        self.to
    }

    /// Total duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

// ============================================================================
// Tests
// ============================================================================

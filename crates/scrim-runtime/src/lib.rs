#![forbid(unsafe_code)]

//! Runtime primitives for single-threaded, event-loop-driven modals.
//!
//! # Role in Scrim
//! A modal transition suspends at three kinds of points: user hooks that
//! hand back a completion token, content fetches, and animation frames.
//! This crate provides the pieces that keep those suspensions ordered:
//!
//! - [`Signal`]/[`Resolver`]: one-shot completion tokens. Resolution
//!   consumes the resolver, so a token cannot be resolved twice.
//! - [`Generation`]: a monotonically increasing tag used to recognize and
//!   discard completions that belong to a superseded transition.
//! - [`TransitionGate`]: a FIFO mutual-exclusion region; only one
//!   transition writes visible state at a time.
//! - [`FrameClock`]: an awaitable source of animation frames.
//!
//! Everything here is `!Send`-friendly and expects to be driven by a single
//! thread (a browser event loop, or a current-thread tokio runtime).

pub mod clock;
pub mod gate;
pub mod generation;
pub mod signal;

pub use clock::FrameClock;
#[cfg(feature = "tokio-clock")]
pub use clock::TokioFrameClock;
#[cfg(target_arch = "wasm32")]
pub use clock::TimeoutFrameClock;
pub use gate::{GatePass, TransitionGate};
pub use generation::{Generation, GenerationTag};
pub use signal::{Cancelled, Resolver, Signal, signal};

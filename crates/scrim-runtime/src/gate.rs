#![forbid(unsafe_code)]

//! Per-instance transition gate.
//!
//! Only one transition may be inside the gate at a time. Waiters are served
//! in arrival order, so a close requested while an open is running starts
//! only after the open has fired its terminal hook.

use tokio::sync::{Mutex, MutexGuard};

/// FIFO mutual-exclusion region for lifecycle transitions.
#[derive(Debug, Default)]
pub struct TransitionGate {
    lock: Mutex<()>,
}

/// Proof of being inside the gate. Leaving scope releases it.
#[derive(Debug)]
pub struct GatePass<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl TransitionGate {
    /// Create an open gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the gate and enter it.
    pub async fn enter(&self) -> GatePass<'_> {
        GatePass {
            _guard: self.lock.lock().await,
        }
    }

    /// Whether a transition currently holds the gate.
    pub fn is_busy(&self) -> bool {
        self.lock.try_lock().is_err()
    }
}

#![forbid(unsafe_code)]

//! One-shot completion tokens.
//!
//! A [`Signal`] is the awaitable half; a [`Resolver`] is the control half.
//! [`Resolver::resolve`] takes `self`, so a token resolves at most once.
//! Dropping the resolver (or calling [`Resolver::reject`])
//! completes the signal with [`Cancelled`].
//!
//! # Example
//!
//! ```
//! use scrim_runtime::signal;
//!
//! let (resolver, token) = signal();
//! resolver.resolve();
//! assert_eq!(futures::executor::block_on(token), Ok(()));
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::channel::oneshot;

/// The resolver was dropped or rejected before resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("completion token was cancelled")
    }
}

impl std::error::Error for Cancelled {}

/// Awaitable half of a completion token.
#[must_use = "a signal does nothing unless awaited"]
pub struct Signal {
    state: SignalState,
}

enum SignalState {
    Ready,
    Pending(oneshot::Receiver<()>),
    Done,
}

/// Control half of a completion token.
pub struct Resolver {
    tx: oneshot::Sender<()>,
}

/// Create a connected resolver/signal pair.
pub fn signal() -> (Resolver, Signal) {
    let (tx, rx) = oneshot::channel();
    (
        Resolver { tx },
        Signal {
            state: SignalState::Pending(rx),
        },
    )
}

impl Signal {
    /// A signal that is already resolved.
    pub fn resolved() -> Self {
        Self {
            state: SignalState::Ready,
        }
    }

    /// Whether the signal resolved successfully without blocking.
    ///
    /// Returns `None` while still pending.
    pub fn try_resolved(&mut self) -> Option<Result<(), Cancelled>> {
        match &mut self.state {
            SignalState::Ready => Some(Ok(())),
            SignalState::Done => Some(Err(Cancelled)),
            SignalState::Pending(rx) => match rx.try_recv() {
                Ok(Some(())) => Some(Ok(())),
                Ok(None) => None,
                Err(_) => Some(Err(Cancelled)),
            },
        }
    }
}

impl Future for Signal {
    type Output = Result<(), Cancelled>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let result = match &mut self.state {
            SignalState::Ready => Ok(()),
            // Polled again after completion.
            SignalState::Done => Err(Cancelled),
            SignalState::Pending(rx) => match rx.poll_unpin(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Ok(())) => Ok(()),
                Poll::Ready(Err(oneshot::Canceled)) => Err(Cancelled),
            },
        };
        self.state = SignalState::Done;
        Poll::Ready(result)
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            SignalState::Ready => "ready",
            SignalState::Pending(_) => "pending",
            SignalState::Done => "done",
        };
        f.debug_struct("Signal").field("state", &state).finish()
    }
}

impl Resolver {
    /// Resolve the paired signal.
    pub fn resolve(self) {
        // The receiver may already be gone if the transition was abandoned.
        let _ = self.tx.send(());
    }

    /// Cancel the paired signal.
    pub fn reject(self) {
        drop(self);
    }

    /// Whether the paired signal has been dropped.
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_canceled()
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("abandoned", &self.is_abandoned())
            .finish()
    }
}

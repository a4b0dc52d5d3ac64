#![forbid(unsafe_code)]

//! Generation counter for discarding stale asynchronous completions.
//!
//! A transition captures a [`GenerationTag`] when it starts. Anything that
//! must supersede it (a close racing an open) calls [`Generation::bump`].
//! After each suspension point the transition checks
//! [`Generation::is_current`] and quietly abandons its remaining writes if
//! the tag has gone stale.

use std::cell::Cell;
use std::fmt;

/// Tag identifying one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenerationTag(u64);

impl GenerationTag {
    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GenerationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen{}", self.0)
    }
}

/// Monotonic per-instance generation counter.
#[derive(Debug, Default)]
pub struct Generation {
    current: Cell<u64>,
}

impl Generation {
    /// Start at generation zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag for the current generation.
    pub fn tag(&self) -> GenerationTag {
        GenerationTag(self.current.get())
    }

    /// Invalidate every outstanding tag and return the new one.
    pub fn bump(&self) -> GenerationTag {
        let next = self.current.get().wrapping_add(1);
        self.current.set(next);
        tracing::trace!(generation = next, "generation bumped");
        GenerationTag(next)
    }

    /// Whether `tag` still names the current generation.
    pub fn is_current(&self, tag: GenerationTag) -> bool {
        self.current.get() == tag.0
    }
}

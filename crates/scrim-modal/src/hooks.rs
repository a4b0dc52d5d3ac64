#![forbid(unsafe_code)]

//! Lifecycle hooks.
//!
//! Each [`HookPoint`] holds at most one callback; an empty slot is a no-op.
//! A callback returns either nothing (the transition proceeds immediately)
//! or a completion token that gates the next step:
//!
//! ```
//! use scrim_modal::hooks::{HookPoint, HookSet};
//! use scrim_runtime::signal;
//!
//! let hooks = HookSet::new()
//!     .on_open_complete(|ctx| tracing::info!(instance = %ctx.instance, "opened"))
//!     .on(HookPoint::CloseStart, |_| {
//!         let (resolver, token) = signal();
//!         // Hand `resolver` to a confirmation prompt.
//!         resolver.resolve();
//!         token
//!     });
//! assert!(hooks.is_set(HookPoint::CloseStart));
//! ```
//!
//! A token that is rejected (or whose resolver is dropped) cancels the
//! transition it gates.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use scrim_runtime::{Cancelled, Signal};

use crate::lifecycle::{InstanceId, ModalPhase};

/// Named hook slots, in the order a full cycle fires them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    InitComplete,
    RenderComplete,
    OpenStart,
    OpenComplete,
    CloseStart,
    CloseComplete,
    OpenInsideStart,
    OpenInsideComplete,
    PagingStart,
    PagingComplete,
}

impl HookPoint {
    pub const ALL: [Self; 10] = [
        Self::InitComplete,
        Self::RenderComplete,
        Self::OpenStart,
        Self::OpenComplete,
        Self::CloseStart,
        Self::CloseComplete,
        Self::OpenInsideStart,
        Self::OpenInsideComplete,
        Self::PagingStart,
        Self::PagingComplete,
    ];

    /// Whether a cancelled token at this point aborts the transition.
    pub fn is_start(self) -> bool {
        matches!(
            self,
            Self::OpenStart | Self::CloseStart | Self::OpenInsideStart | Self::PagingStart
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::InitComplete => "init_complete",
            Self::RenderComplete => "render_complete",
            Self::OpenStart => "open_start",
            Self::OpenComplete => "open_complete",
            Self::CloseStart => "close_start",
            Self::CloseComplete => "close_complete",
            Self::OpenInsideStart => "open_inside_start",
            Self::OpenInsideComplete => "open_inside_complete",
            Self::PagingStart => "paging_start",
            Self::PagingComplete => "paging_complete",
        }
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a hook sees when it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookContext {
    pub instance: InstanceId,
    pub point: HookPoint,
    pub phase: ModalPhase,
    /// URL being loaded, for hooks around a remote load.
    pub target: Option<String>,
}

/// Return value of a hook callback.
pub enum HookResult {
    /// Proceed immediately.
    Continue,
    /// Proceed once the future resolves; `Err` cancels the transition.
    Wait(LocalBoxFuture<'static, Result<(), Cancelled>>),
}

impl HookResult {
    /// Wait on an arbitrary future.
    pub fn wait<F>(future: F) -> Self
    where
        F: Future<Output = Result<(), Cancelled>> + 'static,
    {
        Self::Wait(Box::pin(future))
    }
}

impl From<()> for HookResult {
    fn from((): ()) -> Self {
        Self::Continue
    }
}

impl From<Signal> for HookResult {
    fn from(token: Signal) -> Self {
        Self::Wait(Box::pin(token))
    }
}

impl From<Option<Signal>> for HookResult {
    fn from(token: Option<Signal>) -> Self {
        token.map_or(Self::Continue, Self::from)
    }
}

impl fmt::Debug for HookResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continue => f.write_str("Continue"),
            Self::Wait(_) => f.write_str("Wait(..)"),
        }
    }
}

type HookFn = Rc<dyn Fn(&HookContext) -> HookResult>;

/// Callback slots for one modal instance.
#[derive(Clone, Default)]
pub struct HookSet {
    slots: HashMap<HookPoint, HookFn>,
}

impl HookSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill `point`, replacing any previous callback.
    pub fn on<F, R>(mut self, point: HookPoint, hook: F) -> Self
    where
        F: Fn(&HookContext) -> R + 'static,
        R: Into<HookResult>,
    {
        self.slots
            .insert(point, Rc::new(move |ctx: &HookContext| hook(ctx).into()));
        self
    }

    pub fn on_init_complete<F, R>(self, hook: F) -> Self
    where
        F: Fn(&HookContext) -> R + 'static,
        R: Into<HookResult>,
    {
        self.on(HookPoint::InitComplete, hook)
    }

    pub fn on_render_complete<F, R>(self, hook: F) -> Self
    where
        F: Fn(&HookContext) -> R + 'static,
        R: Into<HookResult>,
    {
        self.on(HookPoint::RenderComplete, hook)
    }

    pub fn on_open_start<F, R>(self, hook: F) -> Self
    where
        F: Fn(&HookContext) -> R + 'static,
        R: Into<HookResult>,
    {
        self.on(HookPoint::OpenStart, hook)
    }

    pub fn on_open_complete<F, R>(self, hook: F) -> Self
    where
        F: Fn(&HookContext) -> R + 'static,
        R: Into<HookResult>,
    {
        self.on(HookPoint::OpenComplete, hook)
    }

    pub fn on_close_start<F, R>(self, hook: F) -> Self
    where
        F: Fn(&HookContext) -> R + 'static,
        R: Into<HookResult>,
    {
        self.on(HookPoint::CloseStart, hook)
    }

    pub fn on_close_complete<F, R>(self, hook: F) -> Self
    where
        F: Fn(&HookContext) -> R + 'static,
        R: Into<HookResult>,
    {
        self.on(HookPoint::CloseComplete, hook)
    }

    pub fn on_open_inside_start<F, R>(self, hook: F) -> Self
    where
        F: Fn(&HookContext) -> R + 'static,
        R: Into<HookResult>,
    {
        self.on(HookPoint::OpenInsideStart, hook)
    }

    pub fn on_open_inside_complete<F, R>(self, hook: F) -> Self
    where
        F: Fn(&HookContext) -> R + 'static,
        R: Into<HookResult>,
    {
        self.on(HookPoint::OpenInsideComplete, hook)
    }

    pub fn on_paging_start<F, R>(self, hook: F) -> Self
    where
        F: Fn(&HookContext) -> R + 'static,
        R: Into<HookResult>,
    {
        self.on(HookPoint::PagingStart, hook)
    }

    pub fn on_paging_complete<F, R>(self, hook: F) -> Self
    where
        F: Fn(&HookContext) -> R + 'static,
        R: Into<HookResult>,
    {
        self.on(HookPoint::PagingComplete, hook)
    }

    /// Whether `point` has a callback.
    pub fn is_set(&self, point: HookPoint) -> bool {
        self.slots.contains_key(&point)
    }

    /// Fire the hook described by `ctx` and wait for its token, if any.
    pub async fn run(&self, ctx: &HookContext) -> Result<(), Cancelled> {
        let Some(hook) = self.slots.get(&ctx.point).cloned() else {
            return Ok(());
        };
        match hook(ctx) {
            HookResult::Continue => Ok(()),
            HookResult::Wait(token) => {
                tracing::debug!(point = %ctx.point, "waiting on hook token");
                token.await
            }
        }
    }
}

impl fmt::Debug for HookSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set: Vec<_> = self.slots.keys().map(|p| p.as_str()).collect();
        set.sort_unstable();
        f.debug_struct("HookSet").field("set", &set).finish()
    }
}

#![forbid(unsafe_code)]

//! Scrim public facade crate.
//!
//! Re-exports the types most hosts need from the internal crates and offers
//! a prelude for day-to-day usage.
//!
//! ```rust,ignore
//! use scrim::prelude::*;
//!
//! let props = ModalProps::new(ModalConfig::with_source(ContentSource::ByUrl("/page.html".into())))
//!     .hooks(HookSet::new().on_open_complete(|ctx| tracing::info!(%ctx.instance, "shown")));
//! let modal = ModalInstance::mount(host, props).await?;
//! modal.open().await?;
//! ```

// --- Core re-exports -------------------------------------------------------

pub use scrim_core::{
    DomEvent, DomEventKind, ElementId, KeyCode, PanelPlacement, Selector, SelectorError, Size,
    backdrop_size, panel_top,
};

// --- Runtime re-exports ----------------------------------------------------

pub use scrim_runtime::{
    Cancelled, FrameClock, GatePass, Generation, GenerationTag, Resolver, Signal, TransitionGate,
    signal,
};
#[cfg(feature = "tokio-clock")]
pub use scrim_runtime::TokioFrameClock;

// --- Modal re-exports ------------------------------------------------------

pub use scrim_modal::{
    CacheBuster, Component, ConfigError, Content, ContentLoader, ContentSource, Easing,
    ElementSpec, FetchRequest, HookContext, HookPoint, HookResult, HookSet, Host,
    InnerSwapBackdrop, InstanceId, Listener, ListenerSet, LoadError, ModalAction, ModalConfig,
    ModalElements, ModalError, ModalInstance, ModalPhase, ModalProps, Page, PagerConfig,
    PagerControls, PagerState, Progress, Result, SharedPage, Transition, Tween, extract_body,
};

// --- Web re-exports --------------------------------------------------------

#[cfg(feature = "web")]
pub use scrim_web::HttpLoader;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use scrim_web::{EventBinding, TimeoutFrameClock, WebPage, attach, browser_host};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ContentLoader, ContentSource, DomEvent, ElementId, HookContext, HookPoint, HookResult,
        HookSet, Host, KeyCode, ModalAction, ModalConfig, ModalError, ModalInstance, ModalPhase,
        ModalProps, Page, PagerConfig, Result, Selector, Signal, Transition, signal,
    };

    #[cfg(feature = "web")]
    pub use crate::HttpLoader;

    pub use crate::{core, modal, runtime};
}

pub use scrim_core as core;
pub use scrim_modal as modal;
pub use scrim_runtime as runtime;
#[cfg(feature = "web")]
pub use scrim_web as web;

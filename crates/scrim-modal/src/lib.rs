#![forbid(unsafe_code)]

//! Modal overlay lifecycle.
//!
//! # Role in Scrim
//! `scrim-modal` owns everything between "a trigger fired" and "the panel
//! and backdrop are on screen (or gone)": the lifecycle state machine, the
//! visibility sequencer that orders panel and backdrop writes against fade
//! completion, the event bridge that maps clicks and key presses to
//! transitions, and the contract for loading remote content.
//!
//! # How it fits in the system
//! A host supplies a [`Page`] (DOM measurements and writes), a
//! [`ContentLoader`] and a [`FrameClock`](scrim_runtime::FrameClock) in a
//! [`Host`], then mounts one [`ModalInstance`] per modal. `scrim-web`
//! provides browser/HTTP implementations; `scrim-harness` provides
//! in-memory ones for tests.
//!
//! ```rust,ignore
//! let modal = ModalInstance::mount(host, ModalConfig::with_source(
//!     ContentSource::ByUrl("/page.html".into()),
//! ).into()).await?;
//! modal.open().await?;
//! ```

pub mod animation;
pub mod bridge;
pub mod config;
pub mod elements;
pub mod error;
pub mod hooks;
pub mod lifecycle;
pub mod loader;
pub mod page;
pub mod pager;
pub mod sequencer;

pub use animation::{Easing, Tween};
pub use bridge::{Listener, ListenerSet, ModalAction};
pub use config::{ConfigError, ContentSource, InnerSwapBackdrop, ModalConfig, PagerConfig};
pub use elements::ModalElements;
pub use error::{LoadError, ModalError, Result};
pub use hooks::{HookContext, HookPoint, HookResult, HookSet};
pub use lifecycle::{Component, InstanceId, ModalInstance, ModalPhase, ModalProps, Transition};
pub use loader::{CacheBuster, Content, ContentLoader, FetchRequest, extract_body};
pub use page::{ElementSpec, Host, Page, SharedPage};
pub use pager::{PagerControls, PagerState};
pub use sequencer::Progress;

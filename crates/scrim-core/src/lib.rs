#![forbid(unsafe_code)]

//! Core: geometry, element handles, selectors, and DOM events.
//!
//! # Role in Scrim
//! `scrim-core` is the vocabulary layer. It owns the pure geometry that
//! positions a modal panel against the page scroll offset, the opaque
//! handles a host page uses to name its elements, and the normalized event
//! type the event bridge consumes.
//!
//! # How it fits in the system
//! `scrim-modal` drives the lifecycle and talks to a host page through these
//! types; `scrim-web` and `scrim-harness` translate real or simulated DOM
//! state into them. Nothing here performs I/O.

pub mod element;
pub mod event;
pub mod geometry;
pub mod selector;

pub use element::ElementId;
pub use event::{DomEvent, DomEventKind, KeyCode};
pub use geometry::{PanelPlacement, Size, backdrop_size, panel_top};
pub use selector::{Selector, SelectorError};

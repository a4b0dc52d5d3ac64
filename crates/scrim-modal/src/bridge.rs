#![forbid(unsafe_code)]

//! Event bridge: per-instance listener registrations and event mapping.
//!
//! Each instance owns a [`ListenerSet`]. Bindings are added at mount (and
//! the Escape binding on every open), removed explicitly (Escape on close,
//! everything on unmount), and never shared with another instance.
//!
//! # Invariants
//!
//! - A click that maps to an action has its default suppressed exactly once.
//! - Escape maps to a close only while the Escape binding is registered.
//! - An event that maps to nothing is left untouched.

use scrim_core::{DomEvent, DomEventKind, ElementId, Selector};

use crate::lifecycle::ModalPhase;
use crate::page::Page;
use crate::pager::PagerControls;

/// One registered trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listener {
    /// Click on (or inside) the backdrop.
    BackdropClick(ElementId),
    /// Click on a dismiss control inside `scope`.
    DismissClick { scope: ElementId, selector: Selector },
    /// Document-level Escape key.
    EscapeKey,
    /// Click on an in-page link whose target loads inside the panel.
    InnerLinkClick(Selector),
    /// Click on an element that opens the modal.
    OpenTriggerClick(Selector),
    /// Click on a pager control.
    PagerClick(PagerControls),
}

/// What a recognized event asks the instance to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalAction {
    Open,
    /// Dismiss control clicked.
    Close,
    EscapePressed,
    BackdropClicked,
    /// Load the URL inside the open panel.
    OpenInside(String),
    PagePrev,
    PageNext,
}

impl ModalAction {
    /// Whether this action closes the modal.
    pub fn is_dismiss(&self) -> bool {
        matches!(
            self,
            Self::Close | Self::EscapePressed | Self::BackdropClicked
        )
    }
}

/// Registered listeners of one instance.
#[derive(Debug, Clone, Default)]
pub struct ListenerSet {
    entries: Vec<Listener>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`. Registering an existing listener again is a no-op.
    pub fn bind(&mut self, listener: Listener) {
        if !self.entries.contains(&listener) {
            self.entries.push(listener);
        }
    }

    /// Remove `listener`. Returns whether it was registered.
    pub fn unbind(&mut self, listener: &Listener) -> bool {
        let before = self.entries.len();
        self.entries.retain(|l| l != listener);
        self.entries.len() != before
    }

    pub fn is_bound(&self, listener: &Listener) -> bool {
        self.entries.contains(listener)
    }

    /// Remove every registration.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Listener> {
        self.entries.iter()
    }

    /// Map `event` to an action for an instance in `phase`.
    ///
    /// Every mapped event, Escape included, has its default suppressed
    /// exactly once before returning.
    pub fn classify(
        &self,
        page: &dyn Page,
        phase: ModalPhase,
        event: &mut DomEvent,
    ) -> Option<ModalAction> {
        let action = match event.kind() {
            DomEventKind::KeyDown(_) => {
                let bound = self.is_bound(&Listener::EscapeKey);
                (bound && event.is_escape()).then_some(ModalAction::EscapePressed)
            }
            DomEventKind::Click => {
                let target = event.target()?;
                let seen: &DomEvent = event;
                self.entries
                    .iter()
                    .find_map(|listener| click_action(listener, page, phase, target, seen))
            }
        }?;

        event.prevent_default();
        Some(action)
    }
}

fn click_action(
    listener: &Listener,
    page: &dyn Page,
    phase: ModalPhase,
    target: ElementId,
    event: &DomEvent,
) -> Option<ModalAction> {
    let settled_open = phase == ModalPhase::Open;
    match listener {
        Listener::DismissClick { scope, selector } if phase != ModalPhase::Closed => {
            let hit = page.closest(target, selector)?;
            page.contains(*scope, hit).then_some(ModalAction::Close)
        }
        Listener::BackdropClick(backdrop) if phase != ModalPhase::Closed => page
            .contains(*backdrop, target)
            .then_some(ModalAction::BackdropClicked),
        Listener::PagerClick(controls) if settled_open => {
            if page.contains(controls.prev, target) {
                Some(ModalAction::PagePrev)
            } else if page.contains(controls.next, target) {
                Some(ModalAction::PageNext)
            } else {
                None
            }
        }
        Listener::InnerLinkClick(selector) if settled_open => {
            let link = page.closest(target, selector)?;
            let href = event
                .href()
                .map(str::to_string)
                .or_else(|| page.href(link))?;
            Some(ModalAction::OpenInside(href))
        }
        Listener::OpenTriggerClick(selector) if phase == ModalPhase::Closed => page
            .closest(target, selector)
            .map(|_| ModalAction::Open),
        _ => None,
    }
}

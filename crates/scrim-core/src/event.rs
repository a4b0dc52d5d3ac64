#![forbid(unsafe_code)]

//! Normalized DOM events delivered to a modal instance.
//!
//! The host page translates native listener callbacks into [`DomEvent`]s and
//! hands them to the instance. The instance decides whether the event is one
//! of its triggers and, if so, suppresses the default browser action through
//! [`DomEvent::prevent_default`].

use crate::element::ElementId;

/// Keyboard key identity, reduced to what the modal distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Escape key.
    Escape,
    /// Enter/Return key.
    Enter,
    /// Tab key.
    Tab,
    /// A printable character.
    Char(char),
    /// Any other legacy key code.
    Other(u32),
}

impl KeyCode {
    /// Map a legacy `keyCode`/`charCode` value.
    pub fn from_legacy(code: u32) -> Self {
        match code {
            27 => Self::Escape,
            13 => Self::Enter,
            9 => Self::Tab,
            c => match char::from_u32(c) {
                Some(ch) if !ch.is_control() => Self::Char(ch),
                _ => Self::Other(c),
            },
        }
    }

    /// Map a `KeyboardEvent.key` string.
    pub fn from_key(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Self::Char(ch),
                    _ => Self::Other(0),
                }
            }
        }
    }
}

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomEventKind {
    /// Primary-button click on `target`.
    Click,
    /// Key pressed anywhere in the document.
    KeyDown(KeyCode),
}

/// A single dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
    kind: DomEventKind,
    target: Option<ElementId>,
    href: Option<String>,
    prevent_default_calls: u32,
}

impl DomEvent {
    /// A click on `target`.
    pub fn click(target: ElementId) -> Self {
        Self {
            kind: DomEventKind::Click,
            target: Some(target),
            href: None,
            prevent_default_calls: 0,
        }
    }

    /// A document-level key press.
    pub fn key_down(code: KeyCode) -> Self {
        Self {
            kind: DomEventKind::KeyDown(code),
            target: None,
            href: None,
            prevent_default_calls: 0,
        }
    }

    /// Attach the resolved `href` of the clicked anchor.
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Event kind.
    pub fn kind(&self) -> DomEventKind {
        self.kind
    }

    /// Element the event was dispatched to, if any.
    pub fn target(&self) -> Option<ElementId> {
        self.target
    }

    /// Resolved link target for anchor clicks.
    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    /// Suppress the browser's default action for this event.
    pub fn prevent_default(&mut self) {
        self.prevent_default_calls += 1;
    }

    /// Whether the default action has been suppressed.
    pub fn default_prevented(&self) -> bool {
        self.prevent_default_calls > 0
    }

    /// How many times `prevent_default` was called.
    pub fn prevent_default_calls(&self) -> u32 {
        self.prevent_default_calls
    }

    /// Whether this is an Escape key press.
    pub fn is_escape(&self) -> bool {
        matches!(self.kind, DomEventKind::KeyDown(KeyCode::Escape))
    }
}

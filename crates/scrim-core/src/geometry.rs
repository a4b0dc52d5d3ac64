#![forbid(unsafe_code)]

//! Backdrop sizing and panel placement.
//!
//! All values are CSS pixels. Functions here are pure: the caller measures
//! the page, passes the numbers in, and writes the results back.
//!
//! # Invariants
//!
//! - The backdrop is never smaller than the viewport, the document, or the
//!   panel extent below the current scroll offset.
//! - A panel shorter than the viewport is centered in the visible area; a
//!   taller one is anchored at the saved scroll offset.
//! - The saved scroll offset is not overwritten while the page is
//!   over-scrolled past both the viewport and the document height.

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A size with both dimensions zero.
    pub const ZERO: Self = Self::new(0, 0);
}

/// Result of placing the panel: where its top edge goes and the scroll
/// offset that should be remembered for the matching close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelPlacement {
    /// Top edge of the panel in document coordinates.
    pub top: u32,
    /// Scroll offset to remember (and restore on close).
    pub saved_scroll_top: u32,
}

/// Size the backdrop so it covers the viewport, the whole document, and the
/// panel extent below the current scroll offset.
pub fn backdrop_size(viewport: Size, document: Size, panel: Size, scroll_top: u32) -> Size {
    let width = viewport.width.max(document.width).max(panel.width);
    let height = viewport
        .height
        .max(document.height)
        .max(panel.height.saturating_add(scroll_top));
    Size::new(width, height)
}

/// Place the panel relative to the scroll offset.
///
/// When the page is over-scrolled (`scroll_top` beyond both the viewport
/// and the document height, usually because a previous tall panel grew the
/// page) the previously saved offset is kept instead of the inflated one.
pub fn panel_top(
    viewport_height: u32,
    document_height: u32,
    panel_height: u32,
    scroll_top: u32,
    previous_saved_scroll_top: u32,
) -> PanelPlacement {
    let over_scrolled = viewport_height < scroll_top && document_height < scroll_top;
    let saved_scroll_top = if over_scrolled {
        previous_saved_scroll_top
    } else {
        scroll_top
    };

    let top = if panel_height < viewport_height {
        saved_scroll_top.saturating_add((viewport_height - panel_height) / 2)
    } else {
        saved_scroll_top
    };

    PanelPlacement {
        top,
        saved_scroll_top,
    }
}

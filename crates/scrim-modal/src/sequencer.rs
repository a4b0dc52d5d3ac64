#![forbid(unsafe_code)]

//! Visibility sequencer.
//!
//! Ordered show/hide writes for the panel and backdrop. Every operation is
//! an `async fn` that completes once its visible effect is committed, so the
//! returned future is the completion signal and cannot complete twice.
//!
//! # Invariants
//!
//! - Fades start from the backdrop's current opacity, so reversing a
//!   half-finished fade never jumps.
//! - Zero-duration fades and slides never wait on the frame clock.
//! - Without a backdrop, backdrop operations finish immediately and write
//!   nothing.
//! - A guarded run stops at the first frame after its generation goes stale
//!   and reports [`Progress::Interrupted`]; the element keeps whatever value
//!   it last received.

use scrim_core::{ElementId, PanelPlacement, backdrop_size, panel_top};
use scrim_runtime::{FrameClock, Generation, GenerationTag};

use crate::animation::Tween;
use crate::config::ModalConfig;
use crate::elements::ModalElements;
use crate::page::{Page, SharedPage};

/// How a sequenced write ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Finished,
    /// A newer transition superseded this one mid-animation.
    Interrupted,
}

impl Progress {
    pub fn is_finished(self) -> bool {
        self == Self::Finished
    }
}

/// Sequencer bound to one instance's elements.
pub(crate) struct Sequencer<'a> {
    page: &'a SharedPage,
    clock: &'a dyn FrameClock,
    config: &'a ModalConfig,
    elements: &'a ModalElements,
    guard: Option<(&'a Generation, GenerationTag)>,
}

impl<'a> Sequencer<'a> {
    pub(crate) fn new(
        page: &'a SharedPage,
        clock: &'a dyn FrameClock,
        config: &'a ModalConfig,
        elements: &'a ModalElements,
    ) -> Self {
        Self {
            page,
            clock,
            config,
            elements,
            guard: None,
        }
    }

    /// Stop animations once `tag` is no longer current.
    pub(crate) fn guarded(mut self, generation: &'a Generation, tag: GenerationTag) -> Self {
        self.guard = Some((generation, tag));
        self
    }

    fn is_stale(&self) -> bool {
        self.guard
            .is_some_and(|(generation, tag)| !generation.is_current(tag))
    }

    /// Measure the page and compute where the panel goes.
    pub(crate) fn place_panel(&self, previous_saved_scroll_top: u32) -> PanelPlacement {
        let page = self.page.borrow();
        let viewport = page.viewport_size();
        let document = page.document_size();
        let panel = page.outer_size(self.elements.panel);
        let placement = panel_top(
            viewport.height,
            document.height,
            panel.height,
            page.scroll_top(),
            previous_saved_scroll_top,
        );
        tracing::debug!(
            top = placement.top,
            saved_scroll_top = placement.saved_scroll_top,
            panel_height = panel.height,
            "panel placed"
        );
        placement
    }

    /// Show the panel at `top`, sliding there when `transition` is set, then
    /// make the body visible.
    pub(crate) async fn show_panel(&self, top: u32, transition: bool) -> Progress {
        let panel = self.elements.panel;
        let duration = self.config.panel_transition_value();
        let from = {
            let mut page = self.page.borrow_mut();
            page.set_displayed(panel, true);
            page.top(panel)
        };

        if transition && !duration.is_zero() && from != top {
            let tween = Tween::new(f64::from(from), f64::from(top), duration, self.config.panel_easing);
            let progress = self
                .run_tween(tween, |page, value| page.set_top(panel, value.round() as u32))
                .await;
            if !progress.is_finished() {
                return progress;
            }
        }

        let mut page = self.page.borrow_mut();
        page.set_top(panel, top);
        page.set_visible(self.elements.body, true);
        Progress::Finished
    }

    /// Hide the body and then the panel container.
    pub(crate) fn hide_panel(&self) {
        let mut page = self.page.borrow_mut();
        page.set_visible(self.elements.body, false);
        page.set_displayed(self.elements.panel, false);
    }

    /// Size the backdrop and fade it in.
    pub(crate) async fn show_backdrop(&self) -> Progress {
        let Some(backdrop) = self.elements.backdrop else {
            return Progress::Finished;
        };
        let from = {
            let mut page = self.page.borrow_mut();
            self.size_backdrop(&mut *page, backdrop);
            let from = if page.is_displayed(backdrop) {
                page.opacity(backdrop)
            } else {
                0.0
            };
            page.set_opacity(backdrop, from);
            page.set_displayed(backdrop, true);
            from
        };
        self.fade(backdrop, from, 1.0).await
    }

    /// Fade the backdrop out, then remove it from layout.
    pub(crate) async fn hide_backdrop(&self) -> Progress {
        let Some(backdrop) = self.elements.backdrop else {
            return Progress::Finished;
        };
        let from = {
            let page = self.page.borrow();
            if !page.is_displayed(backdrop) {
                return Progress::Finished;
            }
            page.opacity(backdrop)
        };
        let progress = self.fade(backdrop, from, 0.0).await;
        if progress.is_finished() {
            self.page.borrow_mut().set_displayed(backdrop, false);
        }
        progress
    }

    /// Re-measure and resize the backdrop without fading.
    pub(crate) fn resize_backdrop(&self) {
        if let Some(backdrop) = self.elements.backdrop {
            let mut page = self.page.borrow_mut();
            self.size_backdrop(&mut *page, backdrop);
        }
    }

    /// Resize, then fade in again from transparent.
    pub(crate) async fn refade_backdrop(&self) -> Progress {
        if let Some(backdrop) = self.elements.backdrop {
            self.page.borrow_mut().set_opacity(backdrop, 0.0);
        }
        self.show_backdrop().await
    }

    fn size_backdrop(&self, page: &mut dyn Page, backdrop: ElementId) {
        let size = backdrop_size(
            page.viewport_size(),
            page.document_size(),
            page.outer_size(self.elements.panel),
            page.scroll_top(),
        );
        tracing::debug!(width = size.width, height = size.height, "backdrop sized");
        page.set_size(backdrop, size);
    }

    async fn fade(&self, backdrop: ElementId, from: f64, to: f64) -> Progress {
        let tween = Tween::fade(from, to, self.config.fade_duration_value());
        if tween.duration().is_zero() {
            self.page.borrow_mut().set_opacity(backdrop, tween.target());
            return Progress::Finished;
        }
        self.run_tween(tween, |page, value| page.set_opacity(backdrop, value))
            .await
    }

    async fn run_tween<F>(&self, mut tween: Tween, mut apply: F) -> Progress
    where
        F: FnMut(&mut dyn Page, f64),
    {
        while !tween.is_complete() {
            let delta = self.clock.next_frame().await;
            if self.is_stale() {
                tracing::debug!("animation interrupted by a newer transition");
                return Progress::Interrupted;
            }
            tween.advance(delta);
            let value = tween.value();
            tracing::trace!(value, progress = tween.progress(), "frame");
            apply(&mut *self.page.borrow_mut(), value);
        }
        Progress::Finished
    }
}

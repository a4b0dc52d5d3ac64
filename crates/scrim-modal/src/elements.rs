#![forbid(unsafe_code)]

//! Mount-time panel structure.
//!
//! A created panel looks like
//!
//! ```text
//! div.modal-box
//! ├── div.modal-body      (content)
//! ├── a.dismiss
//! ├── a.prev / a.next     (pager only)
//! ```
//!
//! An adopted panel (`ById`) keeps its markup; missing pieces are created
//! inside it. Every lookup runs before anything is created, so a failed
//! mount leaves the page untouched.

use scrim_core::{ElementId, Selector};

use crate::config::{ContentSource, ModalConfig};
use crate::error::ModalError;
use crate::page::{ElementSpec, Page};
use crate::pager::{NEXT_CLASS, PREV_CLASS, PagerControls};

/// Elements a mounted instance writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalElements {
    pub panel: ElementId,
    pub body: ElementId,
    pub dismiss: ElementId,
    pub backdrop: Option<ElementId>,
    pub pager: Option<PagerControls>,
    /// Elements created at mount and removed at unmount.
    owned: Vec<ElementId>,
    adopted_panel: bool,
    shared_backdrop: bool,
}

impl ModalElements {
    /// Whether the panel existed before mount.
    pub fn is_panel_adopted(&self) -> bool {
        self.adopted_panel
    }

    /// Whether the backdrop may be shared with other instances.
    pub fn is_backdrop_shared(&self) -> bool {
        self.shared_backdrop
    }

    /// Elements this instance created.
    pub fn owned(&self) -> &[ElementId] {
        &self.owned
    }

    /// Locate or create every element `config` needs.
    pub(crate) fn build(page: &mut dyn Page, config: &ModalConfig) -> Result<Self, ModalError> {
        let adopted = match &config.content_source {
            Some(ContentSource::ById(id)) => Some(page.find_by_id(id).ok_or_else(|| {
                ModalError::InvalidConfig(format!("no element with id {id:?}"))
            })?),
            _ => None,
        };
        let inline = match &config.content_source {
            Some(ContentSource::Inline(selector)) => {
                Some(page.query(selector).first().copied().ok_or_else(|| {
                    ModalError::InvalidConfig(format!("no element matches {selector}"))
                })?)
            }
            _ => None,
        };
        let shared_backdrop = match (&config.backdrop_selector, config.backdrop_enabled) {
            (Some(selector), true) => {
                Some(page.query(selector).first().copied().ok_or_else(|| {
                    ModalError::InvalidConfig(format!("no backdrop matches {selector}"))
                })?)
            }
            _ => None,
        };

        let mut owned = Vec::new();
        let document_body = page.body();

        let panel = match adopted {
            Some(panel) => panel,
            None => {
                let panel = page.create_element(&ElementSpec::new("div", &config.panel_class));
                page.append_child(document_body, panel);
                owned.push(panel);
                panel
            }
        };
        let mut children = Vec::new();

        let body_selector = Selector::class(&config.body_class);
        let body = match adopted.and_then(|p| page.find_descendant(p, &body_selector)) {
            Some(body) => body,
            None => {
                let body = create_child(page, panel, &ElementSpec::new("div", &config.body_class));
                children.push(body);
                body
            }
        };
        if let Some(content) = inline {
            page.append_child(body, content);
        }

        let dismiss = match page.find_descendant(panel, &config.dismiss_selector) {
            Some(dismiss) => dismiss,
            None => {
                let spec = ElementSpec::from_selector(&config.dismiss_selector, "a")
                    .href("#")
                    .html("&times;");
                let dismiss = create_child(page, panel, &spec);
                children.push(dismiss);
                dismiss
            }
        };

        let pager = match &config.pager {
            Some(_) => {
                let prev = ElementSpec::new("a", PREV_CLASS).href("#").html("&lsaquo;");
                let next = ElementSpec::new("a", NEXT_CLASS).href("#").html("&rsaquo;");
                let controls = PagerControls {
                    prev: create_child(page, panel, &prev),
                    next: create_child(page, panel, &next),
                };
                children.extend([controls.prev, controls.next]);
                Some(controls)
            }
            None => None,
        };

        // Children of a created panel go away with it.
        if adopted.is_some() {
            owned.extend(children);
        }

        page.set_displayed(panel, false);
        page.set_visible(body, false);

        let backdrop = if !config.backdrop_enabled {
            None
        } else if let Some(shared) = shared_backdrop {
            Some(shared)
        } else {
            let backdrop = page.create_element(&ElementSpec::new("div", &config.backdrop_class));
            page.append_child(document_body, backdrop);
            page.set_displayed(backdrop, false);
            page.set_opacity(backdrop, 0.0);
            owned.push(backdrop);
            Some(backdrop)
        };

        Ok(Self {
            panel,
            body,
            dismiss,
            backdrop,
            pager,
            owned,
            adopted_panel: adopted.is_some(),
            shared_backdrop: shared_backdrop.is_some(),
        })
    }

    /// Remove created elements and hide adopted ones.
    pub(crate) fn teardown(&self, page: &mut dyn Page) {
        for el in self.owned.iter().rev() {
            page.remove_element(*el);
        }
        if self.adopted_panel {
            page.set_displayed(self.panel, false);
        }
    }
}

fn create_child(page: &mut dyn Page, parent: ElementId, spec: &ElementSpec) -> ElementId {
    let el = page.create_element(spec);
    page.append_child(parent, el);
    el
}

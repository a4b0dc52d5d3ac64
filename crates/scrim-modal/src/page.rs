#![forbid(unsafe_code)]

//! Host page abstraction.
//!
//! A modal never touches a DOM directly. Everything it measures or writes
//! goes through [`Page`], addressed by [`ElementId`] handles the host hands
//! out. Measurements are synchronous box-model queries; writes take effect
//! immediately.
//!
//! Two flags control what the user sees:
//!
//! - *displayed*: whether the element takes part in layout at all
//!   (`display: none` when false). Panels and backdrops are hidden this way.
//! - *visible*: whether a laid-out element paints (`visibility: hidden` when
//!   false). The panel body is hidden this way so its node and size survive.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use scrim_core::{ElementId, Selector, Size};
use scrim_runtime::FrameClock;

use crate::loader::ContentLoader;

/// Description of an element to create.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElementSpec {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub href: Option<String>,
    pub html: Option<String>,
}

impl ElementSpec {
    /// An element with `tag` and a single class.
    pub fn new(tag: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: vec![class.into()],
            ..Self::default()
        }
    }

    /// An element that `selector` matches, with `fallback_tag` when the
    /// selector names no tag.
    pub fn from_selector(selector: &Selector, fallback_tag: &str) -> Self {
        Self {
            tag: selector.tag().unwrap_or(fallback_tag).to_string(),
            id: selector.id_name().map(str::to_string),
            classes: selector.classes().to_vec(),
            ..Self::default()
        }
    }

    pub fn href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }
}

/// Synchronous measurement and mutation of a host document.
///
/// Operations on an element the page no longer knows are ignored (writes)
/// or report zero/false/`None` (reads).
pub trait Page {
    // --- Measurements ---

    /// Size of the visible viewport.
    fn viewport_size(&self) -> Size;
    /// Size of the whole document.
    fn document_size(&self) -> Size;
    /// Current vertical scroll offset.
    fn scroll_top(&self) -> u32;
    fn set_scroll_top(&mut self, top: u32);

    // --- Lookup ---

    /// The document body.
    fn body(&self) -> ElementId;
    /// All elements matching `selector`, in document order.
    fn query(&self, selector: &Selector) -> Vec<ElementId>;
    fn find_by_id(&self, id: &str) -> Option<ElementId>;
    /// First descendant of `root` matching `selector`.
    fn find_descendant(&self, root: ElementId, selector: &Selector) -> Option<ElementId>;
    /// Nearest inclusive ancestor of `el` matching `selector`.
    fn closest(&self, el: ElementId, selector: &Selector) -> Option<ElementId>;
    /// Whether `el` is `ancestor` or lies inside it.
    fn contains(&self, ancestor: ElementId, el: ElementId) -> bool;
    fn exists(&self, el: ElementId) -> bool;
    /// Resolved link target of an anchor.
    fn href(&self, el: ElementId) -> Option<String>;

    // --- Structure ---

    /// Create a detached element.
    fn create_element(&mut self, spec: &ElementSpec) -> ElementId;
    /// Append `child` to `parent`, moving it if already attached.
    fn append_child(&mut self, parent: ElementId, child: ElementId);
    /// Remove `el` and its subtree.
    fn remove_element(&mut self, el: ElementId);

    // --- Element state ---

    /// Rendered outer size of `el`.
    fn outer_size(&self, el: ElementId) -> Size;
    fn top(&self, el: ElementId) -> u32;
    fn set_top(&mut self, el: ElementId, top: u32);
    fn set_size(&mut self, el: ElementId, size: Size);
    /// Pin the element height, or release the pin with `None`.
    fn set_height_override(&mut self, el: ElementId, height: Option<u32>);
    fn set_displayed(&mut self, el: ElementId, displayed: bool);
    fn is_displayed(&self, el: ElementId) -> bool;
    fn set_visible(&mut self, el: ElementId, visible: bool);
    fn is_visible(&self, el: ElementId) -> bool;
    fn set_opacity(&mut self, el: ElementId, opacity: f64);
    fn opacity(&self, el: ElementId) -> f64;
    fn set_inner_html(&mut self, el: ElementId, html: &str);
}

/// A page shared between the host and its mounted modals.
pub type SharedPage = Rc<RefCell<dyn Page>>;

/// Collaborators a modal instance runs against.
#[derive(Clone)]
pub struct Host {
    pub page: SharedPage,
    pub loader: Rc<dyn ContentLoader>,
    pub clock: Rc<dyn FrameClock>,
}

impl Host {
    pub fn new(page: SharedPage, loader: Rc<dyn ContentLoader>, clock: Rc<dyn FrameClock>) -> Self {
        Self {
            page,
            loader,
            clock,
        }
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}

#![forbid(unsafe_code)]

//! In-memory [`Page`] with a real element tree.
//!
//! Elements have parent pointers, so selector queries, `closest`, and
//! containment behave like a document: only elements attached under the
//! body are found by lookups. Sizes are whatever the test assigns; nothing
//! is laid out. Every mutation the modal makes is appended to a write log.

use std::collections::BTreeMap;

use scrim_core::{ElementId, Selector, Size};
use scrim_modal::{ElementSpec, Page};

/// One element of a [`FakePage`].
#[derive(Debug, Clone, PartialEq)]
pub struct FakeElement {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub href: Option<String>,
    pub html: String,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
    pub size: Size,
    pub height_override: Option<u32>,
    pub top: u32,
    pub displayed: bool,
    pub visible: bool,
    pub opacity: f64,
}

impl FakeElement {
    fn from_spec(spec: &ElementSpec) -> Self {
        Self {
            tag: spec.tag.to_ascii_lowercase(),
            id: spec.id.clone(),
            classes: spec.classes.clone(),
            href: spec.href.clone(),
            html: spec.html.clone().unwrap_or_default(),
            parent: None,
            children: Vec::new(),
            size: Size::ZERO,
            height_override: None,
            top: 0,
            displayed: true,
            visible: true,
            opacity: 1.0,
        }
    }

    fn matches(&self, selector: &Selector) -> bool {
        selector.matches(&self.tag, self.id.as_deref(), &self.classes)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// A mutation recorded by [`FakePage`].
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    Created(ElementId),
    Appended { parent: ElementId, child: ElementId },
    Removed(ElementId),
    ScrollTop(u32),
    Top(ElementId, u32),
    Size(ElementId, Size),
    HeightOverride(ElementId, Option<u32>),
    Displayed(ElementId, bool),
    Visible(ElementId, bool),
    Opacity(ElementId, f64),
    InnerHtml(ElementId, String),
}

impl Write {
    /// Element the write touched, if any.
    pub fn element(&self) -> Option<ElementId> {
        match self {
            Self::ScrollTop(_) => None,
            Self::Appended { child, .. } => Some(*child),
            Self::Created(el)
            | Self::Removed(el)
            | Self::Top(el, _)
            | Self::Size(el, _)
            | Self::HeightOverride(el, _)
            | Self::Displayed(el, _)
            | Self::Visible(el, _)
            | Self::Opacity(el, _)
            | Self::InnerHtml(el, _) => Some(*el),
        }
    }
}

/// Simulated document.
#[derive(Debug, Clone)]
pub struct FakePage {
    elements: BTreeMap<ElementId, FakeElement>,
    next: u64,
    body: ElementId,
    viewport: Size,
    document: Size,
    scroll_top: u32,
    writes: Vec<Write>,
}

impl FakePage {
    /// Empty document with an 800x600 viewport and a 800x2000 document.
    pub fn new() -> Self {
        let body = ElementId::new(1);
        let mut elements = BTreeMap::new();
        let spec = ElementSpec {
            tag: "body".into(),
            ..ElementSpec::default()
        };
        elements.insert(body, FakeElement::from_spec(&spec));
        Self {
            elements,
            next: 1,
            body,
            viewport: Size::new(800, 600),
            document: Size::new(800, 2000),
            scroll_top: 0,
            writes: Vec::new(),
        }
    }

    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_document(mut self, document: Size) -> Self {
        self.document = document;
        self
    }

    /// Create an element under `parent` without logging it.
    pub fn add(&mut self, parent: ElementId, spec: ElementSpec) -> ElementId {
        let el = self.insert(&spec);
        self.attach(parent, el);
        el
    }

    /// Create an element directly under the body.
    pub fn add_to_body(&mut self, spec: ElementSpec) -> ElementId {
        self.add(self.body, spec)
    }

    pub fn element(&self, el: ElementId) -> Option<&FakeElement> {
        self.elements.get(&el)
    }

    /// Assign the rendered size of `el`.
    pub fn set_outer_size(&mut self, el: ElementId, size: Size) {
        if let Some(element) = self.elements.get_mut(&el) {
            element.size = size;
        }
    }

    /// Scroll as the user would, without logging.
    pub fn scroll_to(&mut self, top: u32) {
        self.scroll_top = top;
    }

    pub fn inner_html(&self, el: ElementId) -> &str {
        self.elements.get(&el).map_or("", |e| e.html.as_str())
    }

    pub fn children(&self, el: ElementId) -> &[ElementId] {
        self.elements.get(&el).map_or(&[][..], |e| e.children.as_slice())
    }

    pub fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.elements.get(&el)?.parent
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn writes(&self) -> &[Write] {
        &self.writes
    }

    pub fn take_writes(&mut self) -> Vec<Write> {
        std::mem::take(&mut self.writes)
    }

    /// Logged writes that touched `el`.
    pub fn writes_to(&self, el: ElementId) -> Vec<Write> {
        self.writes
            .iter()
            .filter(|w| w.element() == Some(el))
            .cloned()
            .collect()
    }

    fn insert(&mut self, spec: &ElementSpec) -> ElementId {
        self.next += 1;
        let el = ElementId::new(self.next);
        self.elements.insert(el, FakeElement::from_spec(spec));
        el
    }

    fn detach(&mut self, el: ElementId) {
        let Some(parent) = self.elements.get_mut(&el).and_then(|e| e.parent.take()) else {
            return;
        };
        if let Some(parent) = self.elements.get_mut(&parent) {
            parent.children.retain(|c| *c != el);
        }
    }

    fn attach(&mut self, parent: ElementId, child: ElementId) {
        if !self.elements.contains_key(&parent) || self.is_within(parent, child) {
            return;
        }
        self.detach(child);
        if let Some(element) = self.elements.get_mut(&child) {
            element.parent = Some(parent);
        }
        if let Some(parent) = self.elements.get_mut(&parent) {
            parent.children.push(child);
        }
    }

    fn is_within(&self, el: ElementId, ancestor: ElementId) -> bool {
        let mut current = Some(el);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.elements.get(&id).and_then(|e| e.parent);
        }
        false
    }

    fn drop_subtree(&mut self, el: ElementId) {
        if let Some(element) = self.elements.remove(&el) {
            for child in element.children {
                self.drop_subtree(child);
            }
        }
    }

    /// Attached descendants of `root` in document order, `root` excluded.
    fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(root).iter().rev().copied().collect();
        while let Some(el) = stack.pop() {
            out.push(el);
            stack.extend(self.children(el).iter().rev().copied());
        }
        out
    }

    fn log(&mut self, write: Write) {
        self.writes.push(write);
    }

    fn update(&mut self, el: ElementId, write: Write, apply: impl FnOnce(&mut FakeElement)) {
        if let Some(element) = self.elements.get_mut(&el) {
            apply(element);
            self.log(write);
        }
    }
}

impl Default for FakePage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for FakePage {
    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn document_size(&self) -> Size {
        self.document
    }

    fn scroll_top(&self) -> u32 {
        self.scroll_top
    }

    fn set_scroll_top(&mut self, top: u32) {
        self.scroll_top = top;
        self.log(Write::ScrollTop(top));
    }

    fn body(&self) -> ElementId {
        self.body
    }

    fn query(&self, selector: &Selector) -> Vec<ElementId> {
        self.descendants(self.body)
            .into_iter()
            .filter(|el| self.elements.get(el).is_some_and(|e| e.matches(selector)))
            .collect()
    }

    fn find_by_id(&self, id: &str) -> Option<ElementId> {
        self.descendants(self.body)
            .into_iter()
            .find(|el| self.elements.get(el).and_then(|e| e.id.as_deref()) == Some(id))
    }

    fn find_descendant(&self, root: ElementId, selector: &Selector) -> Option<ElementId> {
        self.descendants(root)
            .into_iter()
            .find(|el| self.elements.get(el).is_some_and(|e| e.matches(selector)))
    }

    fn closest(&self, el: ElementId, selector: &Selector) -> Option<ElementId> {
        let mut current = Some(el);
        while let Some(id) = current {
            let element = self.elements.get(&id)?;
            if element.matches(selector) {
                return Some(id);
            }
            current = element.parent;
        }
        None
    }

    fn contains(&self, ancestor: ElementId, el: ElementId) -> bool {
        self.elements.contains_key(&el) && self.is_within(el, ancestor)
    }

    fn exists(&self, el: ElementId) -> bool {
        self.elements.contains_key(&el) && self.is_within(el, self.body)
    }

    fn href(&self, el: ElementId) -> Option<String> {
        self.elements.get(&el)?.href.clone()
    }

    fn create_element(&mut self, spec: &ElementSpec) -> ElementId {
        let el = self.insert(spec);
        self.log(Write::Created(el));
        el
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if self.elements.contains_key(&child) {
            self.attach(parent, child);
            self.log(Write::Appended { parent, child });
        }
    }

    fn remove_element(&mut self, el: ElementId) {
        if el == self.body || !self.elements.contains_key(&el) {
            return;
        }
        self.detach(el);
        self.drop_subtree(el);
        self.log(Write::Removed(el));
    }

    fn outer_size(&self, el: ElementId) -> Size {
        self.elements.get(&el).map_or(Size::ZERO, |e| Size {
            height: e.height_override.unwrap_or(e.size.height),
            ..e.size
        })
    }

    fn top(&self, el: ElementId) -> u32 {
        self.elements.get(&el).map_or(0, |e| e.top)
    }

    fn set_top(&mut self, el: ElementId, top: u32) {
        self.update(el, Write::Top(el, top), |e| e.top = top);
    }

    fn set_size(&mut self, el: ElementId, size: Size) {
        self.update(el, Write::Size(el, size), |e| e.size = size);
    }

    fn set_height_override(&mut self, el: ElementId, height: Option<u32>) {
        self.update(el, Write::HeightOverride(el, height), |e| {
            e.height_override = height;
        });
    }

    fn set_displayed(&mut self, el: ElementId, displayed: bool) {
        self.update(el, Write::Displayed(el, displayed), |e| {
            e.displayed = displayed;
        });
    }

    fn is_displayed(&self, el: ElementId) -> bool {
        self.elements.get(&el).is_some_and(|e| e.displayed)
    }

    fn set_visible(&mut self, el: ElementId, visible: bool) {
        self.update(el, Write::Visible(el, visible), |e| e.visible = visible);
    }

    fn is_visible(&self, el: ElementId) -> bool {
        self.elements.get(&el).is_some_and(|e| e.visible)
    }

    fn set_opacity(&mut self, el: ElementId, opacity: f64) {
        let opacity = opacity.clamp(0.0, 1.0);
        self.update(el, Write::Opacity(el, opacity), |e| e.opacity = opacity);
    }

    fn opacity(&self, el: ElementId) -> f64 {
        self.elements.get(&el).map_or(0.0, |e| e.opacity)
    }

    fn set_inner_html(&mut self, el: ElementId, html: &str) {
        let Some(children) = self.elements.get_mut(&el).map(|e| std::mem::take(&mut e.children))
        else {
            return;
        };
        for child in children {
            self.drop_subtree(child);
        }
        self.update(el, Write::InnerHtml(el, html.to_string()), |e| {
            e.html = html.to_string();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_query_finds_attached_elements_in_order() {
        let mut page = FakePage::new();
        let a = page.add_to_body(ElementSpec::new("div", "item"));
        let inner = page.add(a, ElementSpec::new("span", "item"));
        let b = page.add_to_body(ElementSpec::new("div", "item"));
        page.create_element(&ElementSpec::new("div", "item"));

        assert_eq!(page.query(&Selector::class("item")), vec![a, inner, b]);
    }

    #[test]
    fn test_closest_and_contains_are_inclusive() {
        let mut page = FakePage::new();
        let panel = page.add_to_body(ElementSpec::new("div", "modal-box"));
        let link = page.add(panel, ElementSpec::new("a", "dismiss"));

        assert_eq!(page.closest(link, &Selector::class("modal-box")), Some(panel));
        assert_eq!(page.closest(link, &Selector::class("dismiss")), Some(link));
        assert!(page.contains(panel, link));
        assert!(page.contains(link, link));
        assert!(!page.contains(link, panel));
    }

    #[test]
    fn test_append_moves_element() {
        let mut page = FakePage::new();
        let from = page.add_to_body(ElementSpec::new("div", "from"));
        let to = page.add_to_body(ElementSpec::new("div", "to"));
        let item = page.add(from, ElementSpec::new("p", "item"));

        page.append_child(to, item);
        assert!(page.children(from).is_empty());
        assert_eq!(page.children(to), &[item]);
        assert_eq!(page.parent(item), Some(to));
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut page = FakePage::new();
        let panel = page.add_to_body(ElementSpec::new("div", "panel"));
        let child = page.add(panel, ElementSpec::new("div", "child"));

        page.remove_element(panel);
        assert!(!page.exists(panel));
        assert!(page.element(child).is_none());
        assert_eq!(page.writes(), &[Write::Removed(panel)]);
    }

    #[test]
    fn test_inner_html_replaces_children() {
        let mut page = FakePage::new();
        let body = page.add_to_body(ElementSpec::new("div", "modal-body"));
        let old = page.add(body, ElementSpec::new("p", "old"));

        page.set_inner_html(body, "<p>new</p>");
        assert!(page.element(old).is_none());
        assert_eq!(page.inner_html(body), "<p>new</p>");
    }

    #[test]
    fn test_height_override_wins_over_size() {
        let mut page = FakePage::new();
        let panel = page.add_to_body(ElementSpec::new("div", "panel"));
        page.set_outer_size(panel, Size::new(400, 300));
        page.set_height_override(panel, Some(120));
        assert_eq!(page.outer_size(panel), Size::new(400, 120));
        page.set_height_override(panel, None);
        assert_eq!(page.outer_size(panel), Size::new(400, 300));
    }

    #[test]
    fn edge_detached_elements_do_not_exist() {
        let mut page = FakePage::new();
        let loose = page.create_element(&ElementSpec::new("div", "loose"));
        assert!(!page.exists(loose));
        assert!(page.find_by_id("nothing").is_none());
        page.append_child(page.body(), loose);
        assert!(page.exists(loose));
    }

    #[test]
    fn edge_cannot_append_into_own_subtree() {
        let mut page = FakePage::new();
        let outer = page.add_to_body(ElementSpec::new("div", "outer"));
        let inner = page.add(outer, ElementSpec::new("div", "inner"));
        page.append_child(inner, outer);
        assert_eq!(page.parent(outer), Some(page.body()));
    }

    #[test]
    fn edge_writes_to_unknown_elements_are_ignored() {
        let mut page = FakePage::new();
        page.set_opacity(ElementId::new(99), 0.5);
        page.set_inner_html(ElementId::new(99), "x");
        assert!(page.writes().is_empty());
        assert_eq!(page.opacity(ElementId::new(99)), 0.0);
    }
}

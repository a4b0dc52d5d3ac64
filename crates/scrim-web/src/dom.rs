#![forbid(unsafe_code)]

//! Browser page host over `web-sys`.
//!
//! [`WebPage`] implements [`Page`] against the live document. Elements get
//! a `data-scrim-id` attribute the first time they are seen, which is how
//! [`ElementId`] handles map back to nodes. [`attach`] forwards document
//! clicks and key presses to a mounted instance.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use scrim_core::{DomEvent, ElementId, KeyCode, Selector, Size};
use scrim_modal::{ElementSpec, Host, ModalInstance, Page};
use scrim_runtime::TimeoutFrameClock;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlAnchorElement, HtmlElement, KeyboardEvent, Window};

use crate::http::HttpLoader;

const ID_ATTR: &str = "data-scrim-id";

#[derive(Default)]
struct Registry {
    next: u64,
    elements: HashMap<u64, Element>,
}

/// The current browser document.
pub struct WebPage {
    window: Window,
    document: Document,
    registry: RefCell<Registry>,
}

impl WebPage {
    /// Page for the global window, if running in a browser.
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self {
            window,
            document,
            registry: RefCell::new(Registry::default()),
        })
    }

    /// Handle for `el`, registering it on first sight.
    pub fn element_id(&self, el: &Element) -> ElementId {
        let mut registry = self.registry.borrow_mut();
        if let Some(raw) = el.get_attribute(ID_ATTR).and_then(|v| v.parse::<u64>().ok())
            && registry.elements.contains_key(&raw)
        {
            return ElementId::new(raw);
        }
        registry.next += 1;
        let raw = registry.next;
        if let Err(err) = el.set_attribute(ID_ATTR, &raw.to_string()) {
            tracing::warn!(?err, "could not tag element");
        }
        registry.elements.insert(raw, el.clone());
        ElementId::new(raw)
    }

    fn element(&self, id: ElementId) -> Option<Element> {
        self.registry.borrow().elements.get(&id.raw()).cloned()
    }

    fn html(&self, id: ElementId) -> Option<HtmlElement> {
        self.element(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn set_style(&self, id: ElementId, property: &str, value: &str) {
        if let Some(el) = self.html(id)
            && let Err(err) = el.style().set_property(property, value)
        {
            tracing::warn!(%id, property, ?err, "style write failed");
        }
    }

    fn style_value(&self, id: ElementId, property: &str) -> Option<String> {
        self.html(id)?
            .style()
            .get_property_value(property)
            .ok()
            .filter(|v| !v.is_empty())
    }

    fn collect(&self, list: web_sys::NodeList) -> Vec<ElementId> {
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|el| self.element_id(&el))
            .collect()
    }
}

fn px(value: u32) -> String {
    format!("{value}px")
}

fn js_u32(value: Result<JsValue, JsValue>) -> u32 {
    value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0).max(0.0) as u32
}

impl Page for WebPage {
    fn viewport_size(&self) -> Size {
        Size::new(
            js_u32(self.window.inner_width()),
            js_u32(self.window.inner_height()),
        )
    }

    fn document_size(&self) -> Size {
        self.document
            .document_element()
            .map(|root| Size::new(root.scroll_width().max(0) as u32, root.scroll_height().max(0) as u32))
            .unwrap_or(Size::ZERO)
    }

    fn scroll_top(&self) -> u32 {
        self.window.scroll_y().unwrap_or(0.0).max(0.0) as u32
    }

    fn set_scroll_top(&mut self, top: u32) {
        let x = self.window.scroll_x().unwrap_or(0.0);
        self.window.scroll_to_with_x_and_y(x, f64::from(top));
    }

    fn body(&self) -> ElementId {
        match self.document.body() {
            Some(body) => self.element_id(body.as_ref()),
            None => ElementId::new(0),
        }
    }

    fn query(&self, selector: &Selector) -> Vec<ElementId> {
        match self.document.query_selector_all(selector.as_str()) {
            Ok(list) => self.collect(list),
            Err(err) => {
                tracing::warn!(%selector, ?err, "query failed");
                Vec::new()
            }
        }
    }

    fn find_by_id(&self, id: &str) -> Option<ElementId> {
        let el = self.document.get_element_by_id(id)?;
        Some(self.element_id(&el))
    }

    fn find_descendant(&self, root: ElementId, selector: &Selector) -> Option<ElementId> {
        let el = self.element(root)?.query_selector(selector.as_str()).ok().flatten()?;
        Some(self.element_id(&el))
    }

    fn closest(&self, el: ElementId, selector: &Selector) -> Option<ElementId> {
        let found = self.element(el)?.closest(selector.as_str()).ok().flatten()?;
        Some(self.element_id(&found))
    }

    fn contains(&self, ancestor: ElementId, el: ElementId) -> bool {
        match (self.element(ancestor), self.element(el)) {
            (Some(ancestor), Some(el)) => ancestor.contains(Some(el.as_ref())),
            _ => false,
        }
    }

    fn exists(&self, el: ElementId) -> bool {
        self.element(el).is_some_and(|el| el.is_connected())
    }

    fn href(&self, el: ElementId) -> Option<String> {
        let el = self.element(el)?;
        match el.dyn_ref::<HtmlAnchorElement>() {
            Some(anchor) => Some(anchor.href()),
            None => el.get_attribute("href"),
        }
    }

    fn create_element(&mut self, spec: &ElementSpec) -> ElementId {
        let el = match self.document.create_element(&spec.tag) {
            Ok(el) => el,
            Err(err) => {
                tracing::warn!(tag = %spec.tag, ?err, "element creation failed");
                return ElementId::new(0);
            }
        };
        if let Some(id) = &spec.id {
            el.set_id(id);
        }
        if !spec.classes.is_empty() {
            el.set_class_name(&spec.classes.join(" "));
        }
        if let Some(href) = &spec.href
            && let Err(err) = el.set_attribute("href", href)
        {
            tracing::warn!(?err, "href write failed");
        }
        if let Some(html) = &spec.html {
            el.set_inner_html(html);
        }
        self.element_id(&el)
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if let (Some(parent), Some(child)) = (self.element(parent), self.element(child))
            && let Err(err) = parent.append_child(&child)
        {
            tracing::warn!(?err, "append failed");
        }
    }

    fn remove_element(&mut self, el: ElementId) {
        if let Some(node) = self.registry.borrow_mut().elements.remove(&el.raw()) {
            node.remove();
        }
    }

    fn outer_size(&self, el: ElementId) -> Size {
        self.html(el)
            .map(|el| Size::new(el.offset_width().max(0) as u32, el.offset_height().max(0) as u32))
            .unwrap_or(Size::ZERO)
    }

    fn top(&self, el: ElementId) -> u32 {
        self.html(el).map_or(0, |el| el.offset_top().max(0) as u32)
    }

    fn set_top(&mut self, el: ElementId, top: u32) {
        self.set_style(el, "top", &px(top));
    }

    fn set_size(&mut self, el: ElementId, size: Size) {
        self.set_style(el, "width", &px(size.width));
        self.set_style(el, "height", &px(size.height));
    }

    fn set_height_override(&mut self, el: ElementId, height: Option<u32>) {
        match height {
            Some(height) => self.set_style(el, "height", &px(height)),
            None => {
                if let Some(el) = self.html(el) {
                    let _ = el.style().remove_property("height");
                }
            }
        }
    }

    fn set_displayed(&mut self, el: ElementId, displayed: bool) {
        self.set_style(el, "display", if displayed { "block" } else { "none" });
    }

    fn is_displayed(&self, el: ElementId) -> bool {
        self.style_value(el, "display").as_deref() != Some("none")
    }

    fn set_visible(&mut self, el: ElementId, visible: bool) {
        self.set_style(el, "visibility", if visible { "visible" } else { "hidden" });
    }

    fn is_visible(&self, el: ElementId) -> bool {
        self.style_value(el, "visibility").as_deref() != Some("hidden")
    }

    fn set_opacity(&mut self, el: ElementId, opacity: f64) {
        self.set_style(el, "opacity", &format!("{:.3}", opacity.clamp(0.0, 1.0)));
    }

    fn opacity(&self, el: ElementId) -> f64 {
        self.style_value(el, "opacity")
            .and_then(|v| v.parse().ok())
            .unwrap_or(1.0)
    }

    fn set_inner_html(&mut self, el: ElementId, html: &str) {
        if let Some(el) = self.element(el) {
            el.set_inner_html(html);
        }
    }
}

/// Host for the current document: HTTP loads resolved against the page
/// location, timeout-driven animation frames.
pub fn browser_host(page: &Rc<RefCell<WebPage>>) -> Host {
    let loader = {
        let page = page.borrow();
        let base = page
            .window
            .location()
            .href()
            .ok()
            .and_then(|href| reqwest::Url::parse(&href).ok());
        match base {
            Some(base) => HttpLoader::new().with_base(base),
            None => HttpLoader::new(),
        }
    };
    let shared: Rc<RefCell<dyn Page>> = page.clone();
    Host::new(shared, Rc::new(loader), Rc::new(TimeoutFrameClock))
}

/// A document listener removed on drop.
struct DocumentListener {
    document: Document,
    event_name: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl DocumentListener {
    fn new(
        document: Document,
        event_name: &'static str,
        callback: impl FnMut(web_sys::Event) + 'static,
    ) -> Self {
        let callback: Closure<dyn FnMut(web_sys::Event)> = Closure::wrap(Box::new(callback));
        if let Err(err) =
            document.add_event_listener_with_callback(event_name, callback.as_ref().unchecked_ref())
        {
            tracing::warn!(event_name, ?err, "listener registration failed");
        }
        Self {
            document,
            event_name,
            callback,
        }
    }
}

impl Drop for DocumentListener {
    fn drop(&mut self) {
        let _ = self.document.remove_event_listener_with_callback(
            self.event_name,
            self.callback.as_ref().unchecked_ref(),
        );
    }
}

/// Document listeners feeding one instance. Dropping it detaches them.
pub struct EventBinding {
    _listeners: [DocumentListener; 2],
}

/// Forward document clicks and key presses to `instance`.
pub fn attach(page: &Rc<RefCell<WebPage>>, instance: &ModalInstance) -> EventBinding {
    let document = page.borrow().document.clone();

    let click = {
        let page = Rc::clone(page);
        let instance = instance.clone();
        DocumentListener::new(document.clone(), "click", move |event| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let mut dom_event = DomEvent::click(page.borrow().element_id(&target));
            if let Some(anchor) = target.closest("a[href]").ok().flatten()
                && let Some(href) = anchor.dyn_ref::<HtmlAnchorElement>().map(|a| a.href())
            {
                dom_event = dom_event.with_href(href);
            }
            forward(&instance, &event, dom_event);
        })
    };

    let key = {
        let instance = instance.clone();
        DocumentListener::new(document, "keydown", move |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let dom_event = DomEvent::key_down(KeyCode::from_key(&key.key()));
            forward(&instance, &event, dom_event);
        })
    };

    EventBinding {
        _listeners: [click, key],
    }
}

fn forward(instance: &ModalInstance, native: &web_sys::Event, mut event: DomEvent) {
    let Some(transition) = instance.dispatch(&mut event) else {
        return;
    };
    if event.default_prevented() {
        native.prevent_default();
    }
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = transition.await {
            tracing::warn!(error = %err, "modal transition failed");
        }
    });
}

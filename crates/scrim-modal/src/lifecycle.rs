#![forbid(unsafe_code)]

//! Modal lifecycle state machine.
//!
//! ```text
//!            open                       close
//!  Closed ─────────► Opening ─► Open ─────────► Closing ─► Closed
//!                                │ ▲
//!              open_inside/page  ▼ │
//!                           OpeningInside
//! ```
//!
//! # Ordering
//!
//! Every transition runs inside the instance's [`TransitionGate`], so at
//! most one of them writes visible state at a time and queued requests run
//! in arrival order. A close also bumps the instance [`Generation`] the
//! moment it is requested: an open (or content swap) that is still waiting
//! on a hook, a fetch, or a fade sees its tag go stale at the next
//! suspension point and stops writing.
//!
//! # Invariants
//!
//! - `saved_scroll_top` is written only while placing the panel during an
//!   open or content swap, and read only by the close that follows.
//! - The Escape binding exists exactly between a successful open step and
//!   the matching close.
//! - A failed load leaves the visible state as it was before the request.
//! - Redundant requests (open while open, close while closed) are
//!   [`Transition::NoOp`] and fire no hooks.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::LocalBoxFuture;
use scrim_core::DomEvent;
use scrim_runtime::{Generation, GenerationTag, TransitionGate};
use tracing::Instrument;

use crate::bridge::{Listener, ListenerSet, ModalAction};
use crate::config::{ContentSource, InnerSwapBackdrop, ModalConfig};
use crate::elements::ModalElements;
use crate::error::{ModalError, Result};
use crate::hooks::{HookContext, HookPoint, HookSet};
use crate::loader::{CacheBuster, Content, extract_body};
use crate::page::{Host, Page};
use crate::pager::PagerState;
use crate::sequencer::Sequencer;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a mounted instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    fn next() -> Self {
        Self(NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "modal-{}", self.0)
    }
}

/// Lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModalPhase {
    #[default]
    Closed,
    Opening,
    Open,
    /// New content is being swapped into the open panel.
    OpeningInside,
    Closing,
}

/// How a transition request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Ran to its terminal hook.
    Completed,
    /// Redundant for the current phase; nothing changed.
    NoOp,
    /// A start hook rejected its token; nothing changed.
    Cancelled,
    /// A later request took over before this one finished.
    Superseded,
}

/// Mount-time inputs of a modal instance.
#[derive(Debug, Clone, Default)]
pub struct ModalProps {
    pub config: ModalConfig,
    pub hooks: HookSet,
}

impl ModalProps {
    pub fn new(config: ModalConfig) -> Self {
        Self {
            config,
            hooks: HookSet::new(),
        }
    }

    pub fn hooks(mut self, hooks: HookSet) -> Self {
        self.hooks = hooks;
        self
    }
}

impl From<ModalConfig> for ModalProps {
    fn from(config: ModalConfig) -> Self {
        Self::new(config)
    }
}

/// A mountable page component.
pub trait Component: Sized {
    type Props;

    /// Build the component on the host page.
    fn mount(host: Host, props: Self::Props) -> impl Future<Output = Result<Self>>;

    /// Release everything the component registered or created.
    fn unmount(&self);

    /// Map a DOM event to an action, suppressing its default if consumed.
    fn handle_event(&self, event: &mut DomEvent) -> Option<ModalAction>;
}

/// One mounted modal.
///
/// Cloning yields another handle to the same instance.
#[derive(Clone)]
pub struct ModalInstance {
    shared: Rc<Shared>,
}

struct Shared {
    id: InstanceId,
    config: ModalConfig,
    hooks: HookSet,
    host: Host,
    elements: ModalElements,
    state: RefCell<InstanceState>,
    listeners: RefCell<ListenerSet>,
    generation: Generation,
    gate: TransitionGate,
    cache_buster: CacheBuster,
    pending_opens: Cell<usize>,
}

#[derive(Debug, Default)]
struct InstanceState {
    phase: ModalPhase,
    saved_scroll_top: u32,
    unmounted: bool,
    pager: Option<PagerState>,
}

/// Counts an open request from arrival until it finishes.
struct PendingOpen<'a>(&'a Cell<usize>);

impl<'a> PendingOpen<'a> {
    fn new(counter: &'a Cell<usize>) -> Self {
        counter.set(counter.get() + 1);
        Self(counter)
    }
}

impl Drop for PendingOpen<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

#[derive(Debug, Clone, Copy)]
enum PageStep {
    To(usize),
    Prev,
    Next,
}

impl ModalInstance {
    /// Validate `props`, build the panel structure, register listeners and
    /// fire the init/render hooks.
    pub async fn mount(host: Host, props: ModalProps) -> Result<Self> {
        let ModalProps { config, hooks } = props;
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ModalError::InvalidConfig(errors.join("; ")));
        }

        let id = InstanceId::next();
        let span = tracing::debug_span!("modal.mount", instance = %id);
        let instance = span.in_scope(|| -> Result<Self> {
            let elements = ModalElements::build(&mut *host.page.borrow_mut(), &config)?;

            let mut listeners = ListenerSet::new();
            listeners.bind(Listener::DismissClick {
                scope: elements.panel,
                selector: config.dismiss_selector.clone(),
            });
            if let Some(controls) = elements.pager {
                listeners.bind(Listener::PagerClick(controls));
            }
            if let Some(selector) = &config.inner_link_selector {
                listeners.bind(Listener::InnerLinkClick(selector.clone()));
            }
            if let Some(backdrop) = elements.backdrop {
                listeners.bind(Listener::BackdropClick(backdrop));
            }
            if let Some(selector) = &config.open_trigger_selector {
                listeners.bind(Listener::OpenTriggerClick(selector.clone()));
            }

            let pager = config.pager.as_ref().map(PagerState::new);
            if let (Some(controls), Some(state)) = (elements.pager, &pager) {
                controls.sync(&mut *host.page.borrow_mut(), state);
            }
            tracing::debug!(
                panel = %elements.panel,
                backdrop = ?elements.backdrop,
                listeners = listeners.len(),
                "mounted"
            );

            Ok(Self {
                shared: Rc::new(Shared {
                    id,
                    config,
                    hooks,
                    host,
                    elements,
                    state: RefCell::new(InstanceState {
                        pager,
                        ..InstanceState::default()
                    }),
                    listeners: RefCell::new(listeners),
                    generation: Generation::new(),
                    gate: TransitionGate::new(),
                    cache_buster: CacheBuster::new(),
                    pending_opens: Cell::new(0),
                }),
            })
        })?;

        async {
            instance.shared.fire(HookPoint::InitComplete, None).await;
            instance.shared.fire(HookPoint::RenderComplete, None).await;
        }
        .instrument(span)
        .await;
        Ok(instance)
    }

    pub fn id(&self) -> InstanceId {
        self.shared.id
    }

    pub fn phase(&self) -> ModalPhase {
        self.shared.phase()
    }

    /// Whether the panel is settled open.
    pub fn is_open(&self) -> bool {
        self.phase() == ModalPhase::Open
    }

    /// Scroll offset captured by the last open or content swap.
    pub fn saved_scroll_top(&self) -> u32 {
        self.shared.state.borrow().saved_scroll_top
    }

    pub fn config(&self) -> &ModalConfig {
        &self.shared.config
    }

    pub fn elements(&self) -> &ModalElements {
        &self.shared.elements
    }

    /// Whether the Escape key currently closes this instance.
    pub fn escape_bound(&self) -> bool {
        self.shared.listeners.borrow().is_bound(&Listener::EscapeKey)
    }

    /// Snapshot of the registered listeners.
    pub fn listeners(&self) -> Vec<Listener> {
        self.shared.listeners.borrow().iter().cloned().collect()
    }

    /// Current pager page, if a pager is configured.
    pub fn page_index(&self) -> Option<usize> {
        self.shared.state.borrow().pager.as_ref().map(PagerState::index)
    }

    pub fn is_unmounted(&self) -> bool {
        self.shared.state.borrow().unmounted
    }

    /// Open with the configured content source.
    pub async fn open(&self) -> Result<Transition> {
        self.open_with(None).await
    }

    /// Open with remote content from `url` instead of the configured source.
    pub async fn open_url(&self, url: impl Into<String>) -> Result<Transition> {
        self.open_with(Some(ContentSource::ByUrl(url.into()))).await
    }

    /// Open, optionally overriding the configured content source.
    pub async fn open_with(&self, source: Option<ContentSource>) -> Result<Transition> {
        let shared = &*self.shared;
        shared.ensure_mounted()?;
        let _pending = PendingOpen::new(&shared.pending_opens);
        let span = tracing::debug_span!(
            "modal.open",
            instance = %shared.id,
            generation = tracing::field::Empty
        );
        async move {
            let _pass = shared.gate.enter().await;
            shared.ensure_mounted()?;
            let phase = shared.phase();
            if phase != ModalPhase::Closed {
                tracing::debug!(?phase, "open ignored");
                return Ok(Transition::NoOp);
            }
            let tag = shared.generation.tag();
            tracing::Span::current().record("generation", tag.get());
            shared.open_locked(tag, source).await
        }
        .instrument(span)
        .await
    }

    /// Close the panel.
    ///
    /// The close-start hook runs first. Once it resolves, any open or
    /// content swap that has not finished is superseded and the close runs
    /// after it leaves the gate. A cancelled hook leaves an in-flight
    /// transition untouched.
    pub async fn close(&self) -> Result<Transition> {
        let shared = &*self.shared;
        shared.ensure_mounted()?;
        let phase = shared.phase();
        if matches!(phase, ModalPhase::Closed | ModalPhase::Closing)
            && shared.pending_opens.get() == 0
        {
            tracing::debug!(instance = %shared.id, ?phase, "close ignored");
            return Ok(Transition::NoOp);
        }
        let span = tracing::debug_span!(
            "modal.close",
            instance = %shared.id,
            generation = tracing::field::Empty
        );
        async move {
            // A settled panel is claimed while the hook runs so no other
            // transition starts on it.
            let settled = phase == ModalPhase::Open && !shared.gate.is_busy();
            if settled {
                shared.set_phase(ModalPhase::Closing);
            }
            if !shared.gate_on(HookPoint::CloseStart, None).await {
                if settled && shared.phase() == ModalPhase::Closing {
                    shared.set_phase(ModalPhase::Open);
                }
                return Ok(Transition::Cancelled);
            }

            let tag = shared.generation.bump();
            tracing::Span::current().record("generation", tag.get());
            let _pass = shared.gate.enter().await;
            shared.ensure_mounted()?;
            if !matches!(shared.phase(), ModalPhase::Open | ModalPhase::Closing) {
                tracing::debug!("nothing left to close");
                return Ok(Transition::NoOp);
            }
            shared.close_locked().await
        }
        .instrument(span)
        .await
    }

    /// Close in response to `event`, suppressing its default action once.
    pub fn close_from(&self, event: &mut DomEvent) -> impl Future<Output = Result<Transition>> + use<> {
        event.prevent_default();
        let this = self.clone();
        async move { this.close().await }
    }

    /// Load `url` into the open panel without closing it.
    pub async fn open_inside(&self, url: impl Into<String>) -> Result<Transition> {
        let url = url.into();
        let shared = &*self.shared;
        shared.ensure_mounted()?;
        let span = tracing::debug_span!(
            "modal.open_inside",
            instance = %shared.id,
            url = %url,
            generation = tracing::field::Empty
        );
        async move {
            let _pass = shared.gate.enter().await;
            shared.ensure_mounted()?;
            let phase = shared.phase();
            if phase != ModalPhase::Open {
                tracing::debug!(?phase, "open_inside ignored");
                return Ok(Transition::NoOp);
            }
            let tag = shared.generation.tag();
            tracing::Span::current().record("generation", tag.get());
            shared
                .swap(
                    tag,
                    url,
                    (HookPoint::OpenInsideStart, HookPoint::OpenInsideComplete),
                    None,
                )
                .await
        }
        .instrument(span)
        .await
    }

    /// Load the link target of `event` into the open panel, suppressing the
    /// event default once.
    pub fn open_inside_from(
        &self,
        event: &mut DomEvent,
    ) -> impl Future<Output = Result<Transition>> + use<> {
        event.prevent_default();
        let url = event.href().map(str::to_string);
        let this = self.clone();
        async move {
            match url {
                Some(url) => this.open_inside(url).await,
                None => Ok(Transition::NoOp),
            }
        }
    }

    /// Show pager page `index` (clamped into range).
    pub async fn page_to(&self, index: usize) -> Result<Transition> {
        self.page(PageStep::To(index)).await
    }

    pub async fn page_next(&self) -> Result<Transition> {
        self.page(PageStep::Next).await
    }

    pub async fn page_prev(&self) -> Result<Transition> {
        self.page(PageStep::Prev).await
    }

    async fn page(&self, step: PageStep) -> Result<Transition> {
        let shared = &*self.shared;
        shared.ensure_mounted()?;
        if shared.state.borrow().pager.is_none() {
            return Err(ModalError::InvalidConfig("instance has no pager".into()));
        }
        let span = tracing::debug_span!(
            "modal.page",
            instance = %shared.id,
            step = ?step,
            generation = tracing::field::Empty
        );
        async move {
            let _pass = shared.gate.enter().await;
            shared.ensure_mounted()?;
            let phase = shared.phase();
            if phase != ModalPhase::Open {
                tracing::debug!(?phase, "paging ignored");
                return Ok(Transition::NoOp);
            }
            let target = {
                let state = shared.state.borrow();
                state.pager.as_ref().and_then(|pager| {
                    let index = match step {
                        PageStep::To(index) => pager.clamp(index),
                        PageStep::Prev => pager.prev_index(),
                        PageStep::Next => pager.next_index(),
                    };
                    (index != pager.index())
                        .then(|| pager.url_at(index).map(|url| (index, url.to_string())))
                        .flatten()
                })
            };
            let Some((index, url)) = target else {
                tracing::debug!("already on that page");
                return Ok(Transition::NoOp);
            };
            let tag = shared.generation.tag();
            tracing::Span::current().record("generation", tag.get());
            shared
                .swap(
                    tag,
                    url,
                    (HookPoint::PagingStart, HookPoint::PagingComplete),
                    Some(index),
                )
                .await
        }
        .instrument(span)
        .await
    }

    /// Run the transition an action asks for.
    pub fn perform(&self, action: ModalAction) -> LocalBoxFuture<'static, Result<Transition>> {
        let this = self.clone();
        Box::pin(async move {
            match action {
                ModalAction::Open => this.open().await,
                ModalAction::Close | ModalAction::EscapePressed | ModalAction::BackdropClicked => {
                    this.close().await
                }
                ModalAction::OpenInside(url) => this.open_inside(url).await,
                ModalAction::PagePrev => this.page_prev().await,
                ModalAction::PageNext => this.page_next().await,
            }
        })
    }

    /// Map `event` and start the transition it asks for.
    ///
    /// The default action is suppressed synchronously; the returned future
    /// drives the transition and must be spawned or awaited by the host.
    /// The host must not hold a borrow of the page while dispatching.
    pub fn dispatch(
        &self,
        event: &mut DomEvent,
    ) -> Option<LocalBoxFuture<'static, Result<Transition>>> {
        let action = self.handle_event(event)?;
        tracing::debug!(instance = %self.shared.id, ?action, "event mapped");
        Some(self.perform(action))
    }

    /// Map `event` to an action without running it.
    pub fn handle_event(&self, event: &mut DomEvent) -> Option<ModalAction> {
        let shared = &*self.shared;
        if shared.state.borrow().unmounted {
            return None;
        }
        let phase = shared.phase();
        let page = shared.host.page.borrow();
        shared.listeners.borrow().classify(&*page, phase, event)
    }

    /// Remove created elements, drop every listener, and make the instance
    /// unusable. In-flight transitions stop at their next suspension point.
    pub fn unmount(&self) {
        let shared = &*self.shared;
        let previous = {
            let mut state = shared.state.borrow_mut();
            if state.unmounted {
                return;
            }
            state.unmounted = true;
            std::mem::replace(&mut state.phase, ModalPhase::Closed)
        };
        shared.generation.bump();
        shared.listeners.borrow_mut().clear();

        let mut page = shared.host.page.borrow_mut();
        shared.elements.teardown(&mut *page);
        if let Some(backdrop) = shared.elements.backdrop
            && shared.elements.is_backdrop_shared()
            && previous != ModalPhase::Closed
        {
            page.set_opacity(backdrop, 0.0);
            page.set_displayed(backdrop, false);
        }
        tracing::debug!(instance = %shared.id, ?previous, "unmounted");
    }
}

impl Component for ModalInstance {
    type Props = ModalProps;

    fn mount(host: Host, props: ModalProps) -> impl Future<Output = Result<Self>> {
        ModalInstance::mount(host, props)
    }

    fn unmount(&self) {
        ModalInstance::unmount(self);
    }

    fn handle_event(&self, event: &mut DomEvent) -> Option<ModalAction> {
        ModalInstance::handle_event(self, event)
    }
}

impl fmt::Debug for ModalInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("ModalInstance")
            .field("id", &self.shared.id)
            .field("phase", &state.phase)
            .field("saved_scroll_top", &state.saved_scroll_top)
            .field("unmounted", &state.unmounted)
            .finish()
    }
}

impl Shared {
    fn phase(&self) -> ModalPhase {
        self.state.borrow().phase
    }

    fn set_phase(&self, phase: ModalPhase) {
        let previous = std::mem::replace(&mut self.state.borrow_mut().phase, phase);
        if previous != phase {
            tracing::trace!(?previous, ?phase, "phase");
        }
    }

    fn ensure_mounted(&self) -> Result<()> {
        if self.state.borrow().unmounted {
            Err(ModalError::Unmounted)
        } else {
            Ok(())
        }
    }

    fn is_current(&self, tag: GenerationTag) -> bool {
        self.generation.is_current(tag)
    }

    fn sequencer(&self) -> Sequencer<'_> {
        Sequencer::new(
            &self.host.page,
            &*self.host.clock,
            &self.config,
            &self.elements,
        )
    }

    fn context(&self, point: HookPoint, target: Option<String>) -> HookContext {
        HookContext {
            instance: self.id,
            point,
            phase: self.phase(),
            target,
        }
    }

    /// Fire a start hook. `false` means its token was cancelled.
    async fn gate_on(&self, point: HookPoint, target: Option<String>) -> bool {
        let ctx = self.context(point, target);
        match self.hooks.run(&ctx).await {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(%point, "hook token cancelled; transition abandoned");
                false
            }
        }
    }

    /// Fire a completion hook; a cancelled token changes nothing.
    async fn fire(&self, point: HookPoint, target: Option<String>) {
        let ctx = self.context(point, target);
        if self.hooks.run(&ctx).await.is_err() {
            tracing::debug!(%point, "completion hook token cancelled");
        }
    }

    /// URL an open will load from, if remote.
    fn open_target(&self, source: Option<&ContentSource>) -> Option<String> {
        match source {
            Some(ContentSource::ByUrl(url)) => Some(url.clone()),
            Some(_) => None,
            None => {
                let state = self.state.borrow();
                match (&state.pager, &self.config.content_source) {
                    (Some(pager), _) => pager.current_url().map(str::to_string),
                    (None, Some(ContentSource::ByUrl(url))) => Some(url.clone()),
                    _ => None,
                }
            }
        }
    }

    async fn resolve_content(&self, source: Option<&ContentSource>) -> Result<Content> {
        if let Some(url) = self.open_target(source) {
            return self.fetch(&url).await;
        }
        let page = self.host.page.borrow();
        match source {
            // Configured inline or adopted content already sits in the body.
            None => Ok(Content::Present),
            Some(ContentSource::Inline(selector)) => page
                .query(selector)
                .first()
                .map(|el| Content::Element(*el))
                .ok_or_else(|| ModalError::InvalidConfig(format!("no element matches {selector}"))),
            Some(ContentSource::ById(id)) => match page.find_by_id(id) {
                Some(el) if el == self.elements.panel => Ok(Content::Present),
                Some(el) => Ok(Content::Element(el)),
                None => Err(ModalError::InvalidConfig(format!("no element with id {id:?}"))),
            },
            Some(ContentSource::ByUrl(_)) => Ok(Content::Present),
        }
    }

    async fn fetch(&self, url: &str) -> Result<Content> {
        let request = self.cache_buster.request(url, self.config.cache);
        tracing::debug!(url = %request.effective_url, cache = request.cache, "fetching content");
        let raw = self.host.loader.fetch(request).await?;
        Ok(Content::Fragment(extract_body(&raw).to_string()))
    }

    fn inject(&self, page: &mut dyn Page, content: Content) {
        let body = self.elements.body;
        match content {
            Content::Present => {}
            Content::Fragment(html) => page.set_inner_html(body, &html),
            Content::Element(el) => {
                page.set_inner_html(body, "");
                page.append_child(body, el);
            }
        }
    }

    fn sync_pager_controls(&self, page: &mut dyn Page) {
        if let (Some(controls), Some(pager)) = (self.elements.pager, &self.state.borrow().pager) {
            controls.sync(page, pager);
        }
    }

    async fn open_locked(&self, tag: GenerationTag, source: Option<ContentSource>) -> Result<Transition> {
        self.set_phase(ModalPhase::Opening);
        let target = self.open_target(source.as_ref());

        if !self.gate_on(HookPoint::OpenStart, target.clone()).await {
            self.set_phase(ModalPhase::Closed);
            return Ok(Transition::Cancelled);
        }
        if !self.is_current(tag) {
            tracing::debug!("superseded before loading");
            self.set_phase(ModalPhase::Closed);
            return Ok(Transition::Superseded);
        }

        self.listeners.borrow_mut().bind(Listener::EscapeKey);
        let content = match self.resolve_content(source.as_ref()).await {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(error = %err, "open aborted");
                self.listeners.borrow_mut().unbind(&Listener::EscapeKey);
                self.set_phase(ModalPhase::Closed);
                return Err(err);
            }
        };
        if !self.is_current(tag) {
            tracing::debug!("stale content discarded");
            self.listeners.borrow_mut().unbind(&Listener::EscapeKey);
            self.set_phase(ModalPhase::Closed);
            return Ok(Transition::Superseded);
        }

        let sequencer = self.sequencer().guarded(&self.generation, tag);
        {
            let mut page = self.host.page.borrow_mut();
            self.inject(&mut *page, content);
            self.sync_pager_controls(&mut *page);
        }
        let previous = self.state.borrow().saved_scroll_top;
        let placement = sequencer.place_panel(previous);
        self.state.borrow_mut().saved_scroll_top = placement.saved_scroll_top;

        let mut progress = sequencer.show_panel(placement.top, false).await;
        if progress.is_finished() {
            progress = sequencer.show_backdrop().await;
        }
        self.set_phase(ModalPhase::Open);
        if !progress.is_finished() {
            return Ok(Transition::Superseded);
        }

        tracing::debug!(top = placement.top, "opened");
        self.fire(HookPoint::OpenComplete, target).await;
        Ok(Transition::Completed)
    }

    async fn close_locked(&self) -> Result<Transition> {
        self.set_phase(ModalPhase::Closing);
        self.listeners.borrow_mut().unbind(&Listener::EscapeKey);
        let sequencer = self.sequencer();
        sequencer.hide_panel();
        if self.config.resume_scroll_position {
            let saved = self.state.borrow().saved_scroll_top;
            self.host.page.borrow_mut().set_scroll_top(saved);
            tracing::debug!(scroll_top = saved, "scroll restored");
        }
        sequencer.hide_backdrop().await;
        self.set_phase(ModalPhase::Closed);

        tracing::debug!("closed");
        self.fire(HookPoint::CloseComplete, None).await;
        Ok(Transition::Completed)
    }

    /// Swap remote content into the open panel.
    async fn swap(
        &self,
        tag: GenerationTag,
        url: String,
        (start, complete): (HookPoint, HookPoint),
        page_index: Option<usize>,
    ) -> Result<Transition> {
        self.set_phase(ModalPhase::OpeningInside);

        if !self.gate_on(start, Some(url.clone())).await {
            self.set_phase(ModalPhase::Open);
            return Ok(Transition::Cancelled);
        }
        if !self.is_current(tag) {
            self.set_phase(ModalPhase::Open);
            return Ok(Transition::Superseded);
        }
        let content = match self.fetch(&url).await {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(error = %err, "content swap aborted; keeping current content");
                self.set_phase(ModalPhase::Open);
                return Err(err);
            }
        };
        if !self.is_current(tag) {
            tracing::debug!("stale content discarded");
            self.set_phase(ModalPhase::Open);
            return Ok(Transition::Superseded);
        }

        {
            let mut page = self.host.page.borrow_mut();
            let panel = self.elements.panel;
            let height = page.outer_size(panel).height;
            page.set_height_override(panel, Some(height));
            page.set_visible(self.elements.body, false);
            self.inject(&mut *page, content);
            if let Some(index) = page_index {
                if let Some(pager) = self.state.borrow_mut().pager.as_mut() {
                    pager.set_index(index);
                }
                self.sync_pager_controls(&mut *page);
            }
        }

        // Geometry is measured against the frozen height; the pin comes off
        // once the panel and backdrop have been placed.
        let sequencer = self.sequencer().guarded(&self.generation, tag);
        let previous = self.state.borrow().saved_scroll_top;
        let placement = sequencer.place_panel(previous);
        self.state.borrow_mut().saved_scroll_top = placement.saved_scroll_top;

        let mut progress = match self.config.inner_swap_backdrop {
            InnerSwapBackdrop::Resize => {
                sequencer.resize_backdrop();
                crate::sequencer::Progress::Finished
            }
            InnerSwapBackdrop::Refade => sequencer.refade_backdrop().await,
        };
        self.host
            .page
            .borrow_mut()
            .set_height_override(self.elements.panel, None);
        if progress.is_finished() {
            progress = sequencer.show_panel(placement.top, true).await;
        }
        if self.config.resume_scroll_position {
            self.host
                .page
                .borrow_mut()
                .set_scroll_top(placement.saved_scroll_top);
        }
        self.set_phase(ModalPhase::Open);
        if !progress.is_finished() {
            return Ok(Transition::Superseded);
        }

        tracing::debug!(%url, top = placement.top, "content swapped");
        self.fire(complete, Some(url)).await;
        Ok(Transition::Completed)
    }
}

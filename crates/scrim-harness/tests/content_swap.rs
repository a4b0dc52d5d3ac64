#![forbid(unsafe_code)]

//! Swapping content inside an open panel: inner links and the pager.
//!
//! ```sh
//! cargo test -p scrim-harness --test content_swap
//! ```

use std::time::Duration;

use pretty_assertions::assert_eq;
use scrim_core::{DomEvent, Size};
use scrim_harness::{HookRecorder, TestHost, Write, logging};
use scrim_modal::{
    ContentSource, HookPoint, HookSet, InnerSwapBackdrop, ModalAction, ModalConfig, ModalError,
    ModalInstance, ModalPhase, ModalProps, Page, PagerConfig, Transition,
};
use scrim_runtime::signal;

fn url_config() -> ModalConfig {
    ModalConfig::with_source(ContentSource::ByUrl("/a.html".into()))
}

fn host() -> TestHost {
    logging::init();
    let host = TestHost::new();
    host.loader.respond("/a.html", "<body>A</body>");
    host.loader.respond("/b.html", "<body>B</body>");
    host
}

fn pager_config() -> ModalConfig {
    ModalConfig::new().pager(PagerConfig::new(["/p1.html", "/p2.html", "/p3.html"]))
}

fn pager_host() -> TestHost {
    logging::init();
    let host = TestHost::new();
    for (url, text) in [("/p1.html", "one"), ("/p2.html", "two"), ("/p3.html", "three")] {
        host.loader.respond(url, format!("<body>{text}</body>"));
    }
    host
}

async fn open_at(host: &TestHost, config: ModalConfig, panel: Size) -> ModalInstance {
    let modal = host.mount_config(config).await.unwrap();
    host.page
        .borrow_mut()
        .set_outer_size(modal.elements().panel, panel);
    modal.open().await.unwrap();
    modal
}

fn displayed(host: &TestHost, el: scrim_core::ElementId) -> bool {
    host.page.borrow().is_displayed(el)
}

// ===========================================================================
// open_inside
// ===========================================================================

#[tokio::test(start_paused = true)]
async fn test_open_inside_swaps_and_slides_panel() {
    let host = host();
    let recorder = HookRecorder::new();
    let modal = host
        .mount(ModalProps::new(url_config()).hooks(recorder.hook_set()))
        .await
        .unwrap();
    let elements = modal.elements().clone();
    host.page
        .borrow_mut()
        .set_outer_size(elements.panel, Size::new(400, 300));
    modal.open().await.unwrap();
    assert_eq!(host.page.borrow().top(elements.panel), 150);

    host.page.borrow_mut().scroll_to(200);
    host.page.borrow_mut().take_writes();
    recorder.clear();

    assert_eq!(modal.open_inside("/b.html").await.unwrap(), Transition::Completed);

    let page = host.page.borrow();
    assert_eq!(page.inner_html(elements.body), "B");
    assert_eq!(page.top(elements.panel), 350);
    assert!(page.is_visible(elements.body));
    let slides = page
        .writes_to(elements.panel)
        .into_iter()
        .filter(|w| matches!(w, Write::Top(..)))
        .count();
    assert!(slides > 2, "expected an animated slide, got {slides} top writes");
    assert_eq!(modal.phase(), ModalPhase::Open);
    assert_eq!(
        recorder.points(),
        vec![HookPoint::OpenInsideStart, HookPoint::OpenInsideComplete]
    );
    assert_eq!(recorder.calls()[1].target.as_deref(), Some("/b.html"));
}

#[tokio::test(start_paused = true)]
async fn test_swap_keeps_height_pinned_until_placed() {
    let host = host();
    let modal = open_at(&host, url_config(), Size::new(400, 300)).await;
    let elements = modal.elements().clone();
    host.page.borrow_mut().take_writes();

    modal.open_inside("/b.html").await.unwrap();

    let writes = host.page.borrow().writes().to_vec();
    let expected = [
        Write::HeightOverride(elements.panel, Some(300)),
        Write::Visible(elements.body, false),
        Write::InnerHtml(elements.body, "B".into()),
        Write::Size(elements.backdrop.unwrap(), Size::new(800, 2000)),
        Write::HeightOverride(elements.panel, None),
        Write::Top(elements.panel, 150),
        Write::Visible(elements.body, true),
    ];
    let positions: Vec<usize> = expected
        .iter()
        .map(|wanted| {
            writes
                .iter()
                .position(|w| w == wanted)
                .unwrap_or_else(|| panic!("missing {wanted:?}"))
        })
        .collect();
    assert!(positions.windows(2).all(|p| p[0] < p[1]), "{positions:?}");
}

#[tokio::test(start_paused = true)]
async fn test_swap_places_panel_with_pinned_height() {
    let host = host();
    let modal = open_at(&host, url_config(), Size::new(400, 300)).await;
    let panel = modal.elements().panel;
    host.page.borrow_mut().set_outer_size(panel, Size::new(400, 100));

    modal.open_inside("/b.html").await.unwrap();

    let page = host.page.borrow();
    assert_eq!(page.top(panel), 150);
    assert_eq!(page.outer_size(panel).height, 100);
    assert_eq!(
        page.writes_to(panel).last(),
        Some(&Write::Top(panel, 150))
    );
}

#[tokio::test(start_paused = true)]
async fn test_refade_releases_height_after_fade() {
    let host = host();
    let config = url_config().inner_swap_backdrop(InnerSwapBackdrop::Refade);
    let modal = open_at(&host, config, Size::new(400, 300)).await;
    let elements = modal.elements().clone();
    host.page.borrow_mut().take_writes();

    modal.open_inside("/b.html").await.unwrap();

    let writes = host.page.borrow().writes().to_vec();
    let released = writes
        .iter()
        .position(|w| *w == Write::HeightOverride(elements.panel, None))
        .unwrap();
    let faded_in = writes
        .iter()
        .rposition(|w| matches!(w, Write::Opacity(_, value) if *value == 1.0))
        .unwrap();
    assert!(faded_in < released, "released at {released}, faded at {faded_in}");
}

#[tokio::test(start_paused = true)]
async fn test_resize_swap_keeps_backdrop_opaque() {
    let host = host();
    let modal = open_at(&host, url_config(), Size::new(400, 300)).await;
    let backdrop = modal.elements().backdrop.unwrap();
    host.page.borrow_mut().take_writes();

    modal.open_inside("/b.html").await.unwrap();

    let writes = host.page.borrow().writes_to(backdrop);
    assert!(writes.iter().any(|w| matches!(w, Write::Size(..))));
    assert!(!writes.iter().any(|w| matches!(w, Write::Opacity(..))));
    assert_eq!(host.page.borrow().opacity(backdrop), 1.0);
}

#[tokio::test(start_paused = true)]
async fn test_refade_swap_fades_backdrop_again() {
    let host = host();
    let config = url_config().inner_swap_backdrop(InnerSwapBackdrop::Refade);
    let modal = open_at(&host, config, Size::new(400, 300)).await;
    let backdrop = modal.elements().backdrop.unwrap();
    host.page.borrow_mut().take_writes();

    modal.open_inside("/b.html").await.unwrap();

    let opacities: Vec<f64> = host
        .page
        .borrow()
        .writes_to(backdrop)
        .into_iter()
        .filter_map(|w| match w {
            Write::Opacity(_, value) => Some(value),
            _ => None,
        })
        .collect();
    assert_eq!(opacities.first(), Some(&0.0));
    assert_eq!(opacities.last(), Some(&1.0));
    assert!(opacities.len() > 2);
}

#[tokio::test(start_paused = true)]
async fn test_swap_restores_saved_scroll() {
    let host = host();
    host.page.borrow_mut().scroll_to(80);
    let modal = open_at(&host, url_config(), Size::new(400, 300)).await;

    host.page.borrow_mut().scroll_to(400);
    modal.open_inside("/b.html").await.unwrap();

    assert_eq!(modal.saved_scroll_top(), 400);
    assert_eq!(host.page.borrow().scroll_top(), 400);
    assert_eq!(host.page.borrow().top(modal.elements().panel), 550);
}

#[tokio::test(start_paused = true)]
async fn test_open_inside_ignored_unless_open() {
    let host = host();
    let modal = host.mount_config(url_config()).await.unwrap();
    assert_eq!(modal.open_inside("/b.html").await.unwrap(), Transition::NoOp);
    assert_eq!(host.loader.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failed_swap_keeps_current_content() {
    let host = host();
    let modal = open_at(&host, url_config(), Size::new(400, 300)).await;
    let body = modal.elements().body;

    let err = modal.open_inside("/missing.html").await.unwrap_err();
    assert!(matches!(err, ModalError::Load(_)));
    assert_eq!(modal.phase(), ModalPhase::Open);
    let page = host.page.borrow();
    assert_eq!(page.inner_html(body), "A");
    assert!(page.is_visible(body));
}

#[tokio::test(start_paused = true)]
async fn test_close_during_swap_wins() {
    let host = host();
    let modal = open_at(&host, url_config(), Size::new(400, 300)).await;
    let release = host.loader.hold("/slow.html", "<body>Slow</body>");

    let (swapped, closed, ()) = tokio::join!(
        modal.open_inside("/slow.html"),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            modal.close().await
        },
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            release.resolve();
        },
    );

    assert_eq!(swapped.unwrap(), Transition::Superseded);
    assert_eq!(closed.unwrap(), Transition::Completed);
    assert_eq!(modal.phase(), ModalPhase::Closed);
    assert_eq!(host.page.borrow().inner_html(modal.elements().body), "A");
}

#[tokio::test(start_paused = true)]
async fn test_rejected_close_lets_swap_finish() {
    let host = host();
    let hooks = HookSet::new().on_close_start(|_| {
        let (resolver, token) = signal();
        drop(resolver);
        token
    });
    let modal = host
        .mount(ModalProps::new(url_config()).hooks(hooks))
        .await
        .unwrap();
    let elements = modal.elements().clone();
    host.page
        .borrow_mut()
        .set_outer_size(elements.panel, Size::new(400, 300));
    modal.open().await.unwrap();
    host.page.borrow_mut().scroll_to(200);

    let (swapped, closed) = tokio::join!(modal.open_inside("/b.html"), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        modal.close().await
    });

    assert_eq!(swapped.unwrap(), Transition::Completed);
    assert_eq!(closed.unwrap(), Transition::Cancelled);
    assert_eq!(modal.phase(), ModalPhase::Open);
    let page = host.page.borrow();
    assert_eq!(page.inner_html(elements.body), "B");
    assert!(page.is_visible(elements.body));
    assert_eq!(page.top(elements.panel), 350);
}

// ===========================================================================
// Pager
// ===========================================================================

#[tokio::test(start_paused = true)]
async fn test_pager_opens_on_start_page() {
    let host = pager_host();
    let config = ModalConfig::new()
        .pager(PagerConfig::new(["/p1.html", "/p2.html", "/p3.html"]).start_index(1));
    let modal = host.mount_config(config).await.unwrap();

    modal.open().await.unwrap();
    assert_eq!(host.loader.requested_urls(), vec!["/p2.html".to_string()]);
    assert_eq!(modal.page_index(), Some(1));
    assert_eq!(host.page.borrow().inner_html(modal.elements().body), "two");
}

#[tokio::test(start_paused = true)]
async fn test_pager_controls_track_position() {
    let host = pager_host();
    let modal = host.mount_config(pager_config()).await.unwrap();
    let controls = modal.elements().pager.unwrap();
    assert!(!displayed(&host, controls.prev));
    assert!(displayed(&host, controls.next));

    modal.open().await.unwrap();
    assert_eq!(modal.page_next().await.unwrap(), Transition::Completed);
    assert_eq!(modal.page_index(), Some(1));
    assert!(displayed(&host, controls.prev));
    assert!(displayed(&host, controls.next));
    assert_eq!(host.page.borrow().inner_html(modal.elements().body), "two");

    assert_eq!(modal.page_to(10).await.unwrap(), Transition::Completed);
    assert_eq!(modal.page_index(), Some(2));
    assert!(displayed(&host, controls.prev));
    assert!(!displayed(&host, controls.next));
    assert_eq!(modal.page_next().await.unwrap(), Transition::NoOp);

    assert_eq!(modal.page_prev().await.unwrap(), Transition::Completed);
    assert_eq!(modal.page_index(), Some(1));
}

#[tokio::test(start_paused = true)]
async fn test_pager_clicks_map_to_steps() {
    let host = pager_host();
    let modal = host.mount_config(pager_config()).await.unwrap();
    let controls = modal.elements().pager.unwrap();

    let mut closed_click = DomEvent::click(controls.next);
    assert!(modal.handle_event(&mut closed_click).is_none());

    modal.open().await.unwrap();
    let mut next = DomEvent::click(controls.next);
    let step = modal.dispatch(&mut next).unwrap();
    assert_eq!(next.prevent_default_calls(), 1);
    assert_eq!(step.await.unwrap(), Transition::Completed);

    let mut prev = DomEvent::click(controls.prev);
    assert_eq!(modal.handle_event(&mut prev), Some(ModalAction::PagePrev));
}

#[tokio::test(start_paused = true)]
async fn test_paging_hooks_fire() {
    let host = pager_host();
    let recorder = HookRecorder::new();
    let modal = host
        .mount(ModalProps::new(pager_config()).hooks(recorder.hook_set()))
        .await
        .unwrap();
    modal.open().await.unwrap();
    recorder.clear();

    modal.page_next().await.unwrap();
    assert_eq!(
        recorder.points(),
        vec![HookPoint::PagingStart, HookPoint::PagingComplete]
    );
    assert_eq!(recorder.calls()[0].target.as_deref(), Some("/p2.html"));
}

#[tokio::test(start_paused = true)]
async fn test_failed_page_load_keeps_index() {
    logging::init();
    let host = TestHost::new();
    host.loader.respond("/p1.html", "<body>one</body>");
    let modal = host.mount_config(pager_config()).await.unwrap();
    modal.open().await.unwrap();

    assert!(modal.page_next().await.is_err());
    assert_eq!(modal.page_index(), Some(0));
    assert_eq!(modal.phase(), ModalPhase::Open);
    assert_eq!(host.page.borrow().inner_html(modal.elements().body), "one");
}

#[tokio::test(start_paused = true)]
async fn test_paging_without_pager_is_an_error() {
    let host = host();
    let modal = open_at(&host, url_config(), Size::new(400, 300)).await;
    assert!(matches!(
        modal.page_next().await,
        Err(ModalError::InvalidConfig(_))
    ));
    assert!(modal.elements().pager.is_none());
    assert_eq!(modal.page_index(), None);
}

#[tokio::test(start_paused = true)]
async fn edge_paging_while_closed_is_noop() {
    let host = pager_host();
    let modal = host.mount_config(pager_config()).await.unwrap();
    assert_eq!(modal.page_next().await.unwrap(), Transition::NoOp);
    assert_eq!(modal.page_index(), Some(0));
    assert_eq!(host.loader.request_count(), 0);
}

#![forbid(unsafe_code)]

//! Event bridge: mapping clicks and key presses to transitions.
//!
//! ```sh
//! cargo test -p scrim-harness --test bridge
//! ```

use pretty_assertions::assert_eq;
use scrim_core::{DomEvent, KeyCode, Selector};
use scrim_harness::{TestHost, logging};
use scrim_modal::{
    ContentSource, ElementSpec, Listener, ModalAction, ModalConfig, ModalInstance, ModalPhase,
    Transition,
};

const PAGE: &str = "<body>Hello</body>";

fn url_config() -> ModalConfig {
    ModalConfig::with_source(ContentSource::ByUrl("/page.html".into()))
}

async fn mounted(config: ModalConfig) -> (TestHost, ModalInstance) {
    logging::init();
    let host = TestHost::new();
    host.loader.respond("/page.html", PAGE);
    host.loader.respond("/b.html", "<body>B</body>");
    let modal = host.mount_config(config).await.unwrap();
    (host, modal)
}

fn escape() -> DomEvent {
    DomEvent::key_down(KeyCode::Escape)
}

#[tokio::test(start_paused = true)]
async fn test_escape_bound_only_while_open() {
    let (_host, modal) = mounted(url_config()).await;
    assert!(!modal.escape_bound());
    assert!(modal.dispatch(&mut escape()).is_none());

    modal.open().await.unwrap();
    assert!(modal.escape_bound());
    let mut event = escape();
    assert_eq!(modal.handle_event(&mut event), Some(ModalAction::EscapePressed));
    assert_eq!(event.prevent_default_calls(), 1);

    let close = modal.dispatch(&mut escape()).unwrap();
    assert_eq!(close.await.unwrap(), Transition::Completed);
    assert!(!modal.escape_bound());
    assert!(modal.handle_event(&mut escape()).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_escape_suppresses_default_once() {
    let (_host, modal) = mounted(url_config()).await;
    let mut closed = escape();
    assert!(modal.dispatch(&mut closed).is_none());
    assert_eq!(closed.prevent_default_calls(), 0);

    modal.open().await.unwrap();
    let mut event = escape();
    let close = modal.dispatch(&mut event).unwrap();
    assert_eq!(event.prevent_default_calls(), 1);
    assert_eq!(close.await.unwrap(), Transition::Completed);
    assert_eq!(event.prevent_default_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_other_keys_are_ignored() {
    let (_host, modal) = mounted(url_config()).await;
    modal.open().await.unwrap();
    let mut event = DomEvent::key_down(KeyCode::from_key("Enter"));
    assert!(modal.handle_event(&mut event).is_none());
    assert_eq!(event.prevent_default_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_click_suppresses_default_once() {
    let (_host, modal) = mounted(url_config()).await;
    modal.open().await.unwrap();

    let mut event = DomEvent::click(modal.elements().dismiss);
    let close = modal.dispatch(&mut event).unwrap();
    assert_eq!(event.prevent_default_calls(), 1);
    assert_eq!(close.await.unwrap(), Transition::Completed);
    assert_eq!(modal.phase(), ModalPhase::Closed);
}

#[tokio::test(start_paused = true)]
async fn test_click_inside_dismiss_control_closes() {
    let (host, modal) = mounted(url_config()).await;
    let icon = host
        .page
        .borrow_mut()
        .add(modal.elements().dismiss, ElementSpec::new("span", "icon"));
    modal.open().await.unwrap();

    let mut event = DomEvent::click(icon);
    assert_eq!(modal.handle_event(&mut event), Some(ModalAction::Close));
    assert_eq!(event.prevent_default_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_close_from_suppresses_default_once() {
    let (_host, modal) = mounted(url_config()).await;
    modal.open().await.unwrap();

    let mut event = DomEvent::click(modal.elements().dismiss);
    let close = modal.close_from(&mut event);
    assert_eq!(event.prevent_default_calls(), 1);
    assert_eq!(close.await.unwrap(), Transition::Completed);
}

#[tokio::test(start_paused = true)]
async fn test_backdrop_click_closes() {
    let (_host, modal) = mounted(url_config()).await;
    modal.open().await.unwrap();

    let mut event = DomEvent::click(modal.elements().backdrop.unwrap());
    assert_eq!(modal.handle_event(&mut event), Some(ModalAction::BackdropClicked));
    assert_eq!(event.prevent_default_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unrelated_click_is_untouched() {
    let (host, modal) = mounted(url_config()).await;
    let elsewhere = host
        .page
        .borrow_mut()
        .add_to_body(ElementSpec::new("p", "article"));
    modal.open().await.unwrap();

    let mut event = DomEvent::click(elsewhere);
    assert!(modal.dispatch(&mut event).is_none());
    assert!(!event.default_prevented());
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_ignored_while_closed() {
    let (_host, modal) = mounted(url_config()).await;
    let mut event = DomEvent::click(modal.elements().dismiss);
    assert!(modal.handle_event(&mut event).is_none());
    assert_eq!(event.prevent_default_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_open_trigger_opens_when_closed() {
    logging::init();
    let host = TestHost::new();
    host.loader.respond("/page.html", PAGE);
    let trigger = host
        .page
        .borrow_mut()
        .add_to_body(ElementSpec::new("a", "open-modal").href("#"));
    let modal = host
        .mount_config(url_config().open_trigger_selector(Selector::class("open-modal")))
        .await
        .unwrap();

    let mut event = DomEvent::click(trigger);
    let open = modal.dispatch(&mut event).unwrap();
    assert_eq!(event.prevent_default_calls(), 1);
    assert_eq!(open.await.unwrap(), Transition::Completed);

    let mut again = DomEvent::click(trigger);
    assert!(modal.handle_event(&mut again).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_inner_link_loads_inside_panel() {
    let (host, modal) = mounted(url_config().inner_link_selector(Selector::class("inner"))).await;
    modal.open().await.unwrap();
    let body = modal.elements().body;
    let link = host
        .page
        .borrow_mut()
        .add(body, ElementSpec::new("a", "inner").href("/b.html"));

    let mut event = DomEvent::click(link);
    let swap = modal.dispatch(&mut event).unwrap();
    assert_eq!(event.prevent_default_calls(), 1);
    assert_eq!(swap.await.unwrap(), Transition::Completed);
    assert_eq!(host.page.borrow().inner_html(body), "B");
    assert_eq!(modal.phase(), ModalPhase::Open);
}

#[tokio::test(start_paused = true)]
async fn test_event_href_wins_over_attribute() {
    let (host, modal) = mounted(url_config().inner_link_selector(Selector::class("inner"))).await;
    modal.open().await.unwrap();
    let link = host
        .page
        .borrow_mut()
        .add(modal.elements().body, ElementSpec::new("a", "inner").href("b.html"));

    let mut event = DomEvent::click(link).with_href("http://example.com/b.html");
    assert_eq!(
        modal.handle_event(&mut event),
        Some(ModalAction::OpenInside("http://example.com/b.html".into()))
    );
}

#[tokio::test(start_paused = true)]
async fn test_open_inside_from_suppresses_default_once() {
    let (host, modal) = mounted(url_config()).await;
    modal.open().await.unwrap();

    let mut event = DomEvent::click(modal.elements().body).with_href("/b.html");
    let swap = modal.open_inside_from(&mut event);
    assert_eq!(event.prevent_default_calls(), 1);
    assert_eq!(swap.await.unwrap(), Transition::Completed);
    assert_eq!(host.page.borrow().inner_html(modal.elements().body), "B");
}

#[tokio::test(start_paused = true)]
async fn test_listeners_registered_at_mount() {
    let (_host, modal) = mounted(
        url_config()
            .inner_link_selector(Selector::class("inner"))
            .open_trigger_selector(Selector::class("open-modal")),
    )
    .await;
    let listeners = modal.listeners();
    assert!(listeners.contains(&Listener::DismissClick {
        scope: modal.elements().panel,
        selector: Selector::class("dismiss"),
    }));
    assert!(listeners.contains(&Listener::BackdropClick(modal.elements().backdrop.unwrap())));
    assert!(listeners.contains(&Listener::InnerLinkClick(Selector::class("inner"))));
    assert!(listeners.contains(&Listener::OpenTriggerClick(Selector::class("open-modal"))));
    assert!(!listeners.contains(&Listener::EscapeKey));
}

#[tokio::test(start_paused = true)]
async fn test_instances_ignore_each_others_controls() {
    logging::init();
    let host = TestHost::new();
    host.loader.respond("/page.html", PAGE);
    let a = host.mount_config(url_config()).await.unwrap();
    let b = host.mount_config(url_config()).await.unwrap();
    a.open().await.unwrap();
    b.open().await.unwrap();

    let mut event = DomEvent::click(a.elements().dismiss);
    assert!(b.handle_event(&mut event).is_none());
    assert_eq!(a.handle_event(&mut event), Some(ModalAction::Close));
    assert_eq!(event.prevent_default_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unmounted_instance_maps_nothing() {
    let (_host, modal) = mounted(url_config()).await;
    modal.open().await.unwrap();
    modal.unmount();
    assert!(modal.handle_event(&mut escape()).is_none());
}

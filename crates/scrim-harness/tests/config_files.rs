#![forbid(unsafe_code)]

//! Mounting from TOML and JSON configuration files.
//!
//! ```sh
//! cargo test -p scrim-harness --test config_files
//! ```

use std::io::Write as _;

use pretty_assertions::assert_eq;
use scrim_core::Selector;
use scrim_harness::{TestHost, logging};
use scrim_modal::{
    ConfigError, ContentSource, InnerSwapBackdrop, ModalConfig, PagerConfig, Transition,
};

fn write_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test(start_paused = true)]
async fn test_toml_config_mounts_and_opens() {
    logging::init();
    let file = write_file(
        ".toml",
        r#"
fade_duration_ms = 0
cache = false
inner_link_selector = "a.inner"
inner_swap_backdrop = "refade"
content_source = { by_url = "/page.html" }
"#,
    );
    let config = ModalConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(config.fade_duration_ms, 0);
    assert_eq!(config.inner_swap_backdrop, InnerSwapBackdrop::Refade);
    assert_eq!(config.inner_link_selector, Some(Selector::parse("a.inner").unwrap()));

    let host = TestHost::new();
    host.loader.respond("/page.html", "<body>Hi</body>");
    let modal = host.mount_config(config).await.unwrap();
    assert_eq!(modal.open().await.unwrap(), Transition::Completed);

    let requests = host.loader.requests();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].cache);
    assert_ne!(requests[0].effective_url, "/page.html");
    assert_eq!(host.page.borrow().inner_html(modal.elements().body), "Hi");
}

#[tokio::test(start_paused = true)]
async fn test_json_pager_config_mounts() {
    logging::init();
    let file = write_file(
        ".json",
        r#"{
  "fade_duration_ms": 0,
  "pager": { "urls": ["/p1.html", "/p2.html"], "start_index": 1 }
}"#,
    );
    let config = ModalConfig::from_json_file(file.path()).unwrap();
    assert_eq!(
        config.pager,
        Some(PagerConfig::new(["/p1.html", "/p2.html"]).start_index(1))
    );

    let host = TestHost::new();
    host.loader.respond("/p2.html", "<body>two</body>");
    let modal = host.mount_config(config).await.unwrap();
    modal.open().await.unwrap();
    assert_eq!(modal.page_index(), Some(1));
    assert_eq!(host.page.borrow().inner_html(modal.elements().body), "two");
}

#[test]
fn test_inline_source_from_toml() {
    let config = ModalConfig::from_toml_str(r##"content_source = { inline = "#help" }"##).unwrap();
    assert_eq!(
        config.content_source,
        Some(ContentSource::Inline(Selector::parse("#help").unwrap()))
    );
}

#[test]
fn edge_invalid_file_reports_every_problem() {
    let file = write_file(
        ".toml",
        r#"
fade_duration_ms = 120000
panel_class = ""
"#,
    );
    match ModalConfig::from_toml_file(file.path()) {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors.len(), 3, "{errors:?}");
            assert!(errors.iter().any(|e| e.starts_with("fade_duration_ms")));
            assert!(errors.iter().any(|e| e.starts_with("panel_class")));
            assert!(errors.iter().any(|e| e.starts_with("content_source")));
        }
        other => panic!("expected validation errors, got {other:?}"),
    }
}

#[test]
fn edge_malformed_json_is_a_parse_error() {
    let file = write_file(".json", "{ \"cache\": ");
    assert!(matches!(
        ModalConfig::from_json_file(file.path()),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn edge_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        ModalConfig::from_toml_file(dir.path().join("absent.toml")),
        Err(ConfigError::Io(_))
    ));
}

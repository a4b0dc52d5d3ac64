#![forbid(unsafe_code)]

//! Modal configuration.
//!
//! [`ModalConfig`] is an immutable record fixed at mount time. It can be
//! built in code with the chained setters, or loaded from TOML/JSON:
//!
//! ```toml
//! fade_duration_ms = 0
//! cache = false
//! inner_link_selector = "a.inner"
//! content_source = { by_url = "/page.html" }
//! ```
//!
//! ```rust,ignore
//! let config = ModalConfig::from_toml_file("modal.toml")?;
//! ```
//!
//! # Defaults
//!
//! Every field defaults to the behavior of a plain dismissible modal with a
//! fading backdrop: caching on, 750ms fades, scroll position restored on
//! close.

#[cfg(feature = "config-files")]
use std::path::Path;

use scrim_core::Selector;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::animation::Easing;

/// Longest accepted fade or slide.
const MAX_ANIMATION_MS: u64 = 60_000;

/// Where the panel content comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    /// An element already on the page, moved into a new panel.
    Inline(Selector),
    /// An existing element (by id) that already has the panel structure.
    ById(String),
    /// A remote HTML document whose body is injected into the panel.
    ByUrl(String),
}

impl ContentSource {
    /// Whether the source requires a network fetch.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::ByUrl(_))
    }
}

/// What happens to the backdrop when content is swapped inside an open panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InnerSwapBackdrop {
    /// Resize the backdrop to the new geometry without fading.
    #[default]
    Resize,
    /// Resize, then fade the backdrop in again from transparent.
    Refade,
}

/// Paging through a fixed list of remote documents.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PagerConfig {
    /// Document URLs in page order.
    pub urls: Vec<String>,
    /// Page shown on first open.
    pub start_index: usize,
}

impl PagerConfig {
    /// Pager over `urls` starting at the first page.
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
            start_index: 0,
        }
    }

    /// Set the page shown on first open.
    pub fn start_index(mut self, index: usize) -> Self {
        self.start_index = index;
        self
    }
}

/// Modal configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalConfig {
    /// Allow cached responses for remote content.
    pub cache: bool,
    /// Backdrop fade duration in milliseconds; 0 disables the fade.
    pub fade_duration_ms: u64,
    /// Restore the scroll offset saved at open when the panel closes.
    pub resume_scroll_position: bool,
    /// Show a backdrop behind the panel.
    pub backdrop_enabled: bool,
    /// Class of a created panel container.
    pub panel_class: String,
    /// Class of the panel body that receives content.
    pub body_class: String,
    /// Class of a created backdrop.
    pub backdrop_class: String,
    /// Controls inside the panel that close it.
    pub dismiss_selector: Selector,
    /// Existing backdrop element to adopt instead of creating one.
    pub backdrop_selector: Option<Selector>,
    /// Links anywhere on the page whose targets load inside the open panel.
    pub inner_link_selector: Option<Selector>,
    /// Elements whose click opens the modal.
    pub open_trigger_selector: Option<Selector>,
    /// Panel content source.
    pub content_source: Option<ContentSource>,
    /// Duration of the panel slide when content is swapped.
    pub panel_transition_ms: u64,
    /// Easing of the panel slide.
    pub panel_easing: Easing,
    /// Backdrop behavior during inner content swaps.
    pub inner_swap_backdrop: InnerSwapBackdrop,
    /// Optional multi-document pager.
    pub pager: Option<PagerConfig>,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            cache: true,
            fade_duration_ms: 750,
            resume_scroll_position: true,
            backdrop_enabled: true,
            panel_class: "modal-box".into(),
            body_class: "modal-body".into(),
            backdrop_class: "modal-bg".into(),
            dismiss_selector: Selector::class("dismiss"),
            backdrop_selector: None,
            inner_link_selector: None,
            open_trigger_selector: None,
            content_source: None,
            panel_transition_ms: 400,
            panel_easing: Easing::EaseOut,
            inner_swap_backdrop: InnerSwapBackdrop::Resize,
            pager: None,
        }
    }
}

impl ModalConfig {
    /// Create a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a default configuration with a content source.
    pub fn with_source(source: ContentSource) -> Self {
        Self::default().content_source(source)
    }

    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    /// Set the backdrop fade duration (zero disables the fade).
    pub fn fade_duration(mut self, duration: Duration) -> Self {
        self.fade_duration_ms = duration.as_millis() as u64;
        self
    }

    pub fn resume_scroll_position(mut self, resume: bool) -> Self {
        self.resume_scroll_position = resume;
        self
    }

    pub fn backdrop_enabled(mut self, enabled: bool) -> Self {
        self.backdrop_enabled = enabled;
        self
    }

    pub fn dismiss_selector(mut self, selector: Selector) -> Self {
        self.dismiss_selector = selector;
        self
    }

    pub fn backdrop_selector(mut self, selector: Selector) -> Self {
        self.backdrop_selector = Some(selector);
        self
    }

    pub fn inner_link_selector(mut self, selector: Selector) -> Self {
        self.inner_link_selector = Some(selector);
        self
    }

    pub fn open_trigger_selector(mut self, selector: Selector) -> Self {
        self.open_trigger_selector = Some(selector);
        self
    }

    pub fn content_source(mut self, source: ContentSource) -> Self {
        self.content_source = Some(source);
        self
    }

    /// Set the panel slide duration used when content is swapped.
    pub fn panel_transition(mut self, duration: Duration) -> Self {
        self.panel_transition_ms = duration.as_millis() as u64;
        self
    }

    pub fn panel_easing(mut self, easing: Easing) -> Self {
        self.panel_easing = easing;
        self
    }

    pub fn inner_swap_backdrop(mut self, mode: InnerSwapBackdrop) -> Self {
        self.inner_swap_backdrop = mode;
        self
    }

    pub fn pager(mut self, pager: PagerConfig) -> Self {
        self.pager = Some(pager);
        self
    }

    /// Backdrop fade duration.
    pub fn fade_duration_value(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms)
    }

    /// Panel slide duration.
    pub fn panel_transition_value(&self) -> Duration {
        Duration::from_millis(self.panel_transition_ms)
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-files")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid. Checks that need the host page (does the inline element
    /// exist?) happen at mount.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.fade_duration_ms > MAX_ANIMATION_MS {
            errors.push(format!(
                "fade_duration_ms must be <= {MAX_ANIMATION_MS}, got {}",
                self.fade_duration_ms
            ));
        }
        if self.panel_transition_ms > MAX_ANIMATION_MS {
            errors.push(format!(
                "panel_transition_ms must be <= {MAX_ANIMATION_MS}, got {}",
                self.panel_transition_ms
            ));
        }

        for (name, value) in [
            ("panel_class", &self.panel_class),
            ("body_class", &self.body_class),
            ("backdrop_class", &self.backdrop_class),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{name} must not be empty"));
            }
        }

        match &self.content_source {
            Some(ContentSource::ById(id)) if id.trim().is_empty() => {
                errors.push("content_source.by_id must not be empty".into());
            }
            Some(ContentSource::ByUrl(url)) if url.trim().is_empty() => {
                errors.push("content_source.by_url must not be empty".into());
            }
            None if self.pager.is_none() => {
                errors.push("content_source is required unless a pager is configured".into());
            }
            _ => {}
        }

        if let Some(pager) = &self.pager {
            if pager.urls.is_empty() {
                errors.push("pager.urls must not be empty".into());
            } else if pager.start_index >= pager.urls.len() {
                errors.push(format!(
                    "pager.start_index must be < {}, got {}",
                    pager.urls.len(),
                    pager.start_index
                ));
            }
            if pager.urls.iter().any(|url| url.trim().is_empty()) {
                errors.push("pager.urls must not contain empty entries".into());
            }
        }

        errors
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors from loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config-files")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "config-files")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

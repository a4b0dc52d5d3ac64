#![forbid(unsafe_code)]

//! Browser and HTTP collaborators for Scrim.
//!
//! - [`HttpLoader`] fetches remote panel content with `reqwest`. It works in
//!   native hosts and in the browser.
//! - On wasm32, `WebPage` implements the page contract over `web-sys`,
//!   `browser_host` bundles it with an [`HttpLoader`] and a timeout frame
//!   clock, and `attach` forwards document events to an instance.
//!
//! ```rust,ignore
//! let page = Rc::new(RefCell::new(WebPage::new().expect("browser")));
//! let modal = ModalInstance::mount(browser_host(&page), props).await?;
//! let _events = attach(&page, &modal);
//! ```

pub mod http;

#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use http::HttpLoader;

#[cfg(target_arch = "wasm32")]
pub use dom::{EventBinding, WebPage, attach, browser_host};
#[cfg(target_arch = "wasm32")]
pub use scrim_runtime::TimeoutFrameClock;

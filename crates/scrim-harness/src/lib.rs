#![forbid(unsafe_code)]

//! Test harness for Scrim modals.
//!
//! - [`FakePage`]: an in-memory document with a write log.
//! - [`ScriptedLoader`]: canned, delayed, or held remote responses.
//! - [`HookRecorder`]: records which hooks fired, in which phase.
//! - [`TestHost`]: the three wired into a [`Host`](scrim_modal::Host) with a
//!   tokio frame clock, so `#[tokio::test(start_paused = true)]` runs fades
//!   deterministically.
//! - [`logging`]: global test logging and per-test tracing capture.
//!
//! # Running
//!
//! ```sh
//! cargo test -p scrim-harness
//! RUST_LOG=scrim_modal=debug cargo test -p scrim-harness --test lifecycle
//! ```

pub mod hooks;
pub mod host;
pub mod loader;
pub mod logging;
pub mod page;

pub use hooks::HookRecorder;
pub use host::TestHost;
pub use loader::ScriptedLoader;
pub use page::{FakeElement, FakePage, Write};

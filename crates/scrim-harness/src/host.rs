#![forbid(unsafe_code)]

//! Ready-made hosts for driving modals in tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use scrim_modal::{Host, ModalConfig, ModalInstance, ModalProps, Result, SharedPage};
use scrim_runtime::TokioFrameClock;

use crate::loader::ScriptedLoader;
use crate::page::FakePage;

/// A [`FakePage`] and [`ScriptedLoader`] wired into a [`Host`].
#[derive(Debug, Clone)]
pub struct TestHost {
    pub page: Rc<RefCell<FakePage>>,
    pub loader: Rc<ScriptedLoader>,
    frame: Duration,
}

impl TestHost {
    pub fn new() -> Self {
        Self::with_page(FakePage::new())
    }

    pub fn with_page(page: FakePage) -> Self {
        Self {
            page: Rc::new(RefCell::new(page)),
            loader: ScriptedLoader::new(),
            frame: scrim_runtime::clock::FRAME_INTERVAL,
        }
    }

    /// Tick animations every `frame` of tokio time.
    pub fn frame_interval(mut self, frame: Duration) -> Self {
        self.frame = frame;
        self
    }

    /// A host sharing this page and loader.
    pub fn host(&self) -> Host {
        let page: SharedPage = self.page.clone();
        Host::new(
            page,
            self.loader.clone(),
            Rc::new(TokioFrameClock::with_interval(self.frame)),
        )
    }

    /// Mount a modal on this host.
    pub async fn mount(&self, props: impl Into<ModalProps>) -> Result<ModalInstance> {
        ModalInstance::mount(self.host(), props.into()).await
    }

    /// Mount with plain `config` and no hooks.
    pub async fn mount_config(&self, config: ModalConfig) -> Result<ModalInstance> {
        self.mount(config).await
    }
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}

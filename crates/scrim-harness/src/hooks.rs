#![forbid(unsafe_code)]

//! Hook call recording.

use std::cell::RefCell;
use std::rc::Rc;

use scrim_modal::{HookContext, HookPoint, HookResult, HookSet, ModalPhase};

/// Records every hook invocation it is wired into.
#[derive(Debug, Clone, Default)]
pub struct HookRecorder {
    calls: Rc<RefCell<Vec<HookContext>>>,
}

impl HookRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A hook set that records every point and continues immediately.
    pub fn hook_set(&self) -> HookSet {
        HookPoint::ALL
            .iter()
            .fold(HookSet::new(), |set, point| set.on(*point, self.recording(|_| ())))
    }

    /// Wrap `hook` so its calls are recorded before it runs.
    pub fn recording<F, R>(&self, hook: F) -> impl Fn(&HookContext) -> HookResult + 'static
    where
        F: Fn(&HookContext) -> R + 'static,
        R: Into<HookResult>,
    {
        let calls = Rc::clone(&self.calls);
        move |ctx: &HookContext| {
            calls.borrow_mut().push(ctx.clone());
            hook(ctx).into()
        }
    }

    pub fn calls(&self) -> Vec<HookContext> {
        self.calls.borrow().clone()
    }

    /// Points fired so far, in order.
    pub fn points(&self) -> Vec<HookPoint> {
        self.calls.borrow().iter().map(|c| c.point).collect()
    }

    pub fn count(&self, point: HookPoint) -> usize {
        self.calls.borrow().iter().filter(|c| c.point == point).count()
    }

    /// Phase the instance was in when `point` last fired.
    pub fn phase_at(&self, point: HookPoint) -> Option<ModalPhase> {
        self.calls
            .borrow()
            .iter()
            .rev()
            .find(|c| c.point == point)
            .map(|c| c.phase)
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

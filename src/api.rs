use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;
use crate::controller::{SlideController, SlideInfo};
use crate::host::Host;
use crate::input::{Dispatch, InputEvent};

/// Shared handle to one controller, passed to whatever needs to drive it.
/// Calls made while the controller is already busy are dropped silently.
pub struct PresentationHandle<H: Host> {
    inner: Rc<RefCell<SlideController<H>>>,
}

impl<H: Host> Clone for PresentationHandle<H> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<H: Host> PresentationHandle<H> {
    pub fn new(controller: SlideController<H>) -> Self {
        Self { inner: Rc::new(RefCell::new(controller)) }
    }

    fn with<R>(&self, fallback: R, f: impl FnOnce(&mut SlideController<H>) -> R) -> R {
        match self.inner.try_borrow_mut() {
            Ok(mut controller) => f(&mut controller),
            Err(_) => {
                debug!("controller busy, re-entrant call dropped");
                fallback
            }
        }
    }

    pub fn next_slide(&self) -> bool {
        self.with(false, |c| c.next())
    }

    pub fn previous_slide(&self) -> bool {
        self.with(false, |c| c.previous())
    }

    pub fn go_to_slide(&self, n: usize) -> bool {
        self.with(false, |c| c.go_to(n))
    }

    pub fn reset(&self) -> bool {
        self.with(false, |c| c.reset())
    }

    pub fn current_info(&self) -> Option<SlideInfo> {
        self.inner.try_borrow().ok().map(|c| c.info())
    }

    pub fn handle(&self, event: InputEvent) -> Dispatch {
        self.with(Dispatch::Ignored, |c| c.handle(event))
    }

    pub fn refresh(&self) {
        self.with((), |c| c.refresh())
    }

    /// Runs `f` against the host, e.g. to render it. `None` when busy.
    pub fn inspect<R>(&self, f: impl FnOnce(&SlideController<H>) -> R) -> Option<R> {
        self.inner.try_borrow().ok().map(|c| f(&c))
    }
}

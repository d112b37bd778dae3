//! One-shot readiness signal with any number of waiters.
//!
//! A backend whose library loads asynchronously holds an unopened latch; every
//! chart queues its draw behind it. Opening the latch runs each queued waiter
//! exactly once. Waiting on an open latch runs the continuation immediately.

use log::debug;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Waiter = Box<dyn FnOnce()>;

enum LatchState {
    Pending(Vec<Waiter>),
    Open,
}

/// Clonable handle; clones share the same state.
#[derive(Clone)]
pub struct ReadyLatch {
    state: Rc<RefCell<LatchState>>,
}

impl ReadyLatch {
    /// A latch that has not fired yet.
    pub fn pending() -> Self {
        Self {
            state: Rc::new(RefCell::new(LatchState::Pending(Vec::new()))),
        }
    }

    /// A latch that is already open; `wait` runs continuations synchronously.
    pub fn open_now() -> Self {
        Self {
            state: Rc::new(RefCell::new(LatchState::Open)),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(*self.state.borrow(), LatchState::Open)
    }

    /// Number of continuations queued behind the latch.
    pub fn waiting(&self) -> usize {
        match &*self.state.borrow() {
            LatchState::Pending(waiters) => waiters.len(),
            LatchState::Open => 0,
        }
    }

    /// Run `f` once the latch is open.
    pub fn wait(&self, f: impl FnOnce() + 'static) {
        {
            let mut state = self.state.borrow_mut();
            if let LatchState::Pending(waiters) = &mut *state {
                waiters.push(Box::new(f));
                return;
            }
        }
        f();
    }

    /// Open the latch and run every queued waiter. Later calls do nothing.
    pub fn open(&self) {
        let waiters = {
            let mut state = self.state.borrow_mut();
            match std::mem::replace(&mut *state, LatchState::Open) {
                LatchState::Pending(waiters) => waiters,
                LatchState::Open => return,
            }
        };
        debug!("ready latch opened, releasing {} waiter(s)", waiters.len());
        // The borrow is released first so waiters may wait on this latch again.
        for waiter in waiters {
            waiter();
        }
    }
}

impl Default for ReadyLatch {
    fn default() -> Self {
        Self::pending()
    }
}

impl fmt::Debug for ReadyLatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadyLatch")
            .field("open", &self.is_open())
            .field("waiting", &self.waiting())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn open_latch_runs_immediately() {
        let latch = ReadyLatch::open_now();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        latch.wait(move || h.set(h.get() + 1));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn pending_latch_fans_out_once() {
        let latch = ReadyLatch::pending();
        let hits = Rc::new(Cell::new(0));
        for _ in 0..3 {
            let h = hits.clone();
            latch.wait(move || h.set(h.get() + 1));
        }
        assert_eq!(hits.get(), 0);
        assert_eq!(latch.waiting(), 3);
        latch.open();
        assert_eq!(hits.get(), 3);
        latch.open();
        assert_eq!(hits.get(), 3);
    }

    #[test]
    fn waiter_can_wait_again() {
        let latch = ReadyLatch::pending();
        let hits = Rc::new(Cell::new(0));
        let (l, h) = (latch.clone(), hits.clone());
        latch.wait(move || {
            let h2 = h.clone();
            l.wait(move || h2.set(h2.get() + 10));
            h.set(h.get() + 1);
        });
        latch.open();
        assert_eq!(hits.get(), 11);
    }
}

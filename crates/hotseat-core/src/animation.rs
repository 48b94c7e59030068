//! Serialization of removal animations against row mutation.
//!
//! The renderer plays tweens; this module only tracks their completion. A
//! removal batch moves `Idle -> Animating -> Settled`; occupants are
//! detached on settle behind an existence check, so a completion arriving
//! after the occupant was resolved through another path is a no-op.
//! Starting a new batch forcibly completes an in-flight one instead of
//! abandoning it, which keeps disabled-but-attached occupants from leaking.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::row::{OccupantId, RowError, SlotRow};

/// One-shot completion signal handed out by the renderer for a running
/// tween. Completing twice is a no-op; waiters registered after completion
/// fire immediately.
#[derive(Clone, Default)]
pub struct CompletionSignal {
    inner: Rc<SignalInner>,
}

#[derive(Default)]
struct SignalInner {
    complete: Cell<bool>,
    waiters: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl CompletionSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// A signal that is already complete; used for unanimated operations.
    pub fn ready() -> Self {
        let signal = Self::new();
        signal.complete();
        signal
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.inner.complete.get()
    }

    /// Marks the animation finished and drains the waiter list.
    pub fn complete(&self) {
        if self.inner.complete.replace(true) {
            return;
        }
        let waiters = std::mem::take(&mut *self.inner.waiters.borrow_mut());
        for waiter in waiters {
            waiter();
        }
    }

    /// Registers `f` to run on completion (immediately if already done).
    pub fn on_complete(&self, f: impl FnOnce() + 'static) {
        if self.inner.complete.get() {
            f();
        } else {
            self.inner.waiters.borrow_mut().push(Box::new(f));
        }
    }
}

impl fmt::Debug for CompletionSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionSignal")
            .field("complete", &self.inner.complete.get())
            .finish()
    }
}

/// Joins a set of completion signals into one that fires when all of them
/// have fired. An empty set completes immediately.
pub fn join_signals(signals: &[CompletionSignal]) -> CompletionSignal {
    let joined = CompletionSignal::new();
    if signals.is_empty() {
        joined.complete();
        return joined;
    }
    let remaining = Rc::new(Cell::new(signals.len()));
    for signal in signals {
        let joined = joined.clone();
        let remaining = Rc::clone(&remaining);
        signal.on_complete(move || {
            remaining.set(remaining.get() - 1);
            if remaining.get() == 0 {
                joined.complete();
            }
        });
    }
    joined
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BatchState {
    Animating,
    Settled,
}

struct RemovalBatch {
    exits: Vec<(OccupantId, CompletionSignal)>,
    state: Cell<BatchState>,
}

struct CoordinatorInner {
    batch: RefCell<Option<Rc<RemovalBatch>>>,
    deferred: RefCell<Option<Box<dyn FnOnce()>>>,
}

/// Tracks the (at most one) removal batch in flight for a row, and the
/// single deferred follow-up run collapsed from reconcile requests that
/// arrived while the batch was animating.
#[derive(Clone)]
pub struct AnimationCoordinator {
    inner: Rc<CoordinatorInner>,
}

impl Default for AnimationCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationCoordinator {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(CoordinatorInner {
                batch: RefCell::new(None),
                deferred: RefCell::new(None),
            }),
        }
    }

    /// True while a removal batch is animating. Reconcile runs must defer
    /// instead of reading row state mid-removal.
    pub fn removal_in_flight(&self) -> bool {
        self.inner
            .batch
            .borrow()
            .as_ref()
            .is_some_and(|batch| batch.state.get() == BatchState::Animating)
    }

    /// Parks `f` to run once the current batch settles. Only the latest
    /// deferred run is kept; earlier ones are superseded.
    pub fn defer(&self, f: impl FnOnce() + 'static) {
        let superseded = self.inner.deferred.borrow_mut().replace(Box::new(f)).is_some();
        if superseded {
            tracing::trace!("deferred reconcile superseded by a newer request");
        }
    }

    /// Starts a removal batch over `exits`. Any batch still in flight is
    /// forcibly completed first. On settle the exited occupants are
    /// detached (idempotently), `on_settled` receives the ids actually
    /// detached, and the deferred run, if any, fires last.
    pub fn begin_removals(
        &self,
        row: &Rc<RefCell<SlotRow>>,
        exits: Vec<(OccupantId, CompletionSignal)>,
        on_settled: impl FnOnce(&[OccupantId]) + 'static,
    ) {
        self.finish_in_flight();

        let batch = Rc::new(RemovalBatch {
            exits,
            state: Cell::new(BatchState::Animating),
        });
        *self.inner.batch.borrow_mut() = Some(Rc::clone(&batch));

        let signals: Vec<CompletionSignal> =
            batch.exits.iter().map(|(_, signal)| signal.clone()).collect();
        let row = Rc::clone(row);
        let inner = Rc::clone(&self.inner);
        join_signals(&signals).on_complete(move || {
            if batch.state.replace(BatchState::Settled) == BatchState::Settled {
                return;
            }
            let mut detached = Vec::new();
            {
                let mut row = row.borrow_mut();
                for (id, _) in &batch.exits {
                    match row.detach(*id) {
                        Ok(_) => detached.push(*id),
                        // Already resolved through another path.
                        Err(RowError::OccupantMissing { .. }) => {}
                    }
                }
            }
            {
                let mut slot = inner.batch.borrow_mut();
                if slot.as_ref().is_some_and(|current| Rc::ptr_eq(current, &batch)) {
                    *slot = None;
                }
            }
            on_settled(&detached);
            let deferred = inner.deferred.borrow_mut().take();
            if let Some(deferred) = deferred {
                deferred();
            }
        });
    }

    /// Synchronously completes the in-flight batch, if any. Every exit
    /// signal fires now, which drives the settle path (detach included)
    /// before this call returns.
    pub fn finish_in_flight(&self) {
        let batch = self.inner.batch.borrow().clone();
        if let Some(batch) = batch {
            if batch.state.get() == BatchState::Animating {
                for (_, signal) in &batch.exits {
                    signal.complete();
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;

//! The prediction controller facade.
//!
//! Fills gaps in the row with predicted items, preserves what the user
//! pinned, and replaces predictions as the ranking updates or a drag moves
//! items in and out. Everything runs on the UI thread; the only suspension
//! points are animation-completion callbacks, and the controller is a
//! cheaply cloneable handle so those callbacks can re-enter it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use hotseat_grid::GridSpec;

use crate::animation::{join_signals, AnimationCoordinator, CompletionSignal};
use crate::drag::{DragOverlay, DragSession};
use crate::host::{AnalyticsSink, ItemStore, RowRenderer};
use crate::item::{Container, ItemInfo, PredictionSet};
use crate::reconcile::reconcile;
use crate::row::SlotRow;
use crate::telemetry::{launch_ranking, AnalyticsEvent, TraceId};
use crate::visibility::{GateContext, VisibilityGate};

type RefillCallback = Box<dyn FnOnce()>;

struct ControllerInner {
    row: Rc<RefCell<SlotRow>>,
    gate: VisibilityGate,
    overlay: DragOverlay,
    coordinator: AnimationCoordinator,
    renderer: Rc<dyn RowRenderer>,
    store: Rc<dyn ItemStore>,
    analytics: Rc<dyn AnalyticsSink>,
    grid: GridSpec,
    capacity: Cell<usize>,
    visible: Cell<bool>,
    loading: Cell<bool>,
    paused: Cell<bool>,
}

/// Handle to the hotseat prediction subsystem.
#[derive(Clone)]
pub struct PredictionController {
    inner: Rc<ControllerInner>,
}

impl PredictionController {
    pub fn new(
        renderer: Rc<dyn RowRenderer>,
        store: Rc<dyn ItemStore>,
        analytics: Rc<dyn AnalyticsSink>,
        grid: GridSpec,
        capacity: usize,
    ) -> Self {
        Self {
            inner: Rc::new(ControllerInner {
                row: Rc::new(RefCell::new(SlotRow::new())),
                gate: VisibilityGate::new(),
                overlay: DragOverlay::new(),
                coordinator: AnimationCoordinator::new(),
                renderer,
                store,
                analytics,
                grid,
                capacity: Cell::new(capacity),
                visible: Cell::new(false),
                loading: Cell::new(false),
                paused: Cell::new(false),
            }),
        }
    }

    /// The row's occupant ledger. Exposed for harnesses and the embedding
    /// launcher shell; reconciliation assumes exclusive mutation rights
    /// while a pass runs.
    pub fn row(&self) -> Rc<RefCell<SlotRow>> {
        Rc::clone(&self.inner.row)
    }

    /// Config switch applying prediction updates even while visible.
    pub fn set_always_apply(&self, always: bool) {
        self.inner.gate.set_always_apply(always);
    }

    pub fn has_predictions(&self) -> bool {
        self.inner.gate.has_predictions()
    }

    /// Layout reconfiguration notification. The new capacity takes effect
    /// on the next reconciliation pass.
    pub fn on_capacity_changed(&self, capacity: usize) {
        self.inner.capacity.set(capacity);
    }

    /// Workspace loading-state notification; a loading workspace bypasses
    /// the visibility gate.
    pub fn set_workspace_loading(&self, loading: bool) {
        self.inner.loading.set(loading);
    }

    /// Pauses or resumes row updates. Resuming runs a catch-up pass.
    pub fn pause_updates(&self, paused: bool) {
        self.inner.paused.set(paused);
        if !paused {
            self.fill_gaps(false, None);
        }
    }

    /// Entry point for the prediction source: a new ranking arrived.
    pub fn on_prediction_set_changed(&self, set: PredictionSet) {
        let inner = &self.inner;
        let ctx = GateContext {
            loading: inner.loading.get(),
            visible: inner.visible.get(),
            under_populated: inner.row.borrow().occupant_count() < inner.capacity.get(),
        };
        if let Some(set) = inner.gate.submit(set, ctx) {
            self.apply_predictions(set);
        }
    }

    /// Aggregated row visibility changed. A visible-to-hidden transition
    /// releases a parked ranking.
    pub fn on_visibility_changed(&self, visible: bool) {
        self.inner.visible.set(visible);
        if let Some(set) = self.inner.gate.on_visibility_changed(visible) {
            self.apply_predictions(set);
        }
    }

    fn apply_predictions(&self, set: PredictionSet) {
        tracing::debug!(len = set.len(), "applying prediction ranking");
        let restore = set.is_empty();
        self.inner.gate.mark_applied(set);
        if restore {
            self.inner.store.restore_backup();
        }
        self.fill_gaps(false, None);
    }

    /// Drag listener hook: a drag started somewhere in the launcher.
    pub fn on_drag_start(&self, session: DragSession) {
        let inner = &self.inner;
        inner.overlay.begin(
            session,
            &inner.row,
            &inner.coordinator,
            &inner.renderer,
            inner.grid,
            inner.capacity.get(),
        );
    }

    /// Drag listener hook: the drag ended, successfully or not. Refills the
    /// row with animation; the refill pass sweeps the ghost outlines away
    /// once its insert animations settle.
    pub fn on_drag_end(&self) {
        self.inner.overlay.end();
        self.fill_gaps(true, None);
    }

    /// Pins a predicted item into place: persists it through the store,
    /// retags its occupant so reconciliation stops touching it, and plays
    /// the pin pulse. The occupant is looked up by the item's last-known
    /// rank; a rank no longer holding a prediction is a quiet no-op.
    pub fn pin(&self, info: &ItemInfo) {
        let inner = &self.inner;
        let target = {
            let row = inner.row.borrow();
            row.enabled_at(info.rank).and_then(|(id, occupant)| {
                (occupant.container() == Container::Prediction)
                    .then(|| (id, occupant.item().clone()))
            })
        };
        let Some((id, mut item)) = target else {
            tracing::debug!(rank = info.rank, "pin requested for a slot without a prediction");
            return;
        };
        item.container = Container::Pinned;
        inner.store.add_pinned(&item);
        if let Err(err) = inner.row.borrow_mut().rebind(id, item.clone()) {
            tracing::debug!(%err, "pin target vanished mid-operation");
            return;
        }
        inner.renderer.occupant_rebound(id, &item);
        let renderer = Rc::clone(&inner.renderer);
        inner
            .renderer
            .play_scale(id, 1.0, 0.8)
            .on_complete(move || {
                renderer.play_scale(id, 0.8, 1.0);
            });
        inner
            .analytics
            .log(AnalyticsEvent::PredictionPinned { item });
    }

    /// Reports rank context for a launched item. Read-only.
    pub fn record_launch(&self, item: &ItemInfo, trace: TraceId) {
        let inner = &self.inner;
        tracing::debug!(
            package = %item.identity.package,
            user = item.identity.user.raw(),
            container = ?item.container,
            %trace,
            "app launch"
        );
        let ranking = {
            let row = inner.row.borrow();
            launch_ranking(item, &inner.gate.current(), &row)
        };
        if let Some(ranking) = ranking {
            inner.analytics.log(AnalyticsEvent::Ranked { trace, ranking });
        }
    }

    /// Converges the row to the current ranking.
    ///
    /// No-op while updates are paused or a drag overlay is active. If a
    /// removal batch is mid-animation the pass is parked (latest request
    /// wins) and re-runs from scratch once the batch settles.
    pub fn fill_gaps(&self, animate: bool, on_complete: Option<RefillCallback>) {
        let inner = &self.inner;
        if inner.paused.get() || inner.overlay.is_active() {
            tracing::trace!(
                paused = inner.paused.get(),
                drag = inner.overlay.is_active(),
                "refill suppressed"
            );
            return;
        }
        if inner.coordinator.removal_in_flight() {
            tracing::trace!("refill parked behind removal batch");
            let this = self.clone();
            inner.coordinator.defer(move || {
                this.fill_gaps(animate, on_complete);
            });
            return;
        }

        let capacity = inner.capacity.get();
        let ops = {
            let row = inner.row.borrow();
            reconcile(&row, &inner.gate.current(), capacity, inner.grid)
        };
        tracing::trace!(
            updates = ops.updates.len(),
            inserts = ops.inserts.len(),
            removals = ops.removals.len(),
            capacity,
            "refill pass"
        );

        for (id, item) in ops.updates {
            match inner.row.borrow_mut().rebind(id, item.clone()) {
                Ok(()) => inner.renderer.occupant_rebound(id, &item),
                Err(err) => tracing::trace!(%err, "update target already resolved"),
            }
        }
        for id in ops.removals {
            match inner.row.borrow_mut().detach(id) {
                Ok(_) => inner.renderer.occupant_removed(id),
                Err(err) => tracing::trace!(%err, "removal target already resolved"),
            }
        }

        let mut entrances: Vec<CompletionSignal> = Vec::new();
        for item in ops.inserts {
            let id = inner.row.borrow_mut().attach(item.clone());
            inner.renderer.occupant_added(id, &item);
            if animate {
                entrances.push(inner.renderer.play_scale(id, 0.2, 1.0));
            }
        }

        // Ghosts never outlive a completed pass; sweep them with the
        // entrance animations so outlines linger exactly as long as the
        // cells they stand in for stay empty.
        let this = self.clone();
        let finish = move || {
            this.inner.overlay.discard_ghosts(&this.inner.renderer);
            if let Some(on_complete) = on_complete {
                on_complete();
            }
        };
        if animate {
            join_signals(&entrances).on_complete(finish);
        } else {
            finish();
        }
    }
}

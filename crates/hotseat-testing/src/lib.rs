//! Deterministic collaborator doubles for the hotseat subsystem.
//!
//! The renderer double records every call it receives and hands out
//! manually driven completion signals, so tests control exactly when an
//! animation "finishes". The store and analytics doubles are plain
//! recorders.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use hotseat_core::animation::CompletionSignal;
use hotseat_core::drag::OutlineGhost;
use hotseat_core::host::{AnalyticsSink, ItemStore, RowRenderer};
use hotseat_core::item::{ItemIdentity, ItemInfo, PredictionSet, UserId};
use hotseat_core::row::OccupantId;
use hotseat_core::telemetry::AnalyticsEvent;
use hotseat_core::PredictionController;
use hotseat_grid::{GridSpec, RowOrientation};

/// Everything a renderer gets told, in call order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderOp {
    Added(OccupantId),
    Rebound(OccupantId),
    Removed(OccupantId),
    Scale(OccupantId),
    Ghost(OutlineGhost),
    GhostsCleared,
    Haptic,
}

/// Recording [`RowRenderer`] double with manually completed tweens.
#[derive(Default)]
pub struct TestRenderer {
    ops: RefCell<Vec<RenderOp>>,
    tweens: RefCell<Vec<(OccupantId, f32, f32, CompletionSignal)>>,
    /// When set, `play_scale` returns already-complete signals.
    instant: Cell<bool>,
}

impl TestRenderer {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Completes tweens as soon as they start, collapsing animation time.
    pub fn new_instant() -> Rc<Self> {
        let renderer = Self::default();
        renderer.instant.set(true);
        Rc::new(renderer)
    }

    pub fn ops(&self) -> Vec<RenderOp> {
        self.ops.borrow().clone()
    }

    pub fn clear_ops(&self) {
        self.ops.borrow_mut().clear();
    }

    pub fn op_count(&self) -> usize {
        self.ops.borrow().len()
    }

    /// Signals for tweens still incomplete, oldest first.
    pub fn pending_tweens(&self) -> Vec<CompletionSignal> {
        self.tweens
            .borrow()
            .iter()
            .filter(|(_, _, _, signal)| !signal.is_complete())
            .map(|(_, _, _, signal)| signal.clone())
            .collect()
    }

    /// Completes every outstanding tween.
    pub fn finish_tweens(&self) {
        for signal in self.pending_tweens() {
            signal.complete();
        }
    }

    pub fn added_ids(&self) -> Vec<OccupantId> {
        self.ops
            .borrow()
            .iter()
            .filter_map(|op| match op {
                RenderOp::Added(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn removed_ids(&self) -> Vec<OccupantId> {
        self.ops
            .borrow()
            .iter()
            .filter_map(|op| match op {
                RenderOp::Removed(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn ghost_count(&self) -> usize {
        self.ops
            .borrow()
            .iter()
            .filter(|op| matches!(op, RenderOp::Ghost(_)))
            .count()
    }
}

impl RowRenderer for TestRenderer {
    fn occupant_added(&self, id: OccupantId, _item: &ItemInfo) {
        self.ops.borrow_mut().push(RenderOp::Added(id));
    }

    fn occupant_rebound(&self, id: OccupantId, _item: &ItemInfo) {
        self.ops.borrow_mut().push(RenderOp::Rebound(id));
    }

    fn occupant_removed(&self, id: OccupantId) {
        self.ops.borrow_mut().push(RenderOp::Removed(id));
    }

    fn play_scale(&self, id: OccupantId, from: f32, to: f32) -> CompletionSignal {
        self.ops.borrow_mut().push(RenderOp::Scale(id));
        let signal = if self.instant.get() {
            CompletionSignal::ready()
        } else {
            CompletionSignal::new()
        };
        self.tweens.borrow_mut().push((id, from, to, signal.clone()));
        signal
    }

    fn show_ghost(&self, ghost: &OutlineGhost) {
        self.ops.borrow_mut().push(RenderOp::Ghost(*ghost));
    }

    fn clear_ghosts(&self) {
        self.ops.borrow_mut().push(RenderOp::GhostsCleared);
    }

    fn haptic_feedback(&self) {
        self.ops.borrow_mut().push(RenderOp::Haptic);
    }
}

/// Recording [`ItemStore`] double.
#[derive(Default)]
pub struct TestStore {
    pinned: RefCell<Vec<ItemInfo>>,
    restores: Cell<usize>,
}

impl TestStore {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn pinned(&self) -> Vec<ItemInfo> {
        self.pinned.borrow().clone()
    }

    pub fn restore_count(&self) -> usize {
        self.restores.get()
    }
}

impl ItemStore for TestStore {
    fn add_pinned(&self, item: &ItemInfo) {
        self.pinned.borrow_mut().push(item.clone());
    }

    fn restore_backup(&self) {
        self.restores.set(self.restores.get() + 1);
    }
}

/// Recording [`AnalyticsSink`] double.
#[derive(Default)]
pub struct TestAnalytics {
    events: RefCell<Vec<AnalyticsEvent>>,
}

impl TestAnalytics {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.borrow().clone()
    }
}

impl AnalyticsSink for TestAnalytics {
    fn log(&self, event: AnalyticsEvent) {
        self.events.borrow_mut().push(event);
    }
}

/// A controller wired to fresh doubles, plus the doubles themselves.
pub struct ControllerFixture {
    pub controller: PredictionController,
    pub renderer: Rc<TestRenderer>,
    pub store: Rc<TestStore>,
    pub analytics: Rc<TestAnalytics>,
}

/// Builds a horizontal-row controller of the given capacity.
pub fn controller(capacity: usize) -> ControllerFixture {
    build_fixture(TestRenderer::new(), capacity)
}

/// Like [`controller`], but every tween completes the moment it starts.
pub fn instant_controller(capacity: usize) -> ControllerFixture {
    build_fixture(TestRenderer::new_instant(), capacity)
}

fn build_fixture(renderer: Rc<TestRenderer>, capacity: usize) -> ControllerFixture {
    let store = TestStore::new();
    let analytics = TestAnalytics::new();
    let controller = PredictionController::new(
        Rc::clone(&renderer) as Rc<dyn RowRenderer>,
        Rc::clone(&store) as Rc<dyn ItemStore>,
        Rc::clone(&analytics) as Rc<dyn AnalyticsSink>,
        GridSpec::new(RowOrientation::Horizontal),
        capacity,
    );
    ControllerFixture {
        controller,
        renderer,
        store,
        analytics,
    }
}

/// Shorthand for a prediction ranking over bare package names.
pub fn ranking(packages: &[&str]) -> PredictionSet {
    packages
        .iter()
        .map(|p| ItemInfo::predicted(ItemIdentity::new(*p, UserId::new(0))))
        .collect()
}

//! Deferred application of prediction updates.
//!
//! Swapping predictions under the user's eyes looks like flicker, so a new
//! ranking normally waits for the row to leave the screen. The exceptions
//! all amount to "nobody is looking or the row is wrong anyway": an
//! always-apply config, a loading workspace, an unchanged ranking, an
//! under-populated row, or a row that is already hidden. Only the newest
//! parked set survives; superseded submissions are dropped, never queued.

use std::cell::{Cell, Ref, RefCell};

use crate::item::PredictionSet;

/// Row conditions sampled at submission time.
#[derive(Clone, Copy, Debug, Default)]
pub struct GateContext {
    /// Workspace model is still loading; the row is not authoritative yet.
    pub loading: bool,
    /// The row is currently visible on screen.
    pub visible: bool,
    /// Fewer occupants than capacity; gaps are showing.
    pub under_populated: bool,
}

/// Gatekeeper between the prediction source and the reconciliation pass.
#[derive(Default)]
pub struct VisibilityGate {
    current: RefCell<PredictionSet>,
    pending: RefCell<Option<PredictionSet>>,
    always_apply: Cell<bool>,
}

impl VisibilityGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config switch forcing every submission through immediately.
    pub fn set_always_apply(&self, always: bool) {
        self.always_apply.set(always);
    }

    /// The ranking most recently applied to the row.
    pub fn current(&self) -> Ref<'_, PredictionSet> {
        self.current.borrow()
    }

    pub fn has_predictions(&self) -> bool {
        !self.current.borrow().is_empty()
    }

    /// Records `set` as applied. The caller runs the reconciliation pass.
    pub fn mark_applied(&self, set: PredictionSet) {
        *self.current.borrow_mut() = set;
    }

    /// Submits a new ranking. Returns the set when it should be applied
    /// right now; otherwise parks it for the next visible-to-hidden
    /// transition, replacing any previously parked set.
    pub fn submit(&self, set: PredictionSet, ctx: GateContext) -> Option<PredictionSet> {
        let apply_now = self.always_apply.get()
            || ctx.loading
            || set.same_ranking(&self.current.borrow())
            || ctx.under_populated
            || !ctx.visible;
        if apply_now {
            *self.pending.borrow_mut() = None;
            return Some(set);
        }
        let superseded = self.pending.borrow_mut().replace(set).is_some();
        tracing::debug!(superseded, "ranking parked until the row hides");
        None
    }

    /// Visibility transition hook. A visible-to-hidden edge releases the
    /// parked set, if any.
    pub fn on_visibility_changed(&self, visible: bool) -> Option<PredictionSet> {
        if visible {
            return None;
        }
        self.pending.borrow_mut().take()
    }

    #[cfg(test)]
    fn has_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }
}

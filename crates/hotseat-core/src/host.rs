//! Collaborator seams consumed by the controller.
//!
//! Rendering, persistence, and analytics are external concerns; the
//! subsystem only ever talks to them through these traits. All of them are
//! called on the UI thread.

use crate::animation::CompletionSignal;
use crate::drag::OutlineGhost;
use crate::item::ItemInfo;
use crate::row::OccupantId;
use crate::telemetry::AnalyticsEvent;

/// Rendering and animation collaborator for the row's occupants.
///
/// `play_scale` starts a tween and returns the signal the renderer will
/// complete when the tween finishes (or is cut short). Implementations that
/// do not animate return an already-complete signal.
pub trait RowRenderer {
    /// A fresh occupant was bound for `item`.
    fn occupant_added(&self, id: OccupantId, item: &ItemInfo);

    /// An existing occupant was rebound in place to `item`.
    fn occupant_rebound(&self, id: OccupantId, item: &ItemInfo);

    /// An occupant was unbound from the row.
    fn occupant_removed(&self, id: OccupantId);

    /// Scales an occupant's visual between the given factors.
    fn play_scale(&self, id: OccupantId, from: f32, to: f32) -> CompletionSignal;

    /// Draws a placeholder outline at a detached occupant's former cell.
    fn show_ghost(&self, ghost: &OutlineGhost);

    /// Removes every outline previously shown.
    fn clear_ghosts(&self);

    /// Fires haptic feedback for a drag pickup.
    fn haptic_feedback(&self);
}

/// Write-through store for items the user pinned into the row.
pub trait ItemStore {
    /// Persists `item` as a pinned hotseat member at its current cell.
    fn add_pinned(&self, item: &ItemInfo);

    /// Restores the pre-prediction hotseat layout; invoked when an empty
    /// ranking arrives.
    fn restore_backup(&self);
}

/// Event sink for the launcher's analytics pipeline.
pub trait AnalyticsSink {
    fn log(&self, event: AnalyticsEvent);
}

//! Convergence pass aligning slot occupancy to the latest ranking.
//!
//! The pass walks ranks left to right with a separate prediction cursor.
//! Foreign slots are holes in the rank sequence: they are skipped without
//! consuming a prediction, so a pinned item in the middle of the row shifts
//! the remaining predictions right instead of being fought over. The pass
//! computes operations only; applying them (and animating them) is the
//! controller's job.

use hotseat_grid::GridSpec;

use crate::item::{ItemInfo, PredictionSet};
use crate::row::{OccupantId, SlotRow, SlotState};

/// The minimal operation set converging a row to a prediction ranking.
#[derive(Debug, Default)]
pub struct RowOps {
    /// Existing enabled prediction occupants rebound to a new item.
    pub updates: Vec<(OccupantId, ItemInfo)>,
    /// Items that need a fresh occupant. Order is rank order, but callers
    /// are free to batch-animate insertions in any order.
    pub inserts: Vec<ItemInfo>,
    /// Stale prediction occupants to unbind.
    pub removals: Vec<OccupantId>,
}

impl RowOps {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.inserts.is_empty() && self.removals.is_empty()
    }
}

/// Computes the operations converging `row` to `predictions`.
///
/// The prediction order is authoritative: occupants are never reordered to
/// chase new rank assignments, they are rebound in place or replaced. Slots
/// whose occupant is mid-removal count as empty, so a pending removal never
/// blocks the insert that supersedes it. Predictions past the row's capacity
/// are dropped; prediction occupants past the capacity (after a shrink) are
/// removed.
pub fn reconcile(
    row: &SlotRow,
    predictions: &PredictionSet,
    capacity: usize,
    grid: GridSpec,
) -> RowOps {
    let mut ops = RowOps::default();
    let mut cursor = 0usize;

    for (rank, state) in row.scan(capacity).into_iter().enumerate() {
        if state == SlotState::Foreign {
            // Pinned/manual occupants are holes in the rank walk; the
            // cursor does not advance past them.
            continue;
        }
        match predictions.get(cursor) {
            None => {
                // Ranking shrank; anything still predicted here is stale.
                if let SlotState::Predicted(id) = state {
                    ops.removals.push(id);
                }
            }
            Some(template) => {
                cursor += 1;
                let mut item = template.clone();
                item.rank = rank;
                item.cell = grid.cell_of(rank, capacity);
                item.screen_id = rank;
                match state {
                    SlotState::Predicted(id) => {
                        // Rebinding to a structurally identical item is a
                        // no-op; suppressing it keeps repeated passes quiet.
                        let unchanged = row.occupant(id).is_some_and(|o| *o.item() == item);
                        if !unchanged {
                            ops.updates.push((id, item));
                        }
                    }
                    _ => ops.inserts.push(item),
                }
            }
        }
    }

    // A capacity shrink leaves prediction occupants stranded past the end of
    // the row; they converge to removal on this same pass.
    ops.removals.extend(row.predictions_beyond(capacity));
    ops
}

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod tests;

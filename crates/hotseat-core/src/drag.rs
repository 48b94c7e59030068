//! Drag-interaction overlay.
//!
//! While the user drags an item, predicted occupants leave the row so every
//! slot reads as a drop target, and outline ghosts mark where they stood.
//! The ghosts are records, not visuals; the renderer draws them. They live
//! strictly between drag start and the end-of-drag refill, never across
//! reconciliation passes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use hotseat_grid::{CellCoord, GridSpec};

use crate::animation::{AnimationCoordinator, CompletionSignal};
use crate::host::RowRenderer;
use crate::row::{OccupantId, SlotRow};

/// Describes a drag delivered by the drag controller. Drags can originate
/// anywhere (workspace, folder, this row); `origin` is the occupant being
/// dragged when it came from this row.
#[derive(Clone, Copy, Debug, Default)]
pub struct DragSession {
    pub origin: Option<OccupantId>,
}

impl DragSession {
    /// A drag that started outside this row.
    pub fn external() -> Self {
        Self::default()
    }

    /// A drag lifting one of this row's own occupants.
    pub fn from_occupant(id: OccupantId) -> Self {
        Self { origin: Some(id) }
    }
}

/// Ephemeral placeholder marking a detached occupant's former position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutlineGhost {
    pub rank: usize,
    pub cell: CellCoord,
    pub source: OccupantId,
}

/// Overlay state machine for the duration of a drag.
#[derive(Default)]
pub struct DragOverlay {
    active: Cell<bool>,
    ghosts: RefCell<Vec<OutlineGhost>>,
}

impl DragOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// True between drag start and drag end. Reconciliation is suppressed
    /// while the overlay is active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    #[inline]
    pub fn ghost_count(&self) -> usize {
        self.ghosts.borrow().len()
    }

    /// Detaches predicted occupants for the drag.
    ///
    /// The dragged occupant itself (when the drag sourced from this row)
    /// leaves immediately without a ghost; every other enabled prediction
    /// is disabled, ghosted at its current cell, and animated out through
    /// a removal batch.
    pub fn begin(
        &self,
        session: DragSession,
        row: &Rc<RefCell<SlotRow>>,
        coordinator: &AnimationCoordinator,
        renderer: &Rc<dyn RowRenderer>,
        grid: GridSpec,
        capacity: usize,
    ) {
        // Suppress refills before any batch settles, or a parked reconcile
        // run would repopulate the row mid-drag.
        self.active.set(true);
        self.discard_ghosts(renderer);

        let predicted = row.borrow().enabled_predictions();
        let mut exits: Vec<(OccupantId, CompletionSignal)> = Vec::new();
        let mut ghosts = self.ghosts.borrow_mut();
        for id in predicted {
            if session.origin == Some(id) {
                let removed = row.borrow_mut().detach(id).is_ok();
                if removed {
                    renderer.occupant_removed(id);
                    renderer.haptic_feedback();
                }
                continue;
            }
            let rank = match row.borrow().occupant(id) {
                Some(occupant) => occupant.item().rank,
                None => continue,
            };
            ghosts.push(OutlineGhost {
                rank,
                cell: grid.cell_of(rank, capacity),
                source: id,
            });
            if row.borrow_mut().disable(id).is_err() {
                ghosts.pop();
                continue;
            }
            exits.push((id, renderer.play_scale(id, 1.0, 0.0)));
        }
        for ghost in ghosts.iter() {
            renderer.show_ghost(ghost);
        }
        drop(ghosts);

        let renderer_for_settle = Rc::clone(renderer);
        coordinator.begin_removals(row, exits, move |detached| {
            for id in detached {
                renderer_for_settle.occupant_removed(*id);
            }
        });
    }

    /// Leaves the overlay state; the controller refills the row afterwards
    /// and clears the ghosts once the refill settles.
    pub fn end(&self) {
        self.active.set(false);
    }

    /// Drops all ghost records and tells the renderer to erase them.
    pub fn discard_ghosts(&self, renderer: &Rc<dyn RowRenderer>) {
        if self.ghosts.borrow().is_empty() {
            return;
        }
        self.ghosts.borrow_mut().clear();
        renderer.clear_ghosts();
    }
}

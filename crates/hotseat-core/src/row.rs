//! Occupant ledger for the slot row.
//!
//! [`SlotRow`] tracks which occupant is bound where. Occupants are views of
//! the current best binding, never owners of items: a prediction update can
//! rebind them, a pin retags them, a removal animation disables them until
//! the renderer reports the exit finished. A disabled occupant keeps its
//! record (the animation still references it) but no longer counts as
//! occupying its slot, so a pending removal never blocks a fresh insert at
//! the same rank.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;

use crate::collections::map::{HashMap, HashSet};
use crate::item::{Container, ItemInfo};

/// Identifier for a bound occupant. Stable for the occupant's lifetime,
/// never reused within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OccupantId(u64);

static NEXT_OCCUPANT_ID: AtomicU64 = AtomicU64::new(1);

fn next_occupant_id() -> OccupantId {
    OccupantId(NEXT_OCCUPANT_ID.fetch_add(1, Ordering::Relaxed))
}

/// Errors from occupant bookkeeping. None of these are fatal: callers
/// treat a missing occupant as an already-resolved reference and move on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowError {
    OccupantMissing { id: OccupantId },
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowError::OccupantMissing { id } => write!(f, "occupant {:?} missing", id),
        }
    }
}

impl std::error::Error for RowError {}

/// A bound visual representative of an item within the row.
#[derive(Clone, Debug, PartialEq)]
pub struct Occupant {
    item: ItemInfo,
    enabled: bool,
}

impl Occupant {
    #[inline]
    pub fn item(&self) -> &ItemInfo {
        &self.item
    }

    /// False while the occupant's removal animation is in flight.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn container(&self) -> Container {
        self.item.container
    }
}

/// Classification of one slot produced by a scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotState {
    /// Nothing occupies the slot (a disabled occupant may still be
    /// animating out of it).
    Empty,
    /// An enabled prediction occupies the slot.
    Predicted(OccupantId),
    /// A non-prediction occupies the slot; reconciliation must skip it.
    Foreign,
}

/// The row's occupant bindings, keyed by occupant id in insertion order.
#[derive(Default)]
pub struct SlotRow {
    occupants: IndexMap<OccupantId, Occupant, ahash::RandomState>,
}

impl fmt::Debug for SlotRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotRow")
            .field("occupants", &self.occupants.len())
            .finish()
    }
}

impl SlotRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a fresh occupant for `item`. The occupant starts enabled.
    pub fn attach(&mut self, item: ItemInfo) -> OccupantId {
        let id = next_occupant_id();
        self.occupants.insert(
            id,
            Occupant {
                item,
                enabled: true,
            },
        );
        id
    }

    /// Rebinds an existing occupant to a new item in place.
    pub fn rebind(&mut self, id: OccupantId, item: ItemInfo) -> Result<(), RowError> {
        let occupant = self
            .occupants
            .get_mut(&id)
            .ok_or(RowError::OccupantMissing { id })?;
        occupant.item = item;
        Ok(())
    }

    /// Marks an occupant as mid-removal. Its slot scans as empty from here
    /// on; the record survives until [`SlotRow::detach`].
    pub fn disable(&mut self, id: OccupantId) -> Result<(), RowError> {
        let occupant = self
            .occupants
            .get_mut(&id)
            .ok_or(RowError::OccupantMissing { id })?;
        occupant.enabled = false;
        Ok(())
    }

    /// Unbinds an occupant. Missing ids report `OccupantMissing` so callers
    /// can tell an already-resolved reference from a live one.
    pub fn detach(&mut self, id: OccupantId) -> Result<Occupant, RowError> {
        self.occupants
            .shift_remove(&id)
            .ok_or(RowError::OccupantMissing { id })
    }

    #[inline]
    pub fn contains(&self, id: OccupantId) -> bool {
        self.occupants.contains_key(&id)
    }

    #[inline]
    pub fn occupant(&self, id: OccupantId) -> Option<&Occupant> {
        self.occupants.get(&id)
    }

    /// Number of bound occupants, disabled ones included.
    #[inline]
    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (OccupantId, &Occupant)> {
        self.occupants.iter().map(|(id, occupant)| (*id, occupant))
    }

    /// The enabled occupant claiming `rank`, if any.
    pub fn enabled_at(&self, rank: usize) -> Option<(OccupantId, &Occupant)> {
        self.occupants
            .iter()
            .find(|(_, o)| o.enabled && o.item.rank == rank)
            .map(|(id, o)| (*id, o))
    }

    /// Ids of enabled prediction occupants, in binding order.
    pub fn enabled_predictions(&self) -> Vec<OccupantId> {
        self.occupants
            .iter()
            .filter(|(_, o)| o.enabled && o.item.container == Container::Prediction)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Enabled prediction occupants whose rank fell outside `capacity`
    /// (the row shrank under them).
    pub fn predictions_beyond(&self, capacity: usize) -> Vec<OccupantId> {
        self.occupants
            .iter()
            .filter(|(_, o)| {
                o.enabled && o.item.container == Container::Prediction && o.item.rank >= capacity
            })
            .map(|(id, _)| *id)
            .collect()
    }

    /// Classifies each slot in `0..capacity`.
    ///
    /// An enabled occupant claims its slot by container tag. A slot whose
    /// only occupants are disabled predictions scans as empty. A disabled
    /// occupant carrying a non-prediction tag is inconsistent state; the
    /// slot is reported foreign so nothing overwrites it.
    pub fn scan(&self, capacity: usize) -> Vec<SlotState> {
        let mut enabled: HashMap<usize, (OccupantId, Container)> = HashMap::new();
        let mut disabled_foreign: HashSet<usize> = HashSet::new();
        for (id, occupant) in &self.occupants {
            let rank = occupant.item.rank;
            if rank >= capacity {
                continue;
            }
            if occupant.enabled {
                enabled.entry(rank).or_insert((*id, occupant.item.container));
            } else if occupant.item.container != Container::Prediction {
                disabled_foreign.insert(rank);
            }
        }
        (0..capacity)
            .map(|rank| match enabled.get(&rank) {
                Some((id, Container::Prediction)) => SlotState::Predicted(*id),
                Some(_) => SlotState::Foreign,
                None if disabled_foreign.contains(&rank) => SlotState::Foreign,
                None => SlotState::Empty,
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/row_tests.rs"]
mod tests;

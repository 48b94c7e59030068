//! Launch-time rank reporting.
//!
//! Read-only over the current ranking and the row; computing a report never
//! mutates subsystem state.

use std::fmt;

use crate::item::{Container, ItemInfo, PredictionSet};
use crate::row::SlotRow;

/// Correlation id carried through from the launch event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TraceId(pub u64);

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Rank context for a launched item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchRanking {
    /// Highest-index match of the launched target in the current ranking.
    pub rank: usize,
    /// Bitmask of screen ids currently holding a bound prediction.
    pub cardinality: u32,
    /// The rank again, present only when the launched item itself was a
    /// prediction (container tagging in the report).
    pub predicted_index: Option<usize>,
}

/// Events this subsystem reports to the analytics pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnalyticsEvent {
    /// A predicted item was pinned into place.
    PredictionPinned { item: ItemInfo },
    /// An item was launched while predictions were showing.
    Ranked {
        trace: TraceId,
        ranking: LaunchRanking,
    },
}

/// Computes the launch ranking for `item`, or `None` when the launched
/// target does not appear in the current ranking.
///
/// The match walks the ranking from the highest index down and compares
/// (package, user) targets, ignoring discriminators; the cardinality mask
/// ORs `1 << screen_id` over every bound prediction occupant.
pub fn launch_ranking(
    item: &ItemInfo,
    predictions: &PredictionSet,
    row: &SlotRow,
) -> Option<LaunchRanking> {
    let rank = predictions
        .iter()
        .rposition(|candidate| candidate.identity.same_target(&item.identity))?;

    let mut cardinality = 0u32;
    for (_, occupant) in row.iter() {
        let screen_id = occupant.item().screen_id;
        if occupant.is_enabled() && occupant.container() == Container::Prediction && screen_id < 32
        {
            cardinality |= 1u32 << screen_id;
        }
    }

    let predicted_index = (item.container == Container::Prediction).then_some(rank);
    Some(LaunchRanking {
        rank,
        cardinality,
        predicted_index,
    })
}

#[cfg(test)]
#[path = "tests/telemetry_tests.rs"]
mod tests;

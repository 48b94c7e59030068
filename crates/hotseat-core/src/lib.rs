//! Prediction reconciliation for the hotseat row.
//!
//! Reconciles an externally supplied ranking of predicted items against a
//! fixed-capacity slotted row: empty slots fill with predictions, pinned
//! items stay untouched, and predictions swap out as the ranking updates or
//! the user drags items around. Ranking itself, persistence, and rendering
//! live behind the collaborator seams in [`host`].
//!
//! Single-threaded cooperative model: every mutation of the row, its
//! occupants, and the overlay state happens on one logical UI thread, and
//! the only suspension points are animation-completion callbacks.

pub mod animation;
pub mod collections;
pub mod controller;
pub mod drag;
pub mod host;
pub mod item;
pub mod reconcile;
pub mod row;
pub mod telemetry;
pub mod visibility;

pub use animation::{join_signals, AnimationCoordinator, CompletionSignal};
pub use controller::PredictionController;
pub use drag::{DragOverlay, DragSession, OutlineGhost};
pub use host::{AnalyticsSink, ItemStore, RowRenderer};
pub use item::{Container, ItemIdentity, ItemInfo, PredictionSet, UserId};
pub use reconcile::{reconcile, RowOps};
pub use row::{Occupant, OccupantId, RowError, SlotRow, SlotState};
pub use telemetry::{launch_ranking, AnalyticsEvent, LaunchRanking, TraceId};
pub use visibility::{GateContext, VisibilityGate};

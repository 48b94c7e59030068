//! Item model for the hotseat row.
//!
//! Predicted items are fresh value objects produced on every prediction
//! update; pinned items persist through the external item store. Identity is
//! what ties the two worlds together, so equality here is always structural.

use hotseat_grid::CellCoord;

/// Profile the item belongs to (personal, work, ...).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub u32);

impl UserId {
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Opaque key identifying the launchable target behind an item.
///
/// Two items refer to the same target exactly when their identities compare
/// equal; `tag` carries an optional extra discriminator (for example a
/// shortcut id within the package).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemIdentity {
    pub package: String,
    pub user: UserId,
    pub tag: Option<String>,
}

impl ItemIdentity {
    pub fn new(package: impl Into<String>, user: UserId) -> Self {
        Self {
            package: package.into(),
            user,
            tag: None,
        }
    }

    pub fn with_tag(package: impl Into<String>, user: UserId, tag: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            user,
            tag: Some(tag.into()),
        }
    }

    /// Target match used by launch ranking: package and user, ignoring the
    /// discriminator.
    pub fn same_target(&self, other: &ItemIdentity) -> bool {
        self.package == other.package && self.user == other.user
    }
}

/// Where an item currently lives. Set at bind time; occupants are told apart
/// by this tag, never by inspecting their rendered representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Container {
    /// Filled into the row by reconciliation; replaced freely.
    Prediction,
    /// Pinned into the row by the user; never touched by reconciliation.
    Pinned,
    /// Anything else occupying a cell (widget, folder, foreign drop).
    Workspace,
}

/// A predicted or pinned entity bound (or bindable) to a slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemInfo {
    pub identity: ItemIdentity,
    pub container: Container,
    pub rank: usize,
    pub cell: CellCoord,
    pub screen_id: usize,
}

impl ItemInfo {
    /// A prediction fresh off the ranker, not yet assigned a slot.
    pub fn predicted(identity: ItemIdentity) -> Self {
        Self {
            identity,
            container: Container::Prediction,
            rank: 0,
            cell: CellCoord::default(),
            screen_id: 0,
        }
    }
}

/// An ordered ranking of predicted items; insertion order is rank order.
#[derive(Clone, Debug, Default)]
pub struct PredictionSet {
    items: Vec<ItemInfo>,
}

impl PredictionSet {
    pub fn new(items: Vec<ItemInfo>) -> Self {
        Self { items }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&ItemInfo> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ItemInfo> + ExactSizeIterator {
        self.items.iter()
    }

    /// Structural equality of the ordered identity sequence.
    ///
    /// This is the change-suppression signal: two sets rank the same when
    /// they name the same identities in the same order, regardless of which
    /// allocation the item objects came from.
    pub fn same_ranking(&self, other: &PredictionSet) -> bool {
        self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .zip(other.items.iter())
                .all(|(a, b)| a.identity == b.identity)
    }
}

impl FromIterator<ItemInfo> for PredictionSet {
    fn from_iter<I: IntoIterator<Item = ItemInfo>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

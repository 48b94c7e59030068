use super::*;
use crate::item::{ItemIdentity, UserId};

use hotseat_grid::CellCoord;

fn prediction(package: &str) -> ItemInfo {
    ItemInfo::predicted(ItemIdentity::new(package, UserId::new(0)))
}

fn bound(package: &str, rank: usize) -> ItemInfo {
    ItemInfo {
        identity: ItemIdentity::new(package, UserId::new(0)),
        container: Container::Prediction,
        rank,
        cell: CellCoord::new(rank as i32, 0),
        screen_id: rank,
    }
}

fn populated_row(packages: &[&str]) -> SlotRow {
    let mut row = SlotRow::new();
    for (rank, package) in packages.iter().enumerate() {
        row.attach(bound(package, rank));
    }
    row
}

#[test]
fn launch_of_a_ranked_item_reports_its_rank() {
    let predictions: PredictionSet = ["a", "b", "c"].iter().map(|p| prediction(p)).collect();
    let row = populated_row(&["a", "b", "c"]);

    let ranking = launch_ranking(&bound("b", 1), &predictions, &row).unwrap();
    assert_eq!(ranking.rank, 1);
    assert_eq!(ranking.cardinality, 0b111);
    assert_eq!(ranking.predicted_index, Some(1));
}

#[test]
fn launch_of_an_unranked_item_reports_nothing() {
    let predictions: PredictionSet = ["a", "b", "c"].iter().map(|p| prediction(p)).collect();
    let row = populated_row(&["a", "b", "c"]);

    assert!(launch_ranking(&bound("z", 0), &predictions, &row).is_none());
}

#[test]
fn highest_index_match_wins_for_duplicate_targets() {
    let predictions: PredictionSet = ["a", "b", "a"].iter().map(|p| prediction(p)).collect();
    let row = populated_row(&["a", "b", "a"]);

    let ranking = launch_ranking(&bound("a", 0), &predictions, &row).unwrap();
    assert_eq!(ranking.rank, 2);
}

#[test]
fn non_prediction_launch_still_reports_rank_without_index() {
    let predictions: PredictionSet = ["a", "b"].iter().map(|p| prediction(p)).collect();
    let row = populated_row(&["a", "b"]);

    let mut pinned = bound("a", 0);
    pinned.container = Container::Pinned;
    let ranking = launch_ranking(&pinned, &predictions, &row).unwrap();
    assert_eq!(ranking.rank, 0);
    assert_eq!(ranking.predicted_index, None);
}

#[test]
fn user_mismatch_is_not_a_target_match() {
    let predictions: PredictionSet =
        vec![ItemInfo::predicted(ItemIdentity::new("a", UserId::new(10)))]
            .into_iter()
            .collect();
    let row = SlotRow::new();

    assert!(launch_ranking(&bound("a", 0), &predictions, &row).is_none());
}

#[test]
fn cardinality_counts_only_enabled_predictions() {
    let predictions: PredictionSet = ["a", "b", "c"].iter().map(|p| prediction(p)).collect();
    let mut row = populated_row(&["a", "b", "c"]);
    let ids = row.enabled_predictions();
    row.disable(ids[1]).unwrap();
    let mut pinned = bound("d", 3);
    pinned.container = Container::Pinned;
    row.attach(pinned);

    let ranking = launch_ranking(&bound("a", 0), &predictions, &row).unwrap();
    assert_eq!(ranking.cardinality, 0b101);
}

use std::cell::RefCell;
use std::rc::Rc;

use hotseat_core::{
    AnimationCoordinator, Container, DragOverlay, DragSession, ItemIdentity, ItemInfo,
    OccupantId, OutlineGhost, RowRenderer, SlotRow, UserId,
};
use hotseat_grid::{CellCoord, GridSpec, RowOrientation};
use hotseat_testing::{RenderOp, TestRenderer};

fn populated_row(packages: &[&str]) -> (Rc<RefCell<SlotRow>>, Vec<OccupantId>) {
    let row = Rc::new(RefCell::new(SlotRow::new()));
    let mut ids = Vec::new();
    for (rank, package) in packages.iter().enumerate() {
        let mut item = ItemInfo::predicted(ItemIdentity::new(*package, UserId::new(0)));
        item.rank = rank;
        item.screen_id = rank;
        ids.push(row.borrow_mut().attach(item));
    }
    (row, ids)
}

fn overlay_parts() -> (
    DragOverlay,
    AnimationCoordinator,
    Rc<TestRenderer>,
    Rc<dyn RowRenderer>,
) {
    let overlay = DragOverlay::new();
    let coordinator = AnimationCoordinator::new();
    let renderer = TestRenderer::new();
    let dyn_renderer: Rc<dyn RowRenderer> = Rc::clone(&renderer) as Rc<dyn RowRenderer>;
    (overlay, coordinator, renderer, dyn_renderer)
}

fn grid() -> GridSpec {
    GridSpec::new(RowOrientation::Horizontal)
}

#[test]
fn external_drag_ghosts_every_prediction() {
    let (row, ids) = populated_row(&["a", "b", "c"]);
    let (overlay, coordinator, renderer, dyn_renderer) = overlay_parts();

    overlay.begin(DragSession::external(), &row, &coordinator, &dyn_renderer, grid(), 3);

    assert!(overlay.is_active());
    assert_eq!(overlay.ghost_count(), 3);
    assert_eq!(renderer.ghost_count(), 3);
    {
        let row = row.borrow();
        for id in &ids {
            assert!(!row.occupant(*id).unwrap().is_enabled());
        }
    }
    assert!(coordinator.removal_in_flight());
}

#[test]
fn dragged_occupant_leaves_without_a_ghost() {
    let (row, ids) = populated_row(&["a", "b", "c"]);
    let (overlay, coordinator, renderer, dyn_renderer) = overlay_parts();

    overlay.begin(
        DragSession::from_occupant(ids[1]),
        &row,
        &coordinator,
        &dyn_renderer,
        grid(),
        3,
    );

    assert_eq!(overlay.ghost_count(), 2);
    assert!(!row.borrow().contains(ids[1]), "dragged occupant detached at once");
    assert!(renderer.ops().contains(&RenderOp::Removed(ids[1])));
    assert!(renderer.ops().contains(&RenderOp::Haptic));
}

#[test]
fn ghost_records_carry_rank_and_cell() {
    let (row, ids) = populated_row(&["a", "b"]);
    let (overlay, coordinator, renderer, dyn_renderer) = overlay_parts();

    overlay.begin(DragSession::external(), &row, &coordinator, &dyn_renderer, grid(), 4);

    let ghosts: Vec<OutlineGhost> = renderer
        .ops()
        .into_iter()
        .filter_map(|op| match op {
            RenderOp::Ghost(ghost) => Some(ghost),
            _ => None,
        })
        .collect();
    assert_eq!(ghosts[0].rank, 0);
    assert_eq!(ghosts[0].cell, CellCoord::new(0, 0));
    assert_eq!(ghosts[0].source, ids[0]);
    assert_eq!(ghosts[1].rank, 1);
    assert_eq!(ghosts[1].cell, CellCoord::new(1, 0));
}

#[test]
fn exit_settle_detaches_and_reports_removals() {
    let (row, ids) = populated_row(&["a", "b"]);
    let (overlay, coordinator, renderer, dyn_renderer) = overlay_parts();

    overlay.begin(DragSession::external(), &row, &coordinator, &dyn_renderer, grid(), 2);
    renderer.finish_tweens();

    assert_eq!(row.borrow().occupant_count(), 0);
    assert_eq!(renderer.removed_ids(), ids);
    assert!(!coordinator.removal_in_flight());
    assert!(overlay.is_active(), "overlay outlives the exit animations");
}

#[test]
fn second_drag_start_discards_stale_ghosts_first() {
    let (row, _ids) = populated_row(&["a", "b"]);
    let (overlay, coordinator, renderer, dyn_renderer) = overlay_parts();

    overlay.begin(DragSession::external(), &row, &coordinator, &dyn_renderer, grid(), 2);
    renderer.finish_tweens();
    assert_eq!(overlay.ghost_count(), 2);

    overlay.begin(DragSession::external(), &row, &coordinator, &dyn_renderer, grid(), 2);
    assert!(renderer.ops().contains(&RenderOp::GhostsCleared));
    assert_eq!(overlay.ghost_count(), 0, "row was empty, nothing to ghost");
}

#[test]
fn discard_ghosts_is_idempotent_towards_the_renderer() {
    let (row, _ids) = populated_row(&["a"]);
    let (overlay, coordinator, renderer, dyn_renderer) = overlay_parts();

    overlay.begin(DragSession::external(), &row, &coordinator, &dyn_renderer, grid(), 1);
    overlay.end();

    overlay.discard_ghosts(&dyn_renderer);
    overlay.discard_ghosts(&dyn_renderer);
    let clears = renderer
        .ops()
        .iter()
        .filter(|op| matches!(op, RenderOp::GhostsCleared))
        .count();
    assert_eq!(clears, 1);
}

#[test]
fn foreign_occupants_are_not_ghosted() {
    let (row, _ids) = populated_row(&["a"]);
    let pinned_id = {
        let mut item = ItemInfo::predicted(ItemIdentity::new("pinned", UserId::new(0)));
        item.rank = 1;
        item.container = Container::Pinned;
        row.borrow_mut().attach(item)
    };
    let (overlay, coordinator, _renderer, dyn_renderer) = overlay_parts();

    overlay.begin(DragSession::external(), &row, &coordinator, &dyn_renderer, grid(), 2);

    assert_eq!(overlay.ghost_count(), 1);
    assert!(row.borrow().occupant(pinned_id).unwrap().is_enabled());
}

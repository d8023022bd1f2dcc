//! Property-based invariant tests for header layout, drag reorder and sort.
//!
//! 1. Visible columns are contiguous from 0 after any mutation sequence
//! 2. `find_index` stays within `[0, count]` and hits the covering column
//! 3. A completed drag is a permutation that moves only the dragged column
//! 4. A cancelled drag leaves order and offsets untouched
//! 5. Sort fields agree with the sort list after any click sequence
//! 6. Re-publishing the current sort never notifies

use colview::{ColumnId, ColumnSpec, ColumnView, SortDirection, ViewConfig, final_index};
use colview_harness::{ChangeRecorder, RecordingAnimator};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Resize(usize, f64),
    Toggle(usize),
    Move(usize, usize),
}

fn widths_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1u32..400, 1..8).prop_map(|ws| ws.into_iter().map(f64::from).collect())
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..8, 0u32..400).prop_map(|(i, w)| Op::Resize(i, f64::from(w))),
        (0usize..8).prop_map(Op::Toggle),
        (0usize..8, 0usize..8).prop_map(|(a, b)| Op::Move(a, b)),
    ]
}

fn build(widths: &[f64]) -> (ColumnView, Vec<ColumnId>) {
    let mut view = ColumnView::new(
        ViewConfig::default(),
        RecordingAnimator::applying().boxed(),
        None,
    );
    let ids = widths
        .iter()
        .enumerate()
        .map(|(i, w)| view.add_column(ColumnSpec::new(format!("c{i}"), *w)))
        .collect();
    (view, ids)
}

fn apply(view: &mut ColumnView, ids: &[ColumnId], op: &Op) {
    let n = ids.len();
    match *op {
        Op::Resize(i, w) => {
            view.resize_column(ids[i % n], w).unwrap();
        }
        Op::Toggle(i) => {
            let column = view.column(ids[i % n]).unwrap();
            view.set_column_visible(ids[i % n], !column.is_visible()).unwrap();
        }
        Op::Move(a, b) => view.move_column(a % n, b % n).unwrap(),
    }
}

fn assert_contiguous(view: &ColumnView) {
    let mut expected = 0.0;
    for column in view.columns() {
        if column.is_visible() {
            assert_eq!(column.left(), expected);
            assert_eq!(column.desired_left(), expected);
            expected += column.width();
        }
    }
    assert_eq!(view.total_width(), expected);
}

fn order(view: &ColumnView) -> Vec<ColumnId> {
    view.columns().iter().map(|c| c.id()).collect()
}

proptest! {
    #[test]
    fn layout_stays_contiguous(
        widths in widths_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..24),
    ) {
        let (mut view, ids) = build(&widths);
        assert_contiguous(&view);
        for op in &ops {
            apply(&mut view, &ids, op);
            assert_contiguous(&view);
        }
    }

    #[test]
    fn find_index_hits_the_covering_column(
        widths in widths_strategy(),
        offset in -50.0f64..3_000.0,
    ) {
        let (view, _) = build(&widths);
        let index = view.find_index(offset);
        prop_assert!(index <= view.len());
        if index < view.len() {
            let column = view.column_at(index).unwrap();
            prop_assert!(offset < 0.0 || (offset >= column.left() && offset < column.right()));
        } else {
            prop_assert!(offset >= view.total_width());
        }
    }

    #[test]
    fn completed_drag_moves_only_the_dragged_column(
        widths in widths_strategy(),
        pick in 0usize..8,
        grip in 0.0f64..1.0,
        deltas in prop::collection::vec(-500.0f64..500.0, 1..6),
    ) {
        let (mut view, ids) = build(&widths);
        let dragged = ids[pick % ids.len()];
        let before = order(&view);
        let grip = grip * view.column(dragged).unwrap().width();

        prop_assert!(view.start_drag(dragged, grip).unwrap());
        for delta in &deltas {
            view.drag(*delta).unwrap();
        }
        let session = *view.drag_session().unwrap();
        let (from, to) = view.complete_drag().unwrap().unwrap();

        prop_assert_eq!(from, before.iter().position(|id| *id == dragged).unwrap());
        prop_assert_eq!(to, final_index(session.dragging_index, session.destination_index).min(ids.len() - 1));
        prop_assert_eq!(view.index_of(dragged), Some(to));

        let mut expected = before.clone();
        expected.remove(from);
        expected.insert(to, dragged);
        prop_assert_eq!(order(&view), expected);
        prop_assert!(view.columns().iter().all(|c| c.z_index() == 0));
        assert_contiguous(&view);
    }

    #[test]
    fn cancelled_drag_changes_nothing(
        widths in widths_strategy(),
        pick in 0usize..8,
        deltas in prop::collection::vec(-500.0f64..500.0, 1..6),
    ) {
        let (mut view, ids) = build(&widths);
        let before = order(&view);
        let lefts: Vec<f64> = view.columns().iter().map(|c| c.left()).collect();

        view.start_drag(ids[pick % ids.len()], 1.0).unwrap();
        for delta in &deltas {
            view.drag(*delta).unwrap();
        }
        view.cancel_drag().unwrap();

        prop_assert_eq!(order(&view), before);
        let after: Vec<f64> = view.columns().iter().map(|c| c.left()).collect();
        prop_assert_eq!(after, lefts);
    }

    #[test]
    fn sort_fields_agree_with_the_list(
        widths in widths_strategy(),
        clicks in prop::collection::vec((0usize..8, any::<bool>()), 1..20),
    ) {
        let (mut view, ids) = build(&widths);
        for (i, extended) in clicks {
            view.on_column_sort_requested(ids[i % ids.len()], extended).unwrap();
        }
        let state = view.sort_state();
        prop_assert!(!state.is_empty());
        for column in view.columns() {
            match state.order().iter().position(|id| *id == column.id()) {
                Some(rank) => {
                    prop_assert_eq!(column.sort_order(), Some(rank));
                    prop_assert!(column.sort_direction().is_some());
                }
                None => {
                    prop_assert_eq!(column.sort_order(), None);
                    prop_assert_eq!(column.sort_direction(), None::<SortDirection>);
                }
            }
        }

        let current = view.sort_descriptors();
        let recorder = ChangeRecorder::attach(&view);
        prop_assert!(!view.reconcile_external_sort(&current));
        prop_assert_eq!(recorder.count(), 0);
    }
}

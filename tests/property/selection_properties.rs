// Property-based tests for selection editing
// Random drags must never leave two selections overlapping

#[path = "../fixtures/mod.rs"]
mod fixtures;

use chrono::Duration;
use fixtures::dates::minutes_into_day;
use interval_engine::models::selection::SelectionId;
use interval_engine::services::selection::SelectionSet;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Drag {
    Start(usize, i64),
    End(usize, i64),
    Both(usize, i64, i64),
    Remove(usize),
}

fn drag() -> impl Strategy<Value = Drag> {
    prop_oneof![
        (any::<usize>(), 0..96i64).prop_map(|(n, at)| Drag::Start(n, at)),
        (any::<usize>(), 0..96i64).prop_map(|(n, at)| Drag::End(n, at)),
        (any::<usize>(), 0..96i64, 0..96i64).prop_map(|(n, a, b)| Drag::Both(n, a, b)),
        any::<usize>().prop_map(Drag::Remove),
    ]
}

/// Quarter-hour slot on the scenario day
fn slot(n: i64) -> chrono::DateTime<chrono::Utc> {
    minutes_into_day(n * 15)
}

/// `count` disjoint selections, each an hour long, two hours apart
fn staged(count: usize) -> SelectionSet {
    let mut set = SelectionSet::new();
    for k in 0..count as i64 {
        set.begin_selection(slot(k * 8), slot(k * 8 + 4), k > 0).unwrap();
    }
    set
}

fn pick(set: &SelectionSet, n: usize) -> Option<SelectionId> {
    let ids = set.list_ids();
    (!ids.is_empty()).then(|| ids[n % ids.len()])
}

fn apply(set: &mut SelectionSet, drag: &Drag) {
    match *drag {
        Drag::Start(n, at) => {
            if let Some(id) = pick(set, n) {
                set.update_selection_start(id, slot(at)).unwrap();
            }
        }
        Drag::End(n, at) => {
            if let Some(id) = pick(set, n) {
                set.update_selection_end(id, slot(at)).unwrap();
            }
        }
        Drag::Both(n, a, b) => {
            if let Some(id) = pick(set, n) {
                // Zero-length requests are rejected without touching the set.
                let _ = set.update_selection(id, slot(a), slot(b));
            }
        }
        Drag::Remove(n) => {
            if let Some(id) = pick(set, n) {
                set.remove_selection(id);
            }
        }
    }
}

proptest! {
    /// Property: after every drag no two selections collide
    #[test]
    fn prop_selections_never_overlap(
        count in 1..6usize,
        drags in prop::collection::vec(drag(), 1..30),
    ) {
        let mut set = staged(count);
        for drag in &drags {
            apply(&mut set, drag);
            let all: Vec<_> = set.iter().copied().collect();
            for (i, a) in all.iter().enumerate() {
                for b in &all[i + 1..] {
                    prop_assert!(!a.collides_with(b), "{:?} overlaps {:?} after {:?}", a, b, drag);
                }
            }
            for selection in &all {
                prop_assert!(selection.start < selection.end);
            }
        }
    }

    /// Property: dragging the start past the end keeps the original duration,
    /// and dragging it back restores the original start
    #[test]
    fn prop_start_flip_preserves_duration(
        start in 0..40i64,
        length in 1..16i64,
        overshoot in 0..16i64,
    ) {
        let mut set = SelectionSet::new();
        let id = set.begin_selection(slot(start), slot(start + length), false).unwrap();

        set.update_selection_start(id, slot(start + length + overshoot)).unwrap();
        let flipped = *set.get(id).unwrap();
        prop_assert_eq!(flipped.end - flipped.start, Duration::minutes(length * 15));

        set.update_selection_start(id, slot(start)).unwrap();
        prop_assert_eq!(set.get(id).unwrap().start, slot(start));
    }

    /// Property: dragging the end before the start keeps the original duration
    #[test]
    fn prop_end_flip_preserves_duration(
        start in 20..60i64,
        length in 1..16i64,
        undershoot in 0..16i64,
    ) {
        let mut set = SelectionSet::new();
        let id = set.begin_selection(slot(start), slot(start + length), false).unwrap();

        set.update_selection_end(id, slot(start - undershoot)).unwrap();
        let flipped = *set.get(id).unwrap();
        prop_assert_eq!(flipped.end, slot(start - undershoot));
        prop_assert_eq!(flipped.end - flipped.start, Duration::minutes(length * 15));
    }
}

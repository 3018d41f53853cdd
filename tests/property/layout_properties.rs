// Property-based tests for day packing
// Random days of events must pack without column clashes and with one width per cluster

#[path = "../fixtures/mod.rs"]
mod fixtures;

use std::collections::HashMap;

use chrono::Duration;
use fixtures::dates::{minutes_into_day, scenario_day};
use fixtures::events::{interval, OWNER};
use interval_engine::models::event::{EventId, EventRecord};
use interval_engine::models::interval::Interval;
use interval_engine::services::layout::{EventLayoutIndex, PackedEvent};
use proptest::prelude::*;

/// (start offset, duration) pairs in 5-minute steps, all starting on the scenario day
fn day_events() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((0..288i64, 1..48i64), 0..24)
}

fn build(events: &[(i64, i64)]) -> (EventLayoutIndex, HashMap<EventId, Interval>) {
    let mut index = EventLayoutIndex::default();
    let mut intervals = HashMap::new();
    for (n, (offset, length)) in events.iter().enumerate() {
        let start = minutes_into_day(offset * 5);
        let slot = interval(start, start + Duration::minutes(length * 5));
        let id = EventId(n as u64 + 1);
        index
            .register_event(EventRecord::new(OWNER, slot, "generated").with_id(id))
            .unwrap();
        intervals.insert(id, slot);
    }
    (index, intervals)
}

/// Connected components of the overlap graph, as a cluster number per event
fn clusters(packed: &[PackedEvent], intervals: &HashMap<EventId, Interval>) -> HashMap<EventId, usize> {
    let ids: Vec<EventId> = packed.iter().map(|p| p.event).collect();
    let mut cluster: HashMap<EventId, usize> = HashMap::new();
    let mut next = 0;
    for &seed in &ids {
        if cluster.contains_key(&seed) {
            continue;
        }
        let mut stack = vec![seed];
        while let Some(id) = stack.pop() {
            if cluster.insert(id, next).is_some() {
                continue;
            }
            for &other in &ids {
                if !cluster.contains_key(&other) && intervals[&id].collides_with(&intervals[&other]) {
                    stack.push(other);
                }
            }
        }
        next += 1;
    }
    cluster
}

proptest! {
    /// Property: colliding events never share a column
    #[test]
    fn prop_colliding_events_use_distinct_columns(events in day_events()) {
        let (index, intervals) = build(&events);
        let packed = index.get_day_events_on(scenario_day());

        prop_assert_eq!(packed.len(), events.len());
        for (i, a) in packed.iter().enumerate() {
            for b in &packed[i + 1..] {
                if intervals[&a.event].collides_with(&intervals[&b.event]) {
                    prop_assert_ne!(a.column, b.column);
                }
            }
        }
    }

    /// Property: every event of a cluster reports 1 + the cluster's highest column
    #[test]
    fn prop_cluster_width_is_consistent(events in day_events()) {
        let (index, intervals) = build(&events);
        let packed = index.get_day_events_on(scenario_day());
        let cluster = clusters(&packed, &intervals);

        let mut widest: HashMap<usize, u32> = HashMap::new();
        for p in &packed {
            let entry = widest.entry(cluster[&p.event]).or_insert(0);
            *entry = (*entry).max(p.column + 1);
        }
        for p in &packed {
            prop_assert_eq!(p.total_columns, widest[&cluster[&p.event]]);
        }
    }

    /// Property: output is ordered by column, then start
    #[test]
    fn prop_output_ordered(events in day_events()) {
        let (index, intervals) = build(&events);
        let packed = index.get_day_events_on(scenario_day());
        for pair in packed.windows(2) {
            let key = |p: &PackedEvent| (p.column, intervals[&p.event].start);
            prop_assert!(key(&pair[0]) <= key(&pair[1]));
        }
    }

    /// Property: removing an event takes it out of every day and leaves the rest packed
    #[test]
    fn prop_removal_forgets_event(events in day_events(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!events.is_empty());
        let (mut index, _) = build(&events);
        let victim = EventId(pick.index(events.len()) as u64 + 1);

        prop_assert!(index.remove_event(victim).is_some());
        prop_assert!(index.remove_event(victim).is_none());
        for day in index.days().collect::<Vec<_>>() {
            prop_assert!(!index.day_event_ids(day).contains(&victim));
        }
        prop_assert_eq!(index.get_day_events_on(scenario_day()).len(), events.len() - 1);
    }
}

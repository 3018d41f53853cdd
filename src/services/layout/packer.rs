//! Overlap packing for a single day.
//!
//! Events are sorted by start and scanned pairwise. Every colliding pair
//! `(earlier, later)` becomes a parent/child link, and the child is pushed to
//! the first column, at or after its current one, that none of its colliding
//! ancestors occupy. Cluster roots then propagate `1 + max column` to every
//! node they reach.
//!
//! Nodes live in a flat arena and refer to each other by index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::InvariantViolation;
use crate::models::event::EventId;
use crate::models::interval::Interval;

/// Column assignment of one event within its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedEvent {
    pub event: EventId,
    pub column: u32,
    pub total_columns: u32,
}

#[derive(Debug)]
struct Node {
    event: EventId,
    interval: Interval,
    column: u32,
    parents: Vec<usize>,
    children: Vec<usize>,
    // Right-hand neighbours in the next column, only used to spread the cluster width.
    lane_children: Vec<usize>,
    total_columns: Option<u32>,
}

impl Node {
    fn new(event: EventId, interval: Interval) -> Self {
        Self {
            event,
            interval,
            column: 0,
            parents: Vec::new(),
            children: Vec::new(),
            lane_children: Vec::new(),
            total_columns: None,
        }
    }
}

pub struct OverlapPacker {
    nodes: Vec<Node>,
}

impl OverlapPacker {
    /// Takes the bucket's events in registration order.
    pub fn new(entries: impl IntoIterator<Item = (EventId, Interval)>) -> Self {
        let mut nodes: Vec<Node> = entries
            .into_iter()
            .map(|(event, interval)| Node::new(event, interval))
            .collect();
        // Stable: equal starts keep registration order.
        nodes.sort_by_key(|node| node.interval.start);
        Self { nodes }
    }

    /// Compute columns and cluster widths, ordered by column then start.
    pub fn pack(mut self) -> Vec<PackedEvent> {
        let count = self.nodes.len();
        for parent in 0..count {
            for child in parent + 1..count {
                // Sorted by start, so nothing after this can reach the parent.
                if self.nodes[child].interval.start >= self.nodes[parent].interval.end {
                    break;
                }
                self.add_child(parent, child);
            }
        }

        self.propagate_widths();

        let mut order: Vec<usize> = (0..count).collect();
        order.sort_by_key(|&index| (self.nodes[index].column, self.nodes[index].interval.start, index));
        order
            .into_iter()
            .map(|index| {
                let node = &self.nodes[index];
                PackedEvent {
                    event: node.event,
                    column: node.column,
                    total_columns: node.total_columns.unwrap_or(1),
                }
            })
            .collect()
    }

    fn add_child(&mut self, parent: usize, child: usize) {
        self.nodes[parent].children.push(child);
        self.nodes[child].parents.push(parent);

        let mut occupied: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for index in self.colliding_hierarchy(child, parent) {
            occupied.entry(self.nodes[index].column).or_default().push(index);
        }

        let mut column = self.nodes[child].column;
        while occupied.contains_key(&column) {
            column += 1;
        }
        self.nodes[child].column = column;
        log::trace!(
            "Packer: {} placed in column {} under {}",
            self.nodes[child].event,
            column,
            self.nodes[parent].event
        );

        if let Some(left) = column.checked_sub(1).and_then(|c| occupied.get(&c)) {
            for &neighbour in left {
                self.link_lanes(neighbour, child);
            }
        }
        if let Some(right) = occupied.get(&(column + 1)) {
            for &neighbour in right {
                self.link_lanes(child, neighbour);
            }
        }
    }

    fn link_lanes(&mut self, left: usize, right: usize) {
        if !self.nodes[left].lane_children.contains(&right) {
            self.nodes[left].lane_children.push(right);
        }
    }

    /// `from` and its transitive parents that collide with `child`.
    fn colliding_hierarchy(&self, child: usize, from: usize) -> Vec<usize> {
        let target = self.nodes[child].interval;
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![from];
        let mut hierarchy = Vec::new();

        while let Some(index) = stack.pop() {
            if visited[index] {
                continue;
            }
            visited[index] = true;
            let node = &self.nodes[index];
            if node.interval.collides_with(&target) {
                hierarchy.push(index);
            }
            stack.extend(node.parents.iter().copied().filter(|&p| !visited[p]));
        }
        hierarchy
    }

    fn propagate_widths(&mut self) {
        let roots: Vec<usize> = (0..self.nodes.len())
            .filter(|&index| self.nodes[index].parents.is_empty() && self.nodes[index].column == 0)
            .collect();

        for root in roots {
            let cluster = self.reachable_from(root);
            let width = 1 + cluster
                .iter()
                .map(|&index| self.nodes[index].column)
                .max()
                .unwrap_or(0);

            for index in cluster {
                let node = &mut self.nodes[index];
                match node.total_columns {
                    Some(existing) if existing != width => InvariantViolation::InconsistentClusterWidth {
                        event: node.event,
                        first: existing,
                        second: width,
                    }
                    .raise(),
                    _ => node.total_columns = Some(width),
                }
            }
        }
    }

    fn reachable_from(&self, root: usize) -> Vec<usize> {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![root];
        let mut reached = Vec::new();

        while let Some(index) = stack.pop() {
            if visited[index] {
                continue;
            }
            visited[index] = true;
            reached.push(index);
            let node = &self.nodes[index];
            stack.extend(node.children.iter().chain(&node.lane_children).copied());
        }
        reached
    }
}

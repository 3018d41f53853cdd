//! Bounds resolution: keeps an edited selection from overlapping the others.
//!
//! For every other selection, relative to the one that moved:
//! - fully covered: removed
//! - overlapping the right edge: start trimmed to the mover's end
//! - overlapping the left edge: end trimmed to the mover's start
//!
//! Each trim is itself a move: it cascades, and the trimmed selection becomes
//! the editing one.

use super::{SelectionNotice, SelectionSet, SelectionTopic};
use crate::error::InvariantViolation;
use crate::models::selection::SelectionId;

struct Cascade {
    origin: SelectionId,
    steps: usize,
    touched: Vec<SelectionId>,
}

impl Cascade {
    fn touch(&mut self, id: SelectionId) {
        self.touched.retain(|touched| *touched != id);
        self.touched.push(id);
    }
}

impl SelectionSet {
    /// Resolve overlaps caused by moving `mover`, then keep resolving until no
    /// selection touched along the way collides with another one.
    pub(super) fn settle(&mut self, mover: SelectionId) {
        let mut cascade = Cascade {
            origin: mover,
            steps: 0,
            touched: vec![mover],
        };
        self.resolve_bounds(mover, &mut cascade);

        while let Some(next) = self.colliding_touched(&cascade) {
            log::debug!("Re-resolving bounds around {}", next);
            self.resolve_bounds(next, &mut cascade);
        }
    }

    fn resolve_bounds(&mut self, mover_id: SelectionId, cascade: &mut Cascade) {
        let others: Vec<SelectionId> = self
            .selections
            .keys()
            .copied()
            .filter(|id| *id != mover_id)
            .collect();

        for other_id in others {
            let Some(mover) = self.selections.get(&mover_id).copied() else {
                return;
            };
            let Some(other) = self.selections.get(&other_id).copied() else {
                continue;
            };

            cascade.steps += 1;
            if cascade.steps > self.max_cascade_steps {
                InvariantViolation::UnboundedCascade {
                    selection: cascade.origin,
                    steps: self.max_cascade_steps,
                }
                .raise();
            }

            if other.end <= mover.end && other.start >= mover.start {
                self.remove_inner(other_id);
            } else if other.start < mover.end && other.end >= mover.end {
                if self.set_start(other_id, mover.end) {
                    self.cascade_from(other_id, cascade);
                }
            } else if other.end > mover.start && other.start <= mover.start {
                if self.set_end(other_id, mover.start) {
                    self.cascade_from(other_id, cascade);
                }
            }
        }
    }

    fn cascade_from(&mut self, id: SelectionId, cascade: &mut Cascade) {
        cascade.touch(id);
        self.editing = Some(id);
        self.queue(SelectionTopic::Update, SelectionNotice::Selection(id));
        self.resolve_bounds(id, cascade);
    }

    /// Most recently touched selection that still collides with another one.
    fn colliding_touched(&self, cascade: &Cascade) -> Option<SelectionId> {
        cascade.touched.iter().rev().copied().find(|id| {
            self.selections.get(id).map_or(false, |selection| {
                self.selections
                    .values()
                    .any(|other| other.id != *id && other.collides_with(selection))
            })
        })
    }
}

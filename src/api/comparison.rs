use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{AttributeId, COMPARISON_SLOTS, ComparisonSlot, IntervalRange, RecordId};

/// Range locked into one comparison slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LockedComparison {
    pub attribute: AttributeId,
    pub range: IntervalRange,
}

/// Locked comparison groups with a per-record membership bitmask.
#[derive(Debug, Clone)]
pub(super) struct ComparisonState {
    locked: [Option<LockedComparison>; COMPARISON_SLOTS],
    membership: Vec<u8>,
}

impl ComparisonState {
    pub(super) fn new(record_count: usize) -> Self {
        Self {
            locked: [None; COMPARISON_SLOTS],
            membership: vec![0; record_count],
        }
    }

    pub(super) fn get(&self, slot: ComparisonSlot) -> Option<LockedComparison> {
        self.locked[slot.index()]
    }

    pub(super) fn membership(&self) -> &[u8] {
        &self.membership
    }

    pub(super) fn contains(&self, slot: ComparisonSlot, record: RecordId) -> bool {
        self.membership
            .get(record)
            .is_some_and(|bits| bits & slot.mask() != 0)
    }

    /// Bounds locked on `attribute` by slots other than `except`.
    pub(super) fn ranges_on(
        &self,
        attribute: AttributeId,
        except: ComparisonSlot,
    ) -> SmallVec<[(f64, f64); COMPARISON_SLOTS]> {
        ComparisonSlot::all()
            .filter(|&slot| slot != except)
            .filter_map(|slot| self.get(slot))
            .filter(|locked| locked.attribute == attribute)
            .map(|locked| (locked.range.min, locked.range.max))
            .collect()
    }

    /// Slots currently locked on `attribute`.
    pub(super) fn slots_on(&self, attribute: AttributeId) -> SmallVec<[ComparisonSlot; COMPARISON_SLOTS]> {
        ComparisonSlot::all()
            .filter(|&slot| {
                self.get(slot)
                    .is_some_and(|locked| locked.attribute == attribute)
            })
            .collect()
    }

    pub(super) fn lock(
        &mut self,
        slot: ComparisonSlot,
        locked: LockedComparison,
        is_member: impl Fn(RecordId) -> bool,
    ) {
        let mask = slot.mask();
        for (record, bits) in self.membership.iter_mut().enumerate() {
            if is_member(record) {
                *bits |= mask;
            } else {
                *bits &= !mask;
            }
        }
        self.locked[slot.index()] = Some(locked);
    }

    pub(super) fn clear(&mut self, slot: ComparisonSlot) -> bool {
        let mask = slot.mask();
        for bits in &mut self.membership {
            *bits &= !mask;
        }
        self.locked[slot.index()].take().is_some()
    }
}

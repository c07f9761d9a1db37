//! Per-part gain buckets: an ordered map from gain value to the head of a doubly-linked list of
//! unlocked cells, plus the balance-filtered selection rule that picks the next move.
//!
//! The doubly-linked lists are arena-indexed rather than pointer-linked: each cell owns exactly
//! one node for its whole lifetime (the `prev`/`next` fields embedded directly on [`Cell`]), so
//! there's no separate node arena to keep in sync — just the `gain -> head` maps below.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::ids::{NodeIdx, Part};
use crate::netlist::Netlist;

/// The two per-part `gain -> head` maps: one ordered bucket list per part.
#[derive(Debug, Clone, Default)]
pub(crate) struct GainBuckets {
    heads: [BTreeMap<i32, NodeIdx>; 2],
}

impl GainBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `cell_id` in `bList[part][gain]`. If the bucket is empty it becomes the head;
    /// otherwise it becomes the new head, pushed in front of the existing one (O(1): the old
    /// head becomes `cell_id`'s successor, and the map entry is repointed to `cell_id`). This is
    /// also the tie-break policy: among cells with equal gain, the most recently inserted one is
    /// returned first by [`Self::max_candidate`].
    pub fn insert(&mut self, netlist: &mut Netlist, cell_id: NodeIdx, part: Part, gain: i32) {
        match self.heads[part.index()].entry(gain) {
            Entry::Vacant(e) => {
                e.insert(cell_id);
                netlist.cells[cell_id].prev = None;
                netlist.cells[cell_id].next = None;
            }
            Entry::Occupied(mut e) => {
                let old_head = *e.get();
                netlist.cells[cell_id].next = Some(old_head);
                netlist.cells[cell_id].prev = None;
                netlist.cells[old_head].prev = Some(cell_id);
                e.insert(cell_id);
            }
        }
    }

    /// Unlinks `cell_id` from its doubly-linked list at `(part, gain)`. If it was the head: when
    /// the list becomes empty the map entry is erased; when a successor exists, the map entry is
    /// repointed to it and the successor's `prev` is cleared.
    pub fn remove(&mut self, netlist: &mut Netlist, cell_id: NodeIdx, part: Part, gain: i32) {
        let prev = netlist.cells[cell_id].prev;
        let next = netlist.cells[cell_id].next;

        match prev {
            None => {
                // `cell_id` was the head.
                match next {
                    None => {
                        self.heads[part.index()].remove(&gain);
                    }
                    Some(next_id) => {
                        netlist.cells[next_id].prev = None;
                        self.heads[part.index()].insert(gain, next_id);
                    }
                }
            }
            Some(prev_id) => {
                netlist.cells[prev_id].next = next;
                if let Some(next_id) = next {
                    netlist.cells[next_id].prev = Some(prev_id);
                }
            }
        }

        netlist.cells[cell_id].prev = None;
        netlist.cells[cell_id].next = None;
    }

    fn max_gain(&self, part: Part) -> Option<(i32, NodeIdx)> {
        self.heads[part.index()]
            .iter()
            .next_back()
            .map(|(&gain, &id)| (gain, id))
    }

    /// Returns the highest-gain unlocked cell whose removal keeps `part_size[source] > min_size`,
    /// or `None` if no legal move exists. Prefers the higher-gain part; falls back to the other
    /// part if the higher-gain part can't legally lose a cell.
    pub fn max_candidate(&self, part_size: [u32; 2], min_size: u32) -> Option<(Part, NodeIdx)> {
        let legal = |part: Part| part_size[part.index()] > min_size;

        let a = self.max_gain(Part::A);
        let b = self.max_gain(Part::B);

        match (a, b) {
            (Some((ga, ida)), Some((gb, idb))) => {
                if ga >= gb {
                    legal(Part::A)
                        .then_some((Part::A, ida))
                        .or_else(|| legal(Part::B).then_some((Part::B, idb)))
                } else {
                    legal(Part::B)
                        .then_some((Part::B, idb))
                        .or_else(|| legal(Part::A).then_some((Part::A, ida)))
                }
            }
            (Some((_, ida)), None) => legal(Part::A).then_some((Part::A, ida)),
            (None, Some((_, idb))) => legal(Part::B).then_some((Part::B, idb)),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist::NetlistBuilder;

    fn dummy_netlist(n: usize) -> Netlist {
        let mut b = NetlistBuilder::new();
        let names: Vec<String> = (0..n).map(|i| format!("c{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        b.add_net("n0", &refs).unwrap();
        b.finish()
    }

    #[test]
    fn insert_then_remove_empties_bucket() {
        let mut netlist = dummy_netlist(1);
        let mut buckets = GainBuckets::new();
        let id = crate::ids::CellId::new(0);
        buckets.insert(&mut netlist, id, Part::A, 3);
        assert_eq!(buckets.max_gain(Part::A), Some((3, id)));
        buckets.remove(&mut netlist, id, Part::A, 3);
        assert_eq!(buckets.max_gain(Part::A), None);
    }

    #[test]
    fn most_recent_insert_wins_ties() {
        let mut netlist = dummy_netlist(3);
        let mut buckets = GainBuckets::new();
        let (c0, c1, c2) = (
            crate::ids::CellId::new(0),
            crate::ids::CellId::new(1),
            crate::ids::CellId::new(2),
        );
        buckets.insert(&mut netlist, c0, Part::A, 1);
        buckets.insert(&mut netlist, c1, Part::A, 1);
        buckets.insert(&mut netlist, c2, Part::A, 1);
        // c2 was inserted last, so it's the head and wins the tie-break.
        assert_eq!(buckets.max_gain(Part::A), Some((1, c2)));
        buckets.remove(&mut netlist, c2, Part::A, 1);
        assert_eq!(buckets.max_gain(Part::A), Some((1, c1)));
        buckets.remove(&mut netlist, c1, Part::A, 1);
        assert_eq!(buckets.max_gain(Part::A), Some((1, c0)));
    }

    #[test]
    fn max_candidate_prefers_higher_gain_part() {
        let mut netlist = dummy_netlist(2);
        let mut buckets = GainBuckets::new();
        let c0 = crate::ids::CellId::new(0);
        let c1 = crate::ids::CellId::new(1);
        buckets.insert(&mut netlist, c0, Part::A, 5);
        buckets.insert(&mut netlist, c1, Part::B, 2);
        assert_eq!(
            buckets.max_candidate([10, 10], 0),
            Some((Part::A, c0))
        );
    }

    #[test]
    fn max_candidate_falls_back_when_source_too_small() {
        let mut netlist = dummy_netlist(2);
        let mut buckets = GainBuckets::new();
        let c0 = crate::ids::CellId::new(0);
        let c1 = crate::ids::CellId::new(1);
        buckets.insert(&mut netlist, c0, Part::A, 5);
        buckets.insert(&mut netlist, c1, Part::B, 2);
        // Part A only has `min_size` cells, so it can't legally lose one.
        assert_eq!(
            buckets.max_candidate([4, 10], 4),
            Some((Part::B, c1))
        );
    }

    #[test]
    fn max_candidate_none_when_both_blocked() {
        let buckets = GainBuckets::new();
        assert_eq!(buckets.max_candidate([4, 4], 4), None);
    }
}

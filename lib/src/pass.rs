//! The FM pass engine: initial gain computation, the move/lock loop, and best-prefix rollback.
//!
//! A pass borrows the netlist mutably and owns a fresh [`PassState`]; nothing here outlives the
//! call to [`run_pass`]; the move stack and both bucket maps are always empty again once it
//! returns (the move stack because of the rollback it performs; the buckets because the caller's
//! next pass rebuilds them from scratch).

use crate::buckets::GainBuckets;
use crate::ids::{CellId, NetId, Part};
use crate::netlist::Netlist;

/// What a single pass accomplished: how many of its moves were kept, and by how much the cut
/// size improved. A pass is *productive* iff `max_acc_gain > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    pub moves_made: usize,
    pub best_move_num: usize,
    pub max_acc_gain: i64,
}

impl PassReport {
    pub fn is_productive(&self) -> bool {
        self.max_acc_gain > 0
    }
}

/// Tracks the sequence of moves made during one pass, and the best prefix of cumulative gain
/// seen so far, so the engine can roll back to it once no legal move remains.
struct PassState {
    acc_gain: i64,
    max_acc_gain: i64,
    best_move_num: usize,
    move_stack: Vec<CellId>,
}

impl PassState {
    fn new() -> Self {
        Self {
            acc_gain: 0,
            max_acc_gain: 0,
            best_move_num: 0,
            move_stack: Vec::new(),
        }
    }
}

/// Runs one FM pass over `netlist`: computes initial gains, repeatedly applies the best legal
/// move, then rolls back to the best prefix. `min_size` is `floor(cell_num * balance_factor)`,
/// the minimum number of cells each part must retain.
pub(crate) fn run_pass(netlist: &mut Netlist, min_size: u32) -> PassReport {
    let mut buckets = GainBuckets::new();
    let mut state = PassState::new();

    initial_gains(netlist, &mut buckets);

    while let Some((from_part, cell_id)) =
        buckets.max_candidate(netlist.part_size, min_size)
    {
        apply_move(netlist, &mut buckets, &mut state, from_part, cell_id);
    }

    let moves_made = state.move_stack.len();
    rollback(netlist, &mut state);

    log::debug!(
        "pass complete: {} moves made, best prefix {} (acc gain {})",
        moves_made,
        state.best_move_num,
        state.max_acc_gain
    );

    PassReport {
        moves_made,
        best_move_num: state.best_move_num,
        max_acc_gain: state.max_acc_gain,
    }
}

/// Phase (a): unlocks every cell, computes its initial gain, and inserts it into its bucket.
fn initial_gains(netlist: &mut Netlist, buckets: &mut GainBuckets) {
    for cell_id in (0..netlist.cells.len()).map(CellId::new) {
        netlist.cells[cell_id].locked = false;

        let from_part = netlist.cells[cell_id].part;
        let to_part = from_part.opposite();
        let incident_nets = netlist.cells[cell_id].nets.clone();
        let mut gain = 0i32;
        for net_id in incident_nets {
            let net = &netlist.nets[net_id];
            if net.part_count(from_part) == 1 {
                gain += 1;
            }
            if net.part_count(to_part) == 0 {
                gain -= 1;
            }
        }
        netlist.cells[cell_id].gain = gain;
    }

    for cell_id in (0..netlist.cells.len()).map(CellId::new) {
        let part = netlist.cells[cell_id].part;
        let gain = netlist.cells[cell_id].gain;
        buckets.insert(netlist, cell_id, part, gain);
    }
}

/// Phase (b), one iteration: move `cell_id` from `from_part`, lock it, record the move, then
/// fix up the gains of every unlocked neighbor on its incident nets.
fn apply_move(
    netlist: &mut Netlist,
    buckets: &mut GainBuckets,
    state: &mut PassState,
    from_part: Part,
    cell_id: CellId,
) {
    let to_part = from_part.opposite();

    let gain = netlist.cells[cell_id].gain;
    buckets.remove(netlist, cell_id, from_part, gain);

    netlist.cells[cell_id].part = to_part;
    netlist.part_size[from_part.index()] -= 1;
    netlist.part_size[to_part.index()] += 1;
    netlist.cells[cell_id].locked = true;

    state.move_stack.push(cell_id);

    state.acc_gain += netlist.cells[cell_id].gain as i64;
    if state.acc_gain > state.max_acc_gain {
        state.max_acc_gain = state.acc_gain;
        state.best_move_num = state.move_stack.len();
    }

    let incident_nets = netlist.cells[cell_id].nets.clone();
    for net_id in incident_nets {
        netlist.nets[net_id].part_count[from_part.index()] -= 1;
        netlist.nets[net_id].part_count[to_part.index()] += 1;

        let from_count = netlist.nets[net_id].part_count(from_part);
        let to_count = netlist.nets[net_id].part_count(to_part);

        update_neighbor_gains(netlist, buckets, net_id, from_part, to_part, from_count, to_count);
    }
}

/// The four standard FM gain-update rules, applied to every unlocked cell on `net_id`, fired on
/// the *post-move* part counts with exact equality tests.
fn update_neighbor_gains(
    netlist: &mut Netlist,
    buckets: &mut GainBuckets,
    net_id: NetId,
    from_part: Part,
    to_part: Part,
    from_count: u32,
    to_count: u32,
) {
    let neighbor_cells = netlist.nets[net_id].cells.clone();
    for neighbor_id in neighbor_cells {
        if netlist.cells[neighbor_id].locked {
            continue;
        }
        let neighbor_part = netlist.cells[neighbor_id].part;
        let old_gain = netlist.cells[neighbor_id].gain;
        buckets.remove(netlist, neighbor_id, neighbor_part, old_gain);

        let mut gain = old_gain;
        if to_count == 1 {
            gain += 1;
        } else if to_count == 2 && neighbor_part == to_part {
            gain -= 1;
        }
        if from_count == 0 {
            gain -= 1;
        } else if from_count == 1 && neighbor_part == from_part {
            gain += 1;
        }

        netlist.cells[neighbor_id].gain = gain;
        buckets.insert(netlist, neighbor_id, neighbor_part, gain);
    }
}

/// Phase (c): undoes every move past `best_move_num`, restoring part assignments and net part
/// counts exactly. Locks aren't consulted — every popped move is unconditionally reversed.
fn rollback(netlist: &mut Netlist, state: &mut PassState) {
    while state.move_stack.len() > state.best_move_num {
        let cell_id = state.move_stack.pop().expect("checked non-empty above");
        let to_part = netlist.cells[cell_id].part;
        let from_part = to_part.opposite();

        netlist.cells[cell_id].part = from_part;
        netlist.part_size[to_part.index()] -= 1;
        netlist.part_size[from_part.index()] += 1;

        for &net_id in &netlist.cells[cell_id].nets {
            netlist.nets[net_id].part_count[to_part.index()] -= 1;
            netlist.nets[net_id].part_count[from_part.index()] += 1;
        }
    }
    state.move_stack.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist::NetlistBuilder;

    /// Two parallel nets over the same two cells. Both cells seed into the same part, so the
    /// pass should find no improving move.
    #[test]
    fn trivial_cut_is_unproductive() {
        let mut b = NetlistBuilder::new();
        b.add_net("n1", &["c1", "c2"]).unwrap();
        b.add_net("n2", &["c1", "c2"]).unwrap();
        let mut netlist = b.finish();

        assert_eq!(netlist.recompute_cut_size(), 0);
        let min_size = (netlist.cell_num() as f64 * 0.4) as u32;
        let report = run_pass(&mut netlist, min_size);
        assert!(!report.is_productive());
        assert_eq!(netlist.recompute_cut_size(), 0);
    }

    /// A 3-cycle of nets, each spanning two cells. The alternating seed (net 0's first-seen
    /// cells to A, net 1's to B) puts c1,c2 in A and c3 in B, cutting the two nets c3 touches.
    #[test]
    fn triangle_finds_one_improving_move() {
        let mut b = NetlistBuilder::new();
        b.add_net("n1", &["c1", "c2"]).unwrap();
        b.add_net("n2", &["c2", "c3"]).unwrap();
        b.add_net("n3", &["c3", "c1"]).unwrap();
        let mut netlist = b.finish();

        assert_eq!(netlist.recompute_cut_size(), 2);
        let min_size = 0;
        let report = run_pass(&mut netlist, min_size);
        assert!(report.is_productive());

        let cut_after = netlist.recompute_cut_size() as i64;
        assert!(2 - report.max_acc_gain == cut_after);
        assert_eq!(cut_after, 0);
        assert!(netlist.part_size(Part::A) >= min_size);
        assert!(netlist.part_size(Part::B) >= min_size);
    }

    /// A single net spans all four cells and the balance factor blocks every move once the
    /// parts are evenly split.
    #[test]
    fn balance_blocks_every_move_on_single_net() {
        let mut b = NetlistBuilder::new();
        b.add_net("n1", &["c1", "c2", "c3", "c4"]).unwrap();
        let mut netlist = b.finish();
        assert_eq!(netlist.part_size(Part::A), 2);
        assert_eq!(netlist.part_size(Part::B), 2);

        let min_size = (netlist.cell_num() as f64 * 0.5) as u32;
        let report = run_pass(&mut netlist, min_size);
        assert_eq!(report.max_acc_gain, 0);
        assert_eq!(report.moves_made, 0);
        assert_eq!(netlist.recompute_cut_size(), 1);
    }

    #[test]
    fn rollback_restores_cells_moved_past_best_prefix() {
        // A path graph long enough that the greedy walk overshoots the best prefix and has to
        // roll back: five cells in a line, so the middle cell's move is the only genuinely
        // improving one.
        let mut b = NetlistBuilder::new();
        b.add_net("n0", &["c0", "c1"]).unwrap();
        b.add_net("n1", &["c1", "c2"]).unwrap();
        b.add_net("n2", &["c2", "c3"]).unwrap();
        b.add_net("n3", &["c3", "c4"]).unwrap();
        let mut netlist = b.finish();

        let before: Vec<Part> = netlist.cells().map(|(_, c)| c.part()).collect();
        let min_size = 0;
        let report = run_pass(&mut netlist, min_size);

        // Whatever happened, every cell past `best_move_num` in the (now-empty) move stack must
        // have been restored; since rollback always clears the stack, the observable check is
        // that the final cut size matches `initial - max_acc_gain`.
        let initial_cut = 3usize; // n0,n1,n2 are cut; n3 is not (c3,c4 both start in part B)
        let _ = before;
        assert_eq!(initial_cut as i64 - report.max_acc_gain, netlist.recompute_cut_size() as i64);
    }
}

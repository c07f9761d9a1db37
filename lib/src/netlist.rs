//! The long-lived netlist model: cells, nets, and their bidirectional adjacency.
//!
//! Cells and nets are created once, while the [`NetlistBuilder`] consumes a stream of net
//! records (an external parser drives it); the resulting [`Netlist`] then outlives every pass
//! the [`Partitioner`](crate::partitioner::Partitioner) runs over it.

use std::collections::{HashMap, HashSet};
use std::fmt;

use itertools::Itertools;

use crate::ids::{CellId, CellVec, NetId, NetVec, NodeIdx, Part};

/// A unit-size vertex of the hypergraph.
#[derive(Debug, Clone)]
pub struct Cell {
    pub(crate) name: String,
    pub(crate) part: Part,
    pub(crate) gain: i32,
    pub(crate) locked: bool,
    pub(crate) nets: Vec<NetId>,
    /// This cell's node in the gain-bucket lists, threaded in place (see [`crate::buckets`]).
    pub(crate) prev: Option<NodeIdx>,
    pub(crate) next: Option<NodeIdx>,
}

impl Cell {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn part(&self) -> Part {
        self.part
    }

    pub fn gain(&self) -> i32 {
        self.gain
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// The nets this cell is a pin of; its pin count is `nets().len()`.
    pub fn nets(&self) -> &[NetId] {
        &self.nets
    }
}

/// A hyperedge connecting two or more cells.
#[derive(Debug, Clone)]
pub struct Net {
    pub(crate) name: String,
    pub(crate) cells: Vec<CellId>,
    pub(crate) part_count: [u32; 2],
}

impl Net {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    pub fn part_count(&self, part: Part) -> u32 {
        self.part_count[part.index()]
    }

    /// A net contributes to the cut size iff both part counts are positive.
    pub fn is_cut(&self) -> bool {
        self.part_count[0] > 0 && self.part_count[1] > 0
    }
}

/// Errors that can arise while a [`NetlistBuilder`] assembles a netlist. Parsing-level concerns
/// (malformed tokens, unterminated records) belong to the external parser driving the builder;
/// these variants cover the invariants the netlist model itself must uphold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A `NET` record had no distinct cells after deduplication.
    EmptyNet { net_name: String },
    /// Two `NET` records used the same name.
    DuplicateNetName(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::EmptyNet { net_name } => write!(f, "net {net_name:?} has no cells"),
            BuildError::DuplicateNetName(name) => write!(f, "duplicate net name {name:?}"),
        }
    }
}

impl std::error::Error for BuildError {}

/// The partitioner's core data structure: cells, nets, and the running per-part cell counts.
///
/// A `Netlist` is built once (via [`NetlistBuilder`]) and then repeatedly refined in place by
/// [`Partitioner::run`](crate::partitioner::Partitioner::run); it never shrinks or grows after
/// construction.
#[derive(Debug, Clone)]
pub struct Netlist {
    pub(crate) cells: CellVec<Cell>,
    pub(crate) nets: NetVec<Net>,
    pub(crate) part_size: [u32; 2],
}

impl Netlist {
    pub fn cell_num(&self) -> usize {
        self.cells.len()
    }

    pub fn net_num(&self) -> usize {
        self.nets.len()
    }

    pub fn part_size(&self, part: Part) -> u32 {
        self.part_size[part.index()]
    }

    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id]
    }

    pub fn net(&self, id: NetId) -> &Net {
        &self.nets[id]
    }

    pub fn cells(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells.iter_enumerated()
    }

    pub fn nets(&self) -> impl Iterator<Item = (NetId, &Net)> {
        self.nets.iter_enumerated()
    }

    /// Recomputes the cut size from scratch by scanning every net. Used to seed the driver's
    /// running cut size before the first pass, and in tests to check it against the
    /// incrementally tracked value.
    pub fn recompute_cut_size(&self) -> usize {
        self.nets.iter().filter(|n| n.is_cut()).count()
    }
}

/// Incrementally assembles a [`Netlist`] from a stream of `(net name, cell names)` records.
///
/// Cell ids are assigned densely in first-seen order. New cells introduced by the `k`-th net
/// (0-indexed) are seeded into `Part::from_net_index(k)`, so that a net's first-seen cells tend
/// to land in the same part — this is what gives the canonical seed a smaller initial cut size
/// than a random assignment would.
#[derive(Debug, Default)]
pub struct NetlistBuilder {
    cell_ids: HashMap<String, CellId>,
    net_names: HashSet<String>,
    cells: CellVec<Cell>,
    nets: NetVec<Net>,
    part_size: [u32; 2],
}

impl NetlistBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one `NET` record. `cell_names` need not be pre-deduplicated by the caller: this
    /// builder deduplicates per-net using a set scoped to this call, so both consecutive and
    /// non-consecutive repeats of the same cell name collapse to a single pin, keeping
    /// `net.part_count(A) + net.part_count(B)` equal to the number of distinct cells on the net.
    pub fn add_net<S>(&mut self, net_name: S, cell_names: &[S]) -> Result<NetId, BuildError>
    where
        S: AsRef<str>,
    {
        let net_name = net_name.as_ref().to_owned();
        if !self.net_names.insert(net_name.clone()) {
            return Err(BuildError::DuplicateNetName(net_name));
        }

        let net_idx = self.nets.len();
        let initial_part = Part::from_net_index(net_idx);

        let mut part_count = [0u32; 2];
        let distinct_cells: Vec<CellId> = cell_names
            .iter()
            .map(AsRef::as_ref)
            .unique()
            .map(|name| {
                let cell_id = self.cell_id(name, initial_part);
                part_count[self.cells[cell_id].part.index()] += 1;
                cell_id
            })
            .collect();

        if distinct_cells.is_empty() {
            self.net_names.remove(&net_name);
            return Err(BuildError::EmptyNet { net_name });
        }

        let net_id = self.nets.push(Net {
            name: net_name,
            cells: distinct_cells.clone(),
            part_count,
        });
        for cell_id in distinct_cells {
            self.cells[cell_id].nets.push(net_id);
        }
        Ok(net_id)
    }

    /// Returns the id for `name`, allocating a new cell (seeded into `initial_part`) if this is
    /// the first time `name` has been seen.
    fn cell_id(&mut self, name: &str, initial_part: Part) -> CellId {
        if let Some(&id) = self.cell_ids.get(name) {
            return id;
        }
        let id = self.cells.push(Cell {
            name: name.to_owned(),
            part: initial_part,
            gain: 0,
            locked: false,
            nets: Vec::new(),
            prev: None,
            next: None,
        });
        self.cell_ids.insert(name.to_owned(), id);
        self.part_size[initial_part.index()] += 1;
        id
    }

    /// Finishes construction, producing the [`Netlist`] the partitioner will refine.
    pub fn finish(self) -> Netlist {
        Netlist {
            cells: self.cells,
            nets: self.nets,
            part_size: self.part_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_ids_and_adjacency() {
        let mut b = NetlistBuilder::new();
        b.add_net("n1", &["c1", "c2"]).unwrap();
        b.add_net("n2", &["c2", "c3"]).unwrap();
        let netlist = b.finish();

        assert_eq!(netlist.cell_num(), 3);
        assert_eq!(netlist.net_num(), 2);
        assert_eq!(netlist.cell(CellId::new(0)).name(), "c1");
        assert_eq!(netlist.cell(CellId::new(1)).name(), "c2");
        assert_eq!(netlist.cell(CellId::new(2)).name(), "c3");
        // c2 is a pin on both nets
        assert_eq!(netlist.cell(CellId::new(1)).nets().len(), 2);
    }

    #[test]
    fn alternating_seed() {
        let mut b = NetlistBuilder::new();
        b.add_net("a", &["x1", "x2"]).unwrap(); // net 0 -> Part::A
        b.add_net("b", &["x3"]).unwrap(); // net 1 -> Part::B
        let netlist = b.finish();

        assert_eq!(netlist.cell(CellId::new(0)).part(), Part::A);
        assert_eq!(netlist.cell(CellId::new(1)).part(), Part::A);
        assert_eq!(netlist.cell(CellId::new(2)).part(), Part::B);
    }

    #[test]
    fn duplicate_cell_in_one_net_counts_once() {
        let mut b = NetlistBuilder::new();
        b.add_net("n1", &["a", "a", "b", "a"]).unwrap();
        let netlist = b.finish();

        assert_eq!(netlist.cell_num(), 2);
        let net = netlist.net(NetId::new(0));
        assert_eq!(net.cells().len(), 2);
        assert_eq!(net.part_count(Part::A) + net.part_count(Part::B), 2);
    }

    #[test]
    fn empty_net_is_rejected() {
        let mut b = NetlistBuilder::new();
        let empty: [&str; 0] = [];
        let err = b.add_net("n1", &empty).unwrap_err();
        assert_eq!(
            err,
            BuildError::EmptyNet {
                net_name: "n1".to_owned()
            }
        );
    }

    #[test]
    fn duplicate_net_name_is_rejected() {
        let mut b = NetlistBuilder::new();
        b.add_net("n1", &["a"]).unwrap();
        let err = b.add_net("n1", &["b"]).unwrap_err();
        assert_eq!(err, BuildError::DuplicateNetName("n1".to_owned()));
    }

    #[test]
    fn recompute_cut_size_matches_trivial_example() {
        // Two identical nets over the same two cells, both land in part A.
        let mut b = NetlistBuilder::new();
        b.add_net("n1", &["c1", "c2"]).unwrap();
        b.add_net("n2", &["c1", "c2"]).unwrap();
        let netlist = b.finish();
        assert_eq!(netlist.recompute_cut_size(), 0);
    }
}

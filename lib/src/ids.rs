//! Dense arena indices used throughout the netlist and gain-bucket data structures.

index_vec::define_index_type! {
    /// Identifies a [`Cell`](crate::netlist::Cell) within a [`Netlist`](crate::netlist::Netlist).
    /// Assigned densely, starting at 0, in the order cells are first seen while parsing.
    pub struct CellId = u32;
}

index_vec::define_index_type! {
    /// Identifies a [`Net`](crate::netlist::Net) within a [`Netlist`](crate::netlist::Netlist).
    /// Assigned densely, starting at 0, in the order `NET` records are read.
    pub struct NetId = u32;
}

/// Identifies a node in a [`GainBuckets`](crate::buckets::GainBuckets) list. Every [`Cell`]
/// gets exactly one node, allocated once and reused for the cell's entire lifetime, so this is
/// just a more descriptive name for [`CellId`] at the bucket layer.
pub type NodeIdx = CellId;

pub type CellVec<T> = index_vec::IndexVec<CellId, T>;
pub type NetVec<T> = index_vec::IndexVec<NetId, T>;

/// Which side of the partition a cell currently sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    A,
    B,
}

impl Part {
    /// The other part. Moving a cell always goes `self -> self.opposite()`.
    pub fn opposite(self) -> Part {
        match self {
            Part::A => Part::B,
            Part::B => Part::A,
        }
    }

    /// Index into a `[T; 2]` keyed by part (`A` = 0, `B` = 1).
    pub fn index(self) -> usize {
        match self {
            Part::A => 0,
            Part::B => 1,
        }
    }

    pub fn from_index(idx: usize) -> Part {
        match idx {
            0 => Part::A,
            1 => Part::B,
            _ => panic!("part index must be 0 or 1, got {idx}"),
        }
    }

    /// The canonical seed alternates the initial part assigned to brand-new cells: every net
    /// introduces its first-seen cells into `Part::from_net_index(net's 0-based position)`.
    pub fn from_net_index(net_idx: usize) -> Part {
        Self::from_index(net_idx % 2)
    }
}

impl std::fmt::Display for Part {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match self {
            Part::A => "A",
            Part::B => "B",
        })
    }
}

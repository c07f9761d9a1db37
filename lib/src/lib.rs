//! Fiduccia-Mattheyses hypergraph bipartitioning.
//!
//! This crate owns the netlist model, the gain-bucket data structure and the pass engine built
//! on top of it, and the driver that repeats passes to convergence. It does no I/O: an external
//! parser builds a [`Netlist`](netlist::Netlist) via [`NetlistBuilder`](netlist::NetlistBuilder),
//! and an external reporter consumes the [`PartitionResult`](partitioner::PartitionResult) that
//! [`Partitioner::run`](partitioner::Partitioner::run) returns.

#![deny(clippy::all)]

mod buckets;
pub mod ids;
pub mod netlist;
mod pass;
pub mod partitioner;

pub use ids::{CellId, NetId, Part};
pub use netlist::{BuildError, Cell, Net, Netlist, NetlistBuilder};
pub use partitioner::{Config, PartitionResult, Partitioner};
pub use pass::PassReport;

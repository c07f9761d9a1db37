//! The driver loop: seeds the initial cut size, then repeats FM passes until one is unproductive.

use crate::ids::Part;
use crate::netlist::Netlist;
use crate::pass::{run_pass, PassReport};

/// Tunable knobs for a [`Partitioner`]. `balance_factor` is the only parameter the FM algorithm
/// itself exposes; everything else about a run (logging verbosity, reporting) is owned by the
/// caller, not the core crate.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Fraction in `(0, 1)`; each part must hold at least `floor(cell_num * balance_factor)`
    /// cells after every completed pass.
    pub balance_factor: f64,
}

impl Config {
    pub fn new(balance_factor: f64) -> Self {
        assert!(
            balance_factor > 0.0 && balance_factor < 1.0,
            "balance_factor must be in (0, 1), got {balance_factor}"
        );
        Self { balance_factor }
    }
}

/// Final outcome of a complete run: the cut size after the last (unproductive) pass, how many
/// passes were run, and the resulting per-part cell counts.
#[derive(Debug, Clone, Copy)]
pub struct PartitionResult {
    pub cut_size: usize,
    pub passes_run: usize,
    pub part_size: [u32; 2],
}

/// Drives repeated FM passes over a [`Netlist`] until one pass makes no improving move.
///
/// This owns the netlist for the partitioner's whole lifetime; passes run one after another on
/// the same execution context — single-threaded, synchronous, no suspension points.
pub struct Partitioner {
    netlist: Netlist,
    min_size: u32,
    cut_size: usize,
    passes_run: usize,
}

impl Partitioner {
    pub fn new(netlist: Netlist, config: Config) -> Self {
        let min_size = (netlist.cell_num() as f64 * config.balance_factor) as u32;
        let cut_size = netlist.recompute_cut_size();
        Self {
            netlist,
            min_size,
            cut_size,
            passes_run: 0,
        }
    }

    pub fn netlist(&self) -> &Netlist {
        &self.netlist
    }

    pub fn cut_size(&self) -> usize {
        self.cut_size
    }

    /// Runs passes until one is unproductive, calling `on_pass` after each pass with its report
    /// (the CLI crate uses this to print its per-pass progress line).
    pub fn run(&mut self, mut on_pass: impl FnMut(&PassReport)) -> PartitionResult {
        loop {
            let report = run_pass(&mut self.netlist, self.min_size);
            debug_assert_eq!(
                self.cut_size as i64 - report.max_acc_gain,
                self.netlist.recompute_cut_size() as i64,
                "cut size tracked incrementally must match a from-scratch recount",
            );
            self.cut_size -= report.max_acc_gain as usize;
            self.passes_run += 1;
            on_pass(&report);
            if !report.is_productive() {
                break;
            }
        }

        PartitionResult {
            cut_size: self.cut_size,
            passes_run: self.passes_run,
            part_size: [
                self.netlist.part_size(Part::A),
                self.netlist.part_size(Part::B),
            ],
        }
    }
}

//! Human-readable progress and summary reporting for the console.
//!
//! Not part of the program's contract (the output file is); these are just the `colored` console
//! lines the CLI crate prints alongside it.

use colored::Colorize;
use fm::{PartitionResult, PassReport};

/// Prints one pass's line, unless `quiet` suppresses per-pass output. Green for a strictly
/// improving pass, yellow for the final, unproductive one.
pub fn print_pass(report: &PassReport, quiet: bool) {
    if quiet {
        return;
    }
    let line = format!(
        "Best Move {} with Acc gain {}",
        report.best_move_num, report.max_acc_gain
    );
    if report.is_productive() {
        println!("{}", line.green());
    } else {
        println!("{}", line.yellow());
    }
    println!("{}", "=".repeat(45));
}

/// Prints the final summary: cut size, cell and net counts, and the per-part split.
pub fn print_summary(result: &PartitionResult, cell_num: usize, net_num: usize) {
    println!();
    println!("{}", "==================== Summary ====================".bold());
    println!(" Cutsize: {}", result.cut_size);
    println!(" Total cell number: {cell_num}");
    println!(" Total net number:  {net_num}");
    println!(" Cell Number of partition A: {}", result.part_size[0]);
    println!(" Cell Number of partition B: {}", result.part_size[1]);
    println!("{}", "=================================================".bold());
    println!();
}

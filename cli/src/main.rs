mod parser;
mod report;
mod writer;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use fm::{Config, Partitioner};
use structopt::StructOpt;

/// A Fiduccia-Mattheyses hypergraph bipartitioner.
#[derive(Debug, StructOpt)]
struct Args {
    /// Path to the input netlist file.
    input_path: PathBuf,
    /// Path to write the partition result to.
    output_path: PathBuf,
    /// Raise the log level; pass more than once for more detail.
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
    /// Suppress the per-pass progress report (the final summary still prints).
    #[structopt(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::from_args();
    let level = match args.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .init()
        .expect("only one logger is ever installed");

    if let Err(err) = run(args) {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let input = fs::read_to_string(&args.input_path)
        .with_context(|| format!("failed to read {}", args.input_path.display()))?;
    let parsed = parser::parse(&input)
        .with_context(|| format!("failed to parse {}", args.input_path.display()))?;

    let cell_num = parsed.netlist.cell_num();
    let net_num = parsed.netlist.net_num();

    let mut partitioner = Partitioner::new(parsed.netlist, Config::new(parsed.balance_factor));
    let result = partitioner.run(|pass_report| report::print_pass(pass_report, args.quiet));
    report::print_summary(&result, cell_num, net_num);

    let rendered = writer::render(partitioner.netlist(), result.cut_size);
    fs::write(&args.output_path, rendered)
        .with_context(|| format!("failed to write {}", args.output_path.display()))?;

    Ok(())
}

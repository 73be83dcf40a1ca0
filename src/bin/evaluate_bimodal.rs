//! Evaluate a single bimodal configuration against one trace.
//!
//! Prints one result record: `<trace>, <counter bits>, <addr bits>,
//! <accuracy>`.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use bimodal::predictor::{BimodalPredictor, DirectionPredictor};
use bimodal::sim;
use bimodal::trace::TraceReader;

#[derive(Parser)]
#[command(version, about = "Replay one trace through a bimodal predictor")]
struct Cli {
    /// Path to the trace file
    trace: PathBuf,

    /// Saturating counter width in bits
    #[arg(short = 'c', long, default_value_t = 2)]
    counter_bits: u32,

    /// Table address width in bits (the table has 2^n entries)
    #[arg(short = 'a', long, default_value_t = 1)]
    addr_bits: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Cli::parse();

    let mut bp = BimodalPredictor::new(args.counter_bits, args.addr_bits)?;
    let trace = TraceReader::open(&args.trace)
        .with_context(|| format!("opening trace {}", args.trace.display()))?;

    log::info!(
        "evaluating {} with {} ({} counter bits, {} table entries)",
        args.trace.display(),
        bp.name(),
        bp.counter_bits(),
        bp.table_size(),
    );

    let stats = sim::evaluate(&mut bp, trace)?;
    log::debug!("{} hits, {} misses", stats.hits, stats.misses());
    println!(
        "{}, {}, {}, {}",
        args.trace.display(),
        args.counter_bits,
        args.addr_bits,
        stats.hit_rate()
    );
    Ok(())
}

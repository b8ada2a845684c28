//! TRIADIC: triadic associative memory for sparse distributed representations.
//!
//! This is the CLI binary entry point. By default it reads `{x, y, z}`
//! commands from stdin and writes recalls to stdout; `--test` runs the
//! built-in store/recall benchmark instead.

use std::io;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use triadic::config::{BENCH_COUNT, DEFAULT_N, DEFAULT_P};
use triadic::memory::triadic::{MemoryConfig, TriadicMemory};
use triadic::protocol::session::Session;
use triadic::runtime::bench::{run_benchmark, BenchConfig};
use triadic::sdr::sampler::SdrSampler;

/// TRIADIC memory CLI.
#[derive(Parser, Debug)]
#[command(
    name = "triadic",
    about = "Triadic memory: store {x,y,z} triples of SDRs, recall any part from the other two",
    version
)]
struct Cli {
    /// Universe size (SDR dimension), typically 1000.
    #[arg(default_value_t = DEFAULT_N)]
    n: usize,

    /// Target sparse population, typically 10.
    #[arg(default_value_t = DEFAULT_P)]
    p: usize,

    /// Run the store/recall benchmark instead of reading commands.
    #[arg(long, default_value_t = false)]
    test: bool,

    /// Number of triples stored by the benchmark.
    #[arg(long, default_value_t = BENCH_COUNT)]
    count: usize,

    /// Seed for random SDRs (entropy-seeded if omitted).
    #[arg(long)]
    seed: Option<u64>,

    /// Disable rayon-parallel recall.
    #[arg(long, default_value_t = false)]
    sequential: bool,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the protocol.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!("TRIADIC v{}", env!("CARGO_PKG_VERSION"));

    let mut config = MemoryConfig::new(cli.n, cli.p);
    if cli.sequential {
        config = config.with_parallel_recall(false);
    }

    if cli.test {
        let report = run_benchmark(&BenchConfig {
            memory: config,
            count: cli.count,
            seed: cli.seed.unwrap_or_else(rand::random),
        })
        .context("benchmark failed")?;

        println!(
            "{} triples, n={}, p={}: insert {:.3} s ({:.0} per sec)",
            report.count, report.n, report.p, report.insert.elapsed_secs, report.insert.ops_per_sec
        );
        for axis in &report.axes {
            println!(
                "recall {}: {:.3} s ({:.0} per sec), {} errors",
                axis.axis, axis.timing.elapsed_secs, axis.timing.ops_per_sec, axis.mismatches
            );
        }
        if report.total_mismatches() > 0 {
            tracing::warn!("{} recall errors", report.total_mismatches());
        }
        return Ok(());
    }

    let memory = TriadicMemory::new(config).context("failed to create triadic memory")?;
    let sampler = match cli.seed {
        Some(seed) => SdrSampler::seeded(cli.n, seed),
        None => SdrSampler::new(cli.n),
    };

    let mut session = Session::new(memory, sampler);
    let stdin = io::stdin();
    let stdout = io::stdout();
    session.run(stdin.lock(), stdout.lock())?;

    Ok(())
}

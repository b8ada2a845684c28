//! Self-test benchmark.
//!
//! Stores `count` random triples, then recalls every part of every triple
//! and compares the result position by position against what was stored.
//! Each phase is timed.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::memory::recall::Axis;
use crate::memory::triadic::{MemoryConfig, TriadicMemory};
use crate::sdr::sampler::SdrSampler;
use crate::sdr::sdr::Sdr;

/// Benchmark parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchConfig {
    pub memory: MemoryConfig,

    /// Number of triples to store and recall.
    pub count: usize,

    /// Sampler seed.
    pub seed: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            memory: MemoryConfig::default(),
            count: crate::config::BENCH_COUNT,
            seed: 0,
        }
    }
}

/// Timing for one phase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseTiming {
    pub elapsed_secs: f64,
    pub ops_per_sec: f64,
}

impl PhaseTiming {
    fn new(elapsed_secs: f64, ops: usize) -> Self {
        let ops_per_sec = if elapsed_secs > 0.0 {
            ops as f64 / elapsed_secs
        } else {
            f64::INFINITY
        };
        Self {
            elapsed_secs,
            ops_per_sec,
        }
    }
}

/// Recall results for one axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisReport {
    pub axis: Axis,
    pub timing: PhaseTiming,

    /// Positions that differ from the stored part.
    pub mismatches: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BenchReport {
    pub n: usize,
    pub p: usize,
    pub count: usize,
    pub insert: PhaseTiming,
    pub axes: Vec<AxisReport>,
}

impl BenchReport {
    pub fn total_mismatches(&self) -> usize {
        self.axes.iter().map(|a| a.mismatches).sum()
    }
}

/// Positions of `stored` not reproduced at the same rank in `recalled`.
pub fn count_mismatches(stored: &Sdr, recalled: &Sdr) -> usize {
    stored
        .positions()
        .iter()
        .enumerate()
        .filter(|&(rank, pos)| recalled.positions().get(rank) != Some(pos))
        .count()
}

/// Run the store / recall benchmark.
pub fn run_benchmark(config: &BenchConfig) -> Result<BenchReport> {
    let (n, p) = (config.memory.n, config.memory.p);
    tracing::info!(
        "Benchmark: n={}, p={}, {} triples",
        n,
        p,
        config.count
    );

    let mut memory = TriadicMemory::new(config.memory.clone())?;
    let mut sampler = SdrSampler::seeded(n, config.seed);
    let triples: Vec<[Sdr; 3]> = (0..config.count)
        .map(|_| [sampler.random(p), sampler.random(p), sampler.random(p)])
        .collect();

    let start = Instant::now();
    for [x, y, z] in &triples {
        memory.write(x, y, z)?;
    }
    let insert = PhaseTiming::new(start.elapsed().as_secs_f64(), triples.len());
    tracing::info!(
        "Insert: {:.3} s ({:.0} per sec)",
        insert.elapsed_secs,
        insert.ops_per_sec
    );

    let mut axes = Vec::with_capacity(3);
    for axis in [Axis::Z, Axis::Y, Axis::X] {
        let start = Instant::now();
        let recalled = triples
            .iter()
            .map(|[x, y, z]| match axis {
                Axis::X => memory.read_x(y, z),
                Axis::Y => memory.read_y(x, z),
                Axis::Z => memory.read_z(x, y),
            })
            .collect::<Result<Vec<Sdr>>>()?;
        let timing = PhaseTiming::new(start.elapsed().as_secs_f64(), triples.len());

        let mismatches = triples
            .iter()
            .zip(&recalled)
            .map(|(parts, got)| {
                let stored = match axis {
                    Axis::X => &parts[0],
                    Axis::Y => &parts[1],
                    Axis::Z => &parts[2],
                };
                count_mismatches(stored, got)
            })
            .sum();

        tracing::info!(
            "Recall {}: {:.3} s ({:.0} per sec), {} mismatches",
            axis,
            timing.elapsed_secs,
            timing.ops_per_sec,
            mismatches
        );
        axes.push(AxisReport {
            axis,
            timing,
            mismatches,
        });
    }

    Ok(BenchReport {
        n,
        p,
        count: config.count,
        insert,
        axes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sdr(n: usize, p: &[usize]) -> Sdr {
        Sdr::from_positions(n, p.iter().copied()).unwrap()
    }

    #[test]
    fn test_count_mismatches() {
        let stored = sdr(20, &[1, 5, 9]);
        assert_eq!(count_mismatches(&stored, &stored), 0);
        assert_eq!(count_mismatches(&stored, &sdr(20, &[1, 5])), 1);
        assert_eq!(count_mismatches(&stored, &sdr(20, &[0, 1, 5, 9])), 3);
        assert_eq!(count_mismatches(&stored, &Sdr::new(20)), 3);
    }

    #[test]
    fn test_small_benchmark_is_exact() {
        let config = BenchConfig {
            memory: MemoryConfig::new(150, 5),
            count: 40,
            seed: 3,
        };
        let report = run_benchmark(&config).unwrap();
        assert_eq!(report.axes.len(), 3);
        assert_eq!(report.axes[0].axis, Axis::Z);
        assert_eq!(report.count, 40);
        assert_eq!(report.total_mismatches(), 0, "{:?}", report);
    }

    #[test]
    fn test_invalid_config_propagates() {
        let config = BenchConfig {
            memory: MemoryConfig::new(5, 10),
            count: 1,
            seed: 0,
        };
        assert!(run_benchmark(&config).is_err());
    }
}

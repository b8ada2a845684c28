//! # TRIADIC
//!
//! An associative memory for triples of sparse distributed representations
//! (SDRs). Store `{x, y, z}`, then recall any one part from the other two.
//!
//! ## Components
//!
//! 1. **SDR**: sorted sparse sets over a universe `[0, n)`, random sampling
//!    without replacement, sparse Hamming distance
//! 2. **Binarizer**: rank-threshold conversion of dense scores back to an SDR
//! 3. **Counting tensor**: a dense `n × n × n` cube of saturating `u8` counters
//! 4. **Recall**: fibre projection along the unknown axis, then binarization
//! 5. **Protocol**: the `{x, y, z}` line protocol and its command loop
//!
//! ## Memory layout
//!
//! A triple with `p` active positions per part touches `p³` cells on write.
//! Recall sums `p²` fibres of length `n`. With `n = 1000` the cube is 1 GB;
//! it is allocated zeroed and relies on the OS mapping pages lazily.

pub mod error;
pub mod memory;
pub mod protocol;
pub mod runtime;
pub mod sdr;

pub use error::{Result, TriadicError};
pub use memory::triadic::{MemoryConfig, Slot, Triple, TriadicMemory};
pub use sdr::sdr::Sdr;

/// Crate-wide constants.
pub mod config {
    /// Default universe size (positions per axis).
    pub const DEFAULT_N: usize = 1000;

    /// Default target sparsity.
    pub const DEFAULT_P: usize = 10;

    /// Counter storage type of the tensor.
    pub type Counter = u8;

    /// Saturation point of a tensor counter.
    pub const COUNTER_MAX: Counter = Counter::MAX;

    /// Universe sizes at or above this use rayon for recall projection.
    pub const PARALLEL_RECALL_MIN_N: usize = 512;

    /// Protocol version reported by the `version` command.
    pub const VERSION_MAJOR: u32 = 1;
    pub const VERSION_MINOR: u32 = 2;

    /// Separator between the three parts of a wire triple.
    pub const SEPARATOR: char = ',';

    /// Marks the unknown part of a recall query.
    pub const QUERY: char = '_';

    /// Prefix turning a store into a delete.
    pub const DELETE_PREFIX: char = '-';

    /// Number of triples stored by the built-in benchmark.
    pub const BENCH_COUNT: usize = 10_000;

    /// Protocol version as printed on the wire.
    pub fn version_string() -> String {
        format!("{}.{}", VERSION_MAJOR, VERSION_MINOR)
    }
}

//! The triadic memory: store `{x, y, z}` and recall any part from the other two.
//!
//! A `TriadicMemory` owns one counting tensor and an immutable
//! `MemoryConfig`. Writers take `&mut self`, readers `&self`, so concurrent
//! recalls are safe and writes are serialised by the borrow checker.
//!
//! Queries use an explicit `Slot` per part: `Concrete(sdr)` for a known
//! value, `Unknown` for the part to recall. A triple with no unknown slot is
//! a store or delete; exactly one unknown slot is a recall.

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_N, DEFAULT_P, PARALLEL_RECALL_MIN_N};
use crate::error::{Result, TriadicError};
use crate::memory::recall::{project, project_parallel, Axis};
use crate::memory::tensor::{CountingTensor, TensorStats};
use crate::sdr::binarize::binarize;
use crate::sdr::sdr::Sdr;

/// Memory configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Universe size per axis.
    pub n: usize,

    /// Target sparsity used when binarizing recalls.
    pub p: usize,

    /// Split recall projection across rayon threads.
    pub parallel_recall: bool,
}

impl MemoryConfig {
    pub fn new(n: usize, p: usize) -> Self {
        Self {
            n,
            p,
            parallel_recall: n >= PARALLEL_RECALL_MIN_N,
        }
    }

    pub fn with_parallel_recall(mut self, enabled: bool) -> Self {
        self.parallel_recall = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n == 0 {
            return Err(TriadicError::InvalidConfig("n must be positive".into()));
        }
        if self.p == 0 {
            return Err(TriadicError::InvalidConfig("p must be positive".into()));
        }
        if self.p > self.n {
            return Err(TriadicError::InvalidConfig(format!(
                "p={} exceeds n={}",
                self.p, self.n
            )));
        }
        Ok(())
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_N, DEFAULT_P)
    }
}

/// One part of a triple: a known SDR or the part to recall.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    Concrete(Sdr),
    Unknown,
}

impl Slot {
    pub fn as_concrete(&self) -> Option<&Sdr> {
        match self {
            Slot::Concrete(s) => Some(s),
            Slot::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Slot::Unknown)
    }
}

impl From<Sdr> for Slot {
    fn from(sdr: Sdr) -> Self {
        Slot::Concrete(sdr)
    }
}

/// A triple of slots, as submitted by a caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Triple {
    pub x: Slot,
    pub y: Slot,
    pub z: Slot,
}

impl Triple {
    pub fn new(x: impl Into<Slot>, y: impl Into<Slot>, z: impl Into<Slot>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            z: z.into(),
        }
    }

    /// `None` if every slot is concrete, the unknown axis if exactly one is,
    /// an error otherwise.
    pub fn unknown_axis(&self) -> Result<Option<Axis>> {
        let unknown: Vec<Axis> = [(Axis::X, &self.x), (Axis::Y, &self.y), (Axis::Z, &self.z)]
            .into_iter()
            .filter(|(_, slot)| slot.is_unknown())
            .map(|(axis, _)| axis)
            .collect();

        match unknown.as_slice() {
            [] => Ok(None),
            [axis] => Ok(Some(*axis)),
            _ => Err(TriadicError::InvalidQuery(format!(
                "{} unknown parts, expected at most one",
                unknown.len()
            ))),
        }
    }

    /// All three parts, if none is unknown.
    pub fn concrete(&self) -> Option<(&Sdr, &Sdr, &Sdr)> {
        Some((
            self.x.as_concrete()?,
            self.y.as_concrete()?,
            self.z.as_concrete()?,
        ))
    }
}

/// Diagnostics for a memory instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub n: usize,
    pub p: usize,
    pub writes: u64,
    pub deletes: u64,
    pub tensor: TensorStats,
    pub bytes: usize,
}

/// Associative memory over triples of SDRs.
pub struct TriadicMemory {
    config: MemoryConfig,
    tensor: CountingTensor,
    writes: u64,
    deletes: u64,
}

impl TriadicMemory {
    /// Allocate a memory. Fails on an invalid config or if the `n³` cube
    /// cannot be allocated.
    pub fn new(config: MemoryConfig) -> Result<Self> {
        config.validate()?;
        let tensor = CountingTensor::new(config.n)?;
        tracing::info!(
            "Triadic memory allocated: n={}, p={}, {} bytes, parallel recall {}",
            config.n,
            config.p,
            tensor.size_bytes(),
            if config.parallel_recall { "on" } else { "off" },
        );
        Ok(Self {
            config,
            tensor,
            writes: 0,
            deletes: 0,
        })
    }

    /// Shorthand for `new(MemoryConfig::new(n, p))`.
    pub fn with_size(n: usize, p: usize) -> Result<Self> {
        Self::new(MemoryConfig::new(n, p))
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Universe size.
    pub fn n(&self) -> usize {
        self.config.n
    }

    /// Target sparsity.
    pub fn p(&self) -> usize {
        self.config.p
    }

    /// Read-only access to the counter cube.
    pub fn tensor(&self) -> &CountingTensor {
        &self.tensor
    }

    /// Store `{x, y, z}`: increment every cell of `x × y × z`.
    pub fn write(&mut self, x: &Sdr, y: &Sdr, z: &Sdr) -> Result<()> {
        self.check(&[x, y, z])?;
        let saturated = self
            .tensor
            .increment_product(x.positions(), y.positions(), z.positions());
        if saturated > 0 {
            tracing::warn!("write hit {} saturated counters", saturated);
        }
        self.writes += 1;
        Ok(())
    }

    /// Remove `{x, y, z}`: decrement every cell of `x × y × z`, never below zero.
    pub fn delete(&mut self, x: &Sdr, y: &Sdr, z: &Sdr) -> Result<()> {
        self.check(&[x, y, z])?;
        let floored = self
            .tensor
            .decrement_product(x.positions(), y.positions(), z.positions());
        if floored > 0 {
            tracing::debug!("delete found {} cells already at zero", floored);
        }
        self.deletes += 1;
        Ok(())
    }

    /// Recall `x` from `{_, y, z}`.
    pub fn read_x(&self, y: &Sdr, z: &Sdr) -> Result<Sdr> {
        self.read(Axis::X, y, z)
    }

    /// Recall `y` from `{x, _, z}`.
    pub fn read_y(&self, x: &Sdr, z: &Sdr) -> Result<Sdr> {
        self.read(Axis::Y, x, z)
    }

    /// Recall `z` from `{x, y, _}`.
    pub fn read_z(&self, x: &Sdr, y: &Sdr) -> Result<Sdr> {
        self.read(Axis::Z, x, y)
    }

    /// Recall the part on `axis`; `a` and `b` are the known parts in axis order.
    pub fn read(&self, axis: Axis, a: &Sdr, b: &Sdr) -> Result<Sdr> {
        self.check(&[a, b])?;
        let scores = self.scores(axis, a, b);
        let recalled = match scores.as_slice() {
            Some(slice) => binarize(slice, self.config.p),
            None => binarize(&scores.to_vec(), self.config.p),
        };
        tracing::debug!("recall {}: {} positions", axis, recalled.len());
        Ok(recalled)
    }

    /// Dense per-candidate scores for the unknown `axis`, before binarization.
    pub fn scores(&self, axis: Axis, a: &Sdr, b: &Sdr) -> ndarray::Array1<u32> {
        if self.config.parallel_recall {
            project_parallel(&self.tensor, axis, a, b)
        } else {
            project(&self.tensor, axis, a, b)
        }
    }

    /// Recall the single unknown part of `query`.
    pub fn recall(&self, query: &Triple) -> Result<(Axis, Sdr)> {
        let axis = query.unknown_axis()?.ok_or_else(|| {
            TriadicError::InvalidQuery("recall needs exactly one unknown part".into())
        })?;
        let known = |slot: &Slot| {
            slot.as_concrete()
                .cloned()
                .ok_or_else(|| TriadicError::InvalidQuery("missing known part".into()))
        };
        let (a, b) = match axis {
            Axis::X => (known(&query.y)?, known(&query.z)?),
            Axis::Y => (known(&query.x)?, known(&query.z)?),
            Axis::Z => (known(&query.x)?, known(&query.y)?),
        };
        Ok((axis, self.read(axis, &a, &b)?))
    }

    /// Write a fully concrete triple.
    pub fn store(&mut self, triple: &Triple) -> Result<()> {
        let (x, y, z) = triple
            .concrete()
            .ok_or_else(|| TriadicError::InvalidQuery("cannot store a triple with unknown parts".into()))?;
        self.write(x, y, z)
    }

    /// Delete a fully concrete triple.
    pub fn remove(&mut self, triple: &Triple) -> Result<()> {
        let (x, y, z) = triple
            .concrete()
            .ok_or_else(|| TriadicError::InvalidQuery("cannot delete a triple with unknown parts".into()))?;
        self.delete(x, y, z)
    }

    /// Full diagnostics. Scans the whole cube.
    pub fn stats(&self) -> MemoryStats {
        MemoryStats {
            n: self.config.n,
            p: self.config.p,
            writes: self.writes,
            deletes: self.deletes,
            tensor: self.tensor.stats(),
            bytes: self.size_bytes(),
        }
    }

    /// Memory footprint of the counter cube.
    pub fn size_bytes(&self) -> usize {
        self.tensor.size_bytes()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.tensor.clear();
        self.writes = 0;
        self.deletes = 0;
    }

    fn check(&self, parts: &[&Sdr]) -> Result<()> {
        parts.iter().try_for_each(|s| s.check_universe(self.config.n))
    }
}

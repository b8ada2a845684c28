//! Dense `n × n × n` counting tensor.
//!
//! Cell `(i, j, k)` counts the stored triples whose x, y and z parts contain
//! `i`, `j` and `k` respectively. Counters are `u8`: increments saturate at
//! `COUNTER_MAX`, decrements stop at zero.
//!
//! The cube is allocated once, zeroed, through the global allocator. Pages
//! are mapped lazily by the OS, so a 1 GB cube for `n = 1000` only becomes
//! resident where triples have been written.

use std::alloc::{alloc_zeroed, Layout};

use ndarray::{s, Array3, ArrayView1};

use crate::config::{Counter, COUNTER_MAX};
use crate::error::{Result, TriadicError};
use crate::memory::recall::Axis;

/// Summary of the counter cube's contents.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TensorStats {
    /// Cells with a non-zero count.
    pub nonzero_cells: u64,

    /// Cells pinned at `COUNTER_MAX`.
    pub saturated_cells: u64,

    /// Sum of all counters.
    pub total_count: u64,
}

/// The `n³` counter cube, indexed `[x, y, z]`.
pub struct CountingTensor {
    n: usize,
    cells: Array3<Counter>,
}

impl CountingTensor {
    /// Allocate a zeroed cube for universe size `n`.
    pub fn new(n: usize) -> Result<Self> {
        let too_large = || TriadicError::Allocation {
            n,
            bytes: (n as u128).saturating_pow(3) * std::mem::size_of::<Counter>() as u128,
        };

        let len = n
            .checked_mul(n)
            .and_then(|sq| sq.checked_mul(n))
            .ok_or_else(too_large)?;
        let buffer = alloc_zeroed_counters(len).ok_or_else(too_large)?;
        let cells = Array3::from_shape_vec((n, n, n), buffer)
            .map_err(|e| TriadicError::InvalidConfig(e.to_string()))?;

        Ok(Self { n, cells })
    }

    /// Universe size along each axis.
    pub fn universe(&self) -> usize {
        self.n
    }

    /// Counter value at `(i, j, k)`.
    pub fn get(&self, i: usize, j: usize, k: usize) -> Counter {
        self.cells[[i, j, k]]
    }

    /// Saturating increment. Returns `false` if the cell was already full.
    #[inline]
    pub fn increment(&mut self, i: usize, j: usize, k: usize) -> bool {
        let cell = &mut self.cells[[i, j, k]];
        if *cell == COUNTER_MAX {
            return false;
        }
        *cell += 1;
        true
    }

    /// Decrement clamped at zero. Returns `false` if the cell was already empty.
    #[inline]
    pub fn decrement(&mut self, i: usize, j: usize, k: usize) -> bool {
        let cell = &mut self.cells[[i, j, k]];
        if *cell == 0 {
            return false;
        }
        *cell -= 1;
        true
    }

    /// Increment every cell of `xs × ys × zs`.
    /// Returns the number of cells that were already saturated.
    pub fn increment_product(&mut self, xs: &[usize], ys: &[usize], zs: &[usize]) -> usize {
        let mut saturated = 0;
        for &i in xs {
            for &j in ys {
                for &k in zs {
                    if !self.increment(i, j, k) {
                        saturated += 1;
                    }
                }
            }
        }
        saturated
    }

    /// Decrement every cell of `xs × ys × zs`.
    /// Returns the number of cells that were already zero.
    pub fn decrement_product(&mut self, xs: &[usize], ys: &[usize], zs: &[usize]) -> usize {
        let mut floored = 0;
        for &i in xs {
            for &j in ys {
                for &k in zs {
                    if !self.decrement(i, j, k) {
                        floored += 1;
                    }
                }
            }
        }
        floored
    }

    /// The fibre along `axis` through the two fixed coordinates.
    ///
    /// For `Axis::X`, `(a, b)` are `(j, k)`; for `Axis::Y`, `(i, k)`;
    /// for `Axis::Z`, `(i, j)`. Z fibres are contiguous.
    pub fn fibre(&self, axis: Axis, a: usize, b: usize) -> ArrayView1<'_, Counter> {
        match axis {
            Axis::X => self.cells.slice(s![.., a, b]),
            Axis::Y => self.cells.slice(s![a, .., b]),
            Axis::Z => self.cells.slice(s![a, b, ..]),
        }
    }

    /// Scan the whole cube. Touches every page.
    pub fn stats(&self) -> TensorStats {
        self.cells.iter().fold(TensorStats::default(), |mut acc, &c| {
            if c > 0 {
                acc.nonzero_cells += 1;
                acc.total_count += c as u64;
            }
            if c == COUNTER_MAX {
                acc.saturated_cells += 1;
            }
            acc
        })
    }

    /// True if every counter is zero.
    pub fn is_zero(&self) -> bool {
        self.cells.iter().all(|&c| c == 0)
    }

    /// Reset every counter to zero.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Size of the counter cube in bytes.
    pub fn size_bytes(&self) -> usize {
        self.cells.len() * std::mem::size_of::<Counter>()
    }
}

/// Zeroed buffer of `len` counters, or `None` if the allocator refuses.
fn alloc_zeroed_counters(len: usize) -> Option<Vec<Counter>> {
    if len == 0 {
        return Some(Vec::new());
    }
    let layout = Layout::array::<Counter>(len).ok()?;
    // SAFETY: `layout` has non-zero size.
    let ptr = unsafe { alloc_zeroed(layout) } as *mut Counter;
    if ptr.is_null() {
        return None;
    }
    // SAFETY: `ptr` comes from the global allocator with the layout of a
    // `Vec<Counter>` of capacity `len`, and all `len` elements are zeroed,
    // which is a valid `Counter`.
    Some(unsafe { Vec::from_raw_parts(ptr, len, len) })
}

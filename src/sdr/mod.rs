//! Sparse distributed representations.
//!
//! - **`Sdr`**: sorted, duplicate-free position sets over `[0, n)`
//! - **Sampling**: uniform selection of `p` positions without replacement
//! - **Binarization**: rank-threshold conversion of dense scores to an SDR

pub mod binarize;
pub mod sampler;
#[allow(clippy::module_inception)]
pub mod sdr;

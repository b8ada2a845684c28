//! Triadic associative memory.
//!
//! - **Counting tensor**: dense `n³` cube of saturating counters
//! - **Recall**: fibre projection along the unknown axis
//! - **TriadicMemory**: write / delete / read over `{x, y, z}` triples

pub mod recall;
pub mod tensor;
pub mod triadic;

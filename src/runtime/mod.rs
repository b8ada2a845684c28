//! Runtime utilities around the memory core.
//!
//! - Self-test benchmark: store random triples, recall them, time and score

pub mod bench;

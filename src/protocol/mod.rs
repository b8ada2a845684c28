//! Line protocol for driving a memory from text.
//!
//! A triple is written `{x, y, z}` with each part a whitespace-separated list
//! of 1-indexed positions. `_` marks the part to recall, a leading `-` turns a
//! store into a delete. The keywords `random`, `version` and `quit` are also
//! accepted.

pub mod parser;
pub mod session;

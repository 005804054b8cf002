//! # Core Models Module
//!
//! Data structures describing a benchmarking run.
//!
//! - [`ids`] - Identifier types for molecules and conformers
//! - [`method`] - The three energy methods and their display labels
//! - [`ensemble`] - A conformer ensemble stored as aligned parallel arrays
//! - [`metadata`] - Per-molecule ensemble metadata written at sampling time
//! - [`database`] - The persisted relative-energy database consumed by downstream stages
//!
//! The central invariant lives in [`ensemble::ConformerEnsemble`]: the conformer index
//! vector and the three method energy vectors always have identical length and ordering.
//! Every reordering or deletion goes through methods that touch all four arrays at once.

pub mod database;
pub mod ensemble;
pub mod ids;
pub mod metadata;
pub mod method;

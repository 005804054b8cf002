//! # Core Module
//!
//! Stateless building blocks shared by the engine and the workflows.
//!
//! - **Data Models** ([`models`]) - Molecule ids, conformer ensembles as parallel arrays,
//!   ensemble metadata, and the persisted energy database
//! - **File I/O** ([`io`]) - Energy records, listings, metadata, trajectories and the
//!   energy database
//! - **Units** ([`units`]) - Energy unit conversion constants
//! - **Utilities** ([`utils`]) - Rank statistics and deviation measures

pub mod io;
pub mod models;
pub mod units;
pub mod utils;

//! Readers and writers for the files that make up a run directory.
//!
//! - [`energy`] - the single-scalar energy record a method leaves per conformer
//! - [`listing`] - one-integer-per-line files (run manifest, retained conformer index)
//! - [`metadata`] - the per-molecule `conformer.json`
//! - [`xyz`] - frame extraction from multi-structure XYZ trajectories
//! - [`database`] - the persisted [`EnergyDatabase`](crate::core::models::database::EnergyDatabase)
//!
//! Every reader takes an explicit path; none of them consults the process working directory.

pub mod database;
pub mod energy;
pub mod listing;
pub mod metadata;
pub mod xyz;

//! # Workflows Module
//!
//! Complete procedures over a run directory. These are the entry points the CLI calls.
//!
//! - [`sample`] - run the external conformer sampler for every molecule on a worker pool
//! - [`select`] - subsample each sampled ensemble and extract the retained geometries
//! - [`collect`] - load, deduplicate and normalize every molecule into the energy database
//! - [`benchmark`] - rank correlation and RMSD of the cheap methods against the reference
//! - [`archive`] - build the result archive and its driver script
//!
//! Every workflow takes the working root as an explicit argument. Per-molecule failures are
//! logged and reported in the result; only [`EngineError`](crate::engine::error::EngineError)
//! aborts a workflow.

pub mod archive;
pub mod benchmark;
pub mod collect;
pub mod sample;
pub mod select;

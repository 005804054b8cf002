//! # Engine Module
//!
//! The per-molecule algorithms of a benchmarking run and the machinery around them.
//!
//! ## Overview
//!
//! A run moves every molecule through the same pipeline: its conformer ensemble is loaded
//! from the run directory ([`loader`]), sorted and stripped of near-degenerate members
//! ([`filter`]), and converted to energies relative to the reference minimum
//! ([`normalize`]). The resulting database feeds the cross-method statistics
//! ([`benchmark`]) and the result archive ([`archive`], with geometry conversion in
//! [`convert`]).
//!
//! Before any of this, ensembles are produced by an external sampler running on a bounded
//! worker pool ([`scheduler`]) and subsampled to a manageable size ([`selection`]).
//!
//! ## Error tiers
//!
//! [`error::MoleculeError`] covers everything that only disqualifies one molecule; the
//! workflows log it and continue. [`error::EngineError`] aborts the run.

pub mod archive;
pub mod benchmark;
pub mod config;
pub mod convert;
pub mod error;
pub mod filter;
pub mod loader;
pub mod normalize;
pub mod progress;
pub mod scheduler;
pub mod selection;

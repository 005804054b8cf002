//! # confbench Core Library
//!
//! Conformer ranking, deduplication and cross-method energy benchmarking for conformer
//! ensembles produced by a computational-chemistry screening pipeline.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture so that each concern can be
//! tested on its own.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`ConformerEnsemble`,
//!   `EnergyDatabase`), unit constants, statistics, and the readers and writers for the
//!   on-disk formats of a run directory.
//!
//! - **[`engine`]: The Logic Core.** The per-molecule algorithms: ensemble loading,
//!   degenerate-conformer filtering, relative-energy normalization, cross-method
//!   benchmarking, archive construction, geometry conversion, and the sampling pool
//!   scheduler. It also owns configuration, error tiers, and progress reporting.
//!
//! - **[`workflows`]: The Public API.** Complete procedures over a whole run directory
//!   (`collect`, `benchmark`, `archive`, `select`, `sample`). Each workflow takes an
//!   explicit working root and never changes the process-wide current directory.

pub mod core;
pub mod engine;
pub mod workflows;

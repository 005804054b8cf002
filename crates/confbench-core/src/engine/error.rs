use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::database::DatabaseError;
use crate::core::io::energy::EnergyRecordError;
use crate::core::io::listing::ListingError;
use crate::core::io::metadata::MetadataError;
use crate::core::io::xyz::XyzError;
use crate::core::models::ensemble::EnsembleError;
use crate::core::models::ids::ConformerIndex;
use crate::core::models::method::Method;
use std::path::PathBuf;

/// A failure confined to one molecule. The molecule is excluded and the run continues.
#[derive(Debug, Error)]
pub enum MoleculeError {
    #[error(transparent)]
    EnergyRecord(#[from] EnergyRecordError),

    #[error(transparent)]
    Listing(#[from] ListingError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Trajectory(#[from] XyzError),

    #[error(transparent)]
    Ensemble(#[from] EnsembleError),

    #[error("Conformer {conformer} has no {method} directory at '{}'", .path.display())]
    MissingMethodDirectory {
        conformer: ConformerIndex,
        method: Method,
        path: PathBuf,
    },

    #[error("No retained conformers")]
    NoConformers,

    #[error("Net charge {charge} is not zero")]
    ChargedSpecies { charge: i32 },

    #[error("Sampling failed: {reason}")]
    Sampling { reason: String },

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A failure that aborts the whole run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Run manifest not found: '{}'", .path.display())]
    MissingManifest { path: PathBuf },

    #[error("Archive directory '{}' already exists; use wipe mode to replace it", .path.display())]
    ArchiveExists { path: PathBuf },

    #[error("Required archive source missing: '{}'", .path.display())]
    MissingArchiveSource { path: PathBuf },

    #[error("Geometry conversion failed for '{}': {reason}", .path.display())]
    Conversion { path: PathBuf, reason: String },

    #[error("Energy database holds no molecules")]
    EmptyDatabase,

    #[error("Invalid run manifest: {source}")]
    Manifest {
        #[from]
        source: ListingError,
    },

    #[error("Energy database error: {source}")]
    Database {
        #[from]
        source: DatabaseError,
    },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Failed to build the sampling pool: {0}")]
    ThreadPool(String),

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| EngineError::Io { path, source }
    }
}

impl MoleculeError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| MoleculeError::Io { path, source }
    }
}

use crate::core::models::metadata::{EnsembleMetadata, SamplingRecord};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Metadata file not found: '{}'", .path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid metadata in '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on metadata '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub fn read_metadata(path: &Path) -> Result<EnsembleMetadata, MetadataError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => MetadataError::NotFound {
            path: path.to_path_buf(),
        },
        _ => MetadataError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    serde_json::from_str(&content).map_err(|e| MetadataError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn write_sampling_record(path: &Path, record: &SamplingRecord) -> Result<(), MetadataError> {
    let json = serde_json::to_string_pretty(record).map_err(|e| MetadataError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, json).map_err(|e| MetadataError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sampling_record_round_trips_through_metadata_reader() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conformer.json");
        let record = SamplingRecord::from_energies(
            EnsembleMetadata {
                natoms: 9,
                charge: 1,
                nconf: 2,
                name: Some("702".to_string()),
            },
            vec![0.0, 0.8],
        );
        write_sampling_record(&path, &record).unwrap();

        let metadata = read_metadata(&path).unwrap();
        assert_eq!(metadata, record.metadata);
    }

    #[test]
    fn missing_required_key_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conformer.json");
        fs::write(&path, r#"{"natoms": 3, "nconf": 4}"#).unwrap();

        let result = read_metadata(&path);
        assert!(matches!(result, Err(MetadataError::Parse { .. })));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let result = read_metadata(&dir.path().join("conformer.json"));
        assert!(matches!(result, Err(MetadataError::NotFound { .. })));
    }
}

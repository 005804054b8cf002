use crate::core::models::database::EnergyDatabase;
use crate::core::models::ids::MoleculeId;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Energy database not found: '{}'", .path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid energy database '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Molecule {molecule} in '{}' has energy vectors of differing length", .path.display())]
    InconsistentVectors { path: PathBuf, molecule: MoleculeId },

    #[error("I/O error on energy database '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Writes the database as indented JSON.
pub fn save_database(database: &EnergyDatabase, path: &Path) -> Result<(), DatabaseError> {
    let io_err = |e: io::Error| DatabaseError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    let mut writer = BufWriter::new(fs::File::create(path).map_err(io_err)?);
    serde_json::to_writer_pretty(&mut writer, database).map_err(|e| DatabaseError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    writer.write_all(b"\n").map_err(io_err)?;
    writer.flush().map_err(io_err)
}

/// Loads a database and validates the aligned-vector invariant of every molecule.
pub fn load_database(path: &Path) -> Result<EnergyDatabase, DatabaseError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DatabaseError::NotFound {
            path: path.to_path_buf(),
        },
        _ => DatabaseError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    let database: EnergyDatabase =
        serde_json::from_str(&content).map_err(|e| DatabaseError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;

    if let Some((molecule, _)) = database.iter().find(|(_, e)| !e.is_consistent()) {
        return Err(DatabaseError::InconsistentVectors {
            path: path.to_path_buf(),
            molecule,
        });
    }
    Ok(database)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::database::MoleculeEnergies;
    use crate::core::models::method::MethodSet;
    use tempfile::tempdir;

    fn entry() -> MoleculeEnergies {
        MoleculeEnergies {
            lowest_conformer: 2,
            conformer_index: vec![5, 1],
            reference: vec![0.1, 0.9],
            cheap_a: vec![0.2, 0.7],
            cheap_b: vec![0.0, 1.1],
            natoms: 14,
            charge: 0,
            nconf: 8,
            name: Some("702".to_string()),
        }
    }

    #[test]
    fn saved_database_reloads_identically() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("energies.json");
        let mut db = EnergyDatabase::new(MethodSet::default());
        db.insert(702, entry());
        db.insert(31, entry());

        save_database(&db, &path).unwrap();
        let loaded = load_database(&path).unwrap();
        assert_eq!(loaded, db);
    }

    #[test]
    fn inconsistent_molecule_is_rejected_at_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("energies.json");
        let mut bad = entry();
        bad.cheap_a.push(3.0);
        let mut db = EnergyDatabase::new(MethodSet::default());
        db.insert(9, bad);
        save_database(&db, &path).unwrap();

        let result = load_database(&path);
        assert!(matches!(
            result,
            Err(DatabaseError::InconsistentVectors { molecule: 9, .. })
        ));
    }

    #[test]
    fn missing_database_is_not_found() {
        let dir = tempdir().unwrap();
        let result = load_database(&dir.path().join("energies.json"));
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Position of the energy value inside a method's energy file.
///
/// Both positions are zero-based. The default matches the `energy` file layout of the
/// quantum-chemistry and tight-binding codes used in the pipeline: a `$energy` header line
/// followed by `<cycle> <total energy> ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnergyRecordLayout {
    pub line: usize,
    pub field: usize,
}

impl Default for EnergyRecordLayout {
    fn default() -> Self {
        Self { line: 1, field: 1 }
    }
}

#[derive(Debug, Error)]
pub enum EnergyRecordError {
    #[error("Energy file not found: '{}'", .path.display())]
    MissingFile { path: PathBuf },

    #[error("Energy file '{}' has {lines} line(s), expected at least {required}", .path.display())]
    EmptyRecord {
        path: PathBuf,
        lines: usize,
        required: usize,
    },

    #[error("Malformed energy record in '{}' (line {line}): {reason}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("I/O error reading '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Reads the single scalar energy stored at `layout` in the file at `path`.
pub fn read_energy_record(
    path: &Path,
    layout: EnergyRecordLayout,
) -> Result<f64, EnergyRecordError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => EnergyRecordError::MissingFile {
            path: path.to_path_buf(),
        },
        _ => EnergyRecordError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    parse_energy_record(BufReader::new(file), path, layout)
}

fn parse_energy_record(
    reader: impl BufRead,
    path: &Path,
    layout: EnergyRecordLayout,
) -> Result<f64, EnergyRecordError> {
    let mut seen = 0usize;
    for line in reader.lines() {
        let line = line.map_err(|e| EnergyRecordError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if seen < layout.line {
            seen += 1;
            continue;
        }

        let token = line.split_whitespace().nth(layout.field).ok_or_else(|| {
            EnergyRecordError::MalformedRecord {
                path: path.to_path_buf(),
                line: layout.line + 1,
                reason: format!("field {} is missing", layout.field + 1),
            }
        })?;
        let malformed = |reason: String| EnergyRecordError::MalformedRecord {
            path: path.to_path_buf(),
            line: layout.line + 1,
            reason,
        };
        let value = token
            .parse::<f64>()
            .map_err(|_| malformed(format!("'{}' is not a number", token)))?;
        if !value.is_finite() {
            return Err(malformed(format!("'{}' is not a finite energy", token)));
        }
        return Ok(value);
    }

    Err(EnergyRecordError::EmptyRecord {
        path: path.to_path_buf(),
        lines: seen,
        required: layout.line + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("energy");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn reads_value_from_second_line_second_field() {
        let dir = tempdir().unwrap();
        let path = write(
            dir.path(),
            "$energy\n     1   -40.5182391234   0.0000   0.0000\n$end\n",
        );
        let energy = read_energy_record(&path, EnergyRecordLayout::default()).unwrap();
        assert_eq!(energy, -40.5182391234);
    }

    #[test]
    fn honours_a_custom_layout() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "a b c\nd e f\ng h -1.25e-2\n");
        let layout = EnergyRecordLayout { line: 2, field: 2 };
        assert_eq!(read_energy_record(&path, layout).unwrap(), -0.0125);
    }

    #[test]
    fn missing_file_is_reported_as_such() {
        let dir = tempdir().unwrap();
        let result = read_energy_record(&dir.path().join("nope"), EnergyRecordLayout::default());
        assert!(matches!(result, Err(EnergyRecordError::MissingFile { .. })));
    }

    #[test]
    fn short_file_is_an_empty_record() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "$energy\n");
        let result = read_energy_record(&path, EnergyRecordLayout::default());
        assert!(matches!(
            result,
            Err(EnergyRecordError::EmptyRecord {
                lines: 1,
                required: 2,
                ..
            })
        ));

        let empty = write(dir.path(), "");
        let result = read_energy_record(&empty, EnergyRecordLayout::default());
        assert!(matches!(result, Err(EnergyRecordError::EmptyRecord { lines: 0, .. })));
    }

    #[test]
    fn non_numeric_or_absent_field_is_malformed() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "$energy\n 1 abc\n");
        let result = read_energy_record(&path, EnergyRecordLayout::default());
        assert!(matches!(
            result,
            Err(EnergyRecordError::MalformedRecord { line: 2, .. })
        ));

        let path = write(dir.path(), "$energy\n 1\n");
        let result = read_energy_record(&path, EnergyRecordLayout::default());
        assert!(matches!(result, Err(EnergyRecordError::MalformedRecord { .. })));
    }

    #[test]
    fn non_finite_values_are_malformed() {
        let dir = tempdir().unwrap();
        for token in ["NaN", "inf", "-infinity"] {
            let path = write(dir.path(), &format!("$energy\n 1 {}\n", token));
            let result = read_energy_record(&path, EnergyRecordLayout::default());
            match result {
                Err(EnergyRecordError::MalformedRecord { line, reason, .. }) => {
                    assert_eq!(line, 2);
                    assert!(reason.contains("finite"), "unexpected reason: {}", reason);
                }
                other => panic!("Expected MalformedRecord for '{}', got {:?}", token, other),
            }
        }
    }
}

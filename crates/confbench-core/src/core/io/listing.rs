use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("Listing file not found: '{}'", .path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid entry '{value}' on line {line} of '{}'", .path.display())]
    InvalidEntry {
        path: PathBuf,
        line: usize,
        value: String,
    },

    #[error("I/O error on listing '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Reads a listing file holding one integer entry per line.
///
/// Only the first whitespace-separated token of each line is parsed, so manifests of the
/// form `<id> <name>` are accepted as well. Blank lines are skipped.
pub fn read_listing<T: FromStr>(path: &Path) -> Result<Vec<T>, ListingError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ListingError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ListingError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let mut entries = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let Some(token) = line.split_whitespace().next() else {
            continue;
        };
        let value = token.parse::<T>().map_err(|_| ListingError::InvalidEntry {
            path: path.to_path_buf(),
            line: line_no + 1,
            value: token.to_string(),
        })?;
        entries.push(value);
    }
    Ok(entries)
}

/// Writes one entry per line, replacing any existing file.
pub fn write_listing<T: ToString>(path: &Path, entries: &[T]) -> Result<(), ListingError> {
    let io_err = |e: io::Error| ListingError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    let mut file = io::BufWriter::new(fs::File::create(path).map_err(io_err)?);
    for entry in entries {
        writeln!(file, "{}", entry.to_string()).map_err(io_err)?;
    }
    file.flush().map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_integers_skipping_blank_lines_and_trailing_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("compounds.txt");
        fs::write(&path, "2244 aspirin\n\n  702\n3345 \n").unwrap();

        let ids: Vec<u64> = read_listing(&path).unwrap();
        assert_eq!(ids, vec![2244, 702, 3345]);
    }

    #[test]
    fn invalid_entry_reports_line_number() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.conformers");
        fs::write(&path, "1\n2\nthree\n").unwrap();

        let result: Result<Vec<u32>, _> = read_listing(&path);
        match result {
            Err(ListingError::InvalidEntry { line, value, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "three");
            }
            other => panic!("Expected InvalidEntry, got {:?}", other),
        }
    }

    #[test]
    fn missing_listing_is_not_found() {
        let dir = tempdir().unwrap();
        let result: Result<Vec<u32>, _> = read_listing(&dir.path().join("absent"));
        assert!(matches!(result, Err(ListingError::NotFound { .. })));
    }

    #[test]
    fn written_listing_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.conformers");
        write_listing(&path, &[4u32, 9, 17]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "4\n9\n17\n");
        let back: Vec<u32> = read_listing(&path).unwrap();
        assert_eq!(back, vec![4, 9, 17]);
    }
}

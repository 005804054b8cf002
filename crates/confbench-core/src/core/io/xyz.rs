//! Frame access for multi-structure XYZ trajectories, such as the conformer ensemble file a
//! sampling run leaves behind.
//!
//! Every frame is exactly `natoms + 2` lines: the atom count, a comment line, and one line
//! per atom. Frames are addressed 1-based, matching the conformer numbering used everywhere
//! else in a run directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("Trajectory '{}' holds {available} frame(s); frame {frame} was requested", .path.display())]
    FrameOutOfRange {
        path: PathBuf,
        frame: usize,
        available: usize,
    },

    #[error("Frame index must be 1-based, got 0")]
    ZeroFrame,

    #[error("I/O error on trajectory '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct XyzTrajectory {
    path: PathBuf,
    lines: Vec<String>,
    natoms: usize,
}

impl XyzTrajectory {
    pub fn open(path: &Path, natoms: usize) -> Result<Self, XyzError> {
        let content = fs::read_to_string(path).map_err(|e| XyzError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            lines: content.lines().map(str::to_string).collect(),
            natoms,
        })
    }

    #[inline]
    fn frame_len(&self) -> usize {
        self.natoms + 2
    }

    pub fn frame_count(&self) -> usize {
        self.lines.len() / self.frame_len()
    }

    /// Returns the lines of the 1-based `frame`.
    pub fn frame(&self, frame: usize) -> Result<&[String], XyzError> {
        if frame == 0 {
            return Err(XyzError::ZeroFrame);
        }
        let start = (frame - 1) * self.frame_len();
        let end = start + self.frame_len();
        self.lines
            .get(start..end)
            .ok_or_else(|| XyzError::FrameOutOfRange {
                path: self.path.clone(),
                frame,
                available: self.frame_count(),
            })
    }

    pub fn write_frame(&self, frame: usize, destination: &Path) -> Result<(), XyzError> {
        let mut content = self.frame(frame)?.join("\n");
        content.push('\n');
        fs::write(destination, content).map_err(|e| XyzError::Io {
            path: destination.to_path_buf(),
            source: e,
        })
    }
}

/// Reads the atom count from the first line of a single-structure XYZ file.
pub fn read_atom_count(path: &Path) -> Result<Option<usize>, XyzError> {
    let content = fs::read_to_string(path).map_err(|e| XyzError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(content
        .lines()
        .next()
        .and_then(|line| line.trim().parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TWO_FRAMES: &str = "\
2
 -5.07
H 0.0 0.0 0.0
H 0.0 0.0 0.74
2
 -5.01
H 0.0 0.0 0.0
H 0.0 0.0 0.80
";

    #[test]
    fn frames_are_addressed_one_based() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("crest_conformers.xyz");
        fs::write(&path, TWO_FRAMES).unwrap();

        let traj = XyzTrajectory::open(&path, 2).unwrap();
        assert_eq!(traj.frame_count(), 2);
        assert_eq!(traj.frame(2).unwrap()[1], " -5.01");
        assert!(matches!(traj.frame(0), Err(XyzError::ZeroFrame)));
        assert!(matches!(
            traj.frame(3),
            Err(XyzError::FrameOutOfRange { available: 2, .. })
        ));
    }

    #[test]
    fn write_frame_emits_a_standalone_xyz_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("crest_conformers.xyz");
        fs::write(&path, TWO_FRAMES).unwrap();
        let out = dir.path().join("1.xyz");

        XyzTrajectory::open(&path, 2)
            .unwrap()
            .write_frame(1, &out)
            .unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert_eq!(written, "2\n -5.07\nH 0.0 0.0 0.0\nH 0.0 0.0 0.74\n");
        assert_eq!(read_atom_count(&out).unwrap(), Some(2));
    }
}

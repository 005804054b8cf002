use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}; stderr saved to '{}'", .log.display())]
    Failed {
        program: String,
        status: String,
        log: PathBuf,
    },

    #[error("'{program}' did not finish within {seconds} s")]
    TimedOut { program: String, seconds: u64 },

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Converts a coordinate file into the archive's geometry format.
pub trait GeometryConverter {
    fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError>;
}

/// Runs an external converter as `<program> <input> <output> <args...>`.
///
/// The child runs in the output file's directory and receives absolute paths, so relative
/// inputs resolve against the caller's working directory. Its stderr goes to
/// `<dir>/<program>_error.err`, which is removed again after a successful run.
#[derive(Debug, Clone)]
pub struct ExternalConverter {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl Default for ExternalConverter {
    fn default() -> Self {
        Self {
            program: "mctc-convert".to_string(),
            args: vec!["--normalize".to_string()],
            timeout: Duration::from_secs(120),
        }
    }
}

const POLL_INTERVAL: Duration = Duration::from_millis(50);

impl GeometryConverter for ExternalConverter {
    fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| ConversionError::Io { path, source }
        };
        let input = std::path::absolute(input).map_err(io_err(input))?;
        let output = std::path::absolute(output).map_err(io_err(output))?;
        let work_dir = output.parent().unwrap_or_else(|| Path::new("/"));
        let log = work_dir.join(format!("{}_error.err", self.program));
        let stderr = File::create(&log).map_err(io_err(&log))?;

        debug!(program = %self.program, input = %input.display(), "Converting geometry.");
        let mut child = Command::new(&self.program)
            .arg(&input)
            .arg(&output)
            .args(&self.args)
            .current_dir(work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(stderr))
            .spawn()
            .map_err(|e| ConversionError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait().map_err(io_err(&output))? {
                break status;
            }
            if started.elapsed() >= self.timeout {
                // the child may exit between try_wait and kill
                if let Err(e) = child.kill() {
                    warn!(
                        program = %self.program,
                        error = %e,
                        "Failed to kill timed-out converter."
                    );
                }
                if let Err(e) = child.wait() {
                    warn!(
                        program = %self.program,
                        error = %e,
                        "Failed to reap timed-out converter."
                    );
                }
                return Err(ConversionError::TimedOut {
                    program: self.program.clone(),
                    seconds: self.timeout.as_secs(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        if !status.success() {
            return Err(ConversionError::Failed {
                program: self.program.clone(),
                status: status.to_string(),
                log,
            });
        }
        fs::remove_file(&log).map_err(io_err(&log))
    }
}

use crate::core::io::metadata::write_sampling_record;
use crate::core::io::xyz::read_atom_count;
use crate::core::models::ids::MoleculeId;
use crate::core::models::metadata::{EnsembleMetadata, SamplingRecord};
use crate::engine::config::{EnsembleLayout, SamplingConfig};
use crate::engine::error::{EngineError, MoleculeError};
use crate::engine::loader::molecule_dir;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::scheduler::{self, SamplingPool};
use crate::workflows::collect::read_manifest;
use itertools::Itertools;
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info, instrument, warn};

const CONFORMER_COUNT_MARKER: &str = "number of unique conformers for further calc";
const CONFORMER_COUNT_TOKEN: usize = 7;
const ENERGIES_FILE: &str = "crest.energies";
const THREADS_PLACEHOLDER: &str = "{threads}";

/// Result of one sampling job. Failed jobs report `nconf == 0` and carry the error text.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingOutcome {
    pub molecule: MoleculeId,
    pub nconf: usize,
    pub error: Option<String>,
}

impl SamplingOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Samples every manifest molecule on a bounded worker pool and blocks until all jobs end.
///
/// Outcomes are returned in manifest order. A failing job never affects the others; only a
/// missing manifest or a pool that cannot be built aborts the run.
#[instrument(skip_all, name = "sample_workflow")]
pub fn run(
    root: &Path,
    layout: &EnsembleLayout,
    config: &SamplingConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<SamplingOutcome>, EngineError> {
    let molecules = read_manifest(root, layout)?;
    let cores = config.cores.unwrap_or_else(scheduler::detect_cores);
    let pool = SamplingPool::new(scheduler::plan(cores, molecules.len()))?;
    info!(
        molecules = molecules.len(),
        cores,
        program = %config.program,
        "Sampling conformer ensembles."
    );

    reporter.report(Progress::PhaseStart { name: "Sampling" });
    reporter.report(Progress::TaskStart {
        total_steps: molecules.len() as u64,
    });

    let outcomes = pool.run(&molecules, |&id, threads| {
        let outcome = match sample_molecule(root, id, layout, config, threads) {
            Ok(record) => SamplingOutcome {
                molecule: id,
                nconf: record.metadata.nconf,
                error: None,
            },
            Err(e) => {
                warn!(molecule = id, error = %e, "Sampling failed.");
                SamplingOutcome {
                    molecule: id,
                    nconf: 0,
                    error: Some(e.to_string()),
                }
            }
        };
        reporter.report(Progress::TaskIncrement);
        outcome
    });

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    info!(
        succeeded = outcomes.iter().filter(|o| o.succeeded()).count(),
        failed = outcomes.iter().filter(|o| !o.succeeded()).count(),
        "Sampling finished."
    );
    Ok(outcomes)
}

/// Runs the sampler for one molecule inside `<root>/<id>/<work_dir>` and records the
/// resulting ensemble metadata.
pub fn sample_molecule(
    root: &Path,
    id: MoleculeId,
    layout: &EnsembleLayout,
    config: &SamplingConfig,
    threads: usize,
) -> Result<SamplingRecord, MoleculeError> {
    let dir = molecule_dir(root, id);
    let work = dir.join(&config.work_dir);
    fs::create_dir_all(&work).map_err(MoleculeError::io(&work))?;

    let structure = dir.join(&config.structure_file);
    let work_structure = work.join(&config.structure_file);
    fs::copy(&structure, &work_structure).map_err(MoleculeError::io(&structure))?;

    let charge_file = dir.join(&config.charge_file);
    let charge = if charge_file.is_file() {
        let work_charge = work.join(&config.charge_file);
        fs::copy(&charge_file, &work_charge).map_err(MoleculeError::io(&charge_file))?;
        read_charge(&charge_file)?
    } else {
        0
    };
    let natoms = read_atom_count(&structure)?.ok_or_else(|| MoleculeError::Sampling {
        reason: format!("no atom count in '{}'", structure.display()),
    })?;

    let args: Vec<String> = config
        .args
        .iter()
        .map(|a| a.replace(THREADS_PLACEHOLDER, &threads.to_string()))
        .collect();
    debug!(
        molecule = id,
        command = %format!("{} {} {}", config.program, config.structure_file, args.iter().join(" ")),
        "Launching sampler."
    );
    let output = Command::new(&config.program)
        .arg(&config.structure_file)
        .args(&args)
        .current_dir(&work)
        .output()
        .map_err(|e| MoleculeError::Sampling {
            reason: format!("failed to launch '{}': {}", config.program, e),
        })?;

    let stem = program_stem(&config.program);
    let out_path = work.join(format!("{}.out", stem));
    fs::write(&out_path, &output.stdout).map_err(MoleculeError::io(&out_path))?;
    let err_path = work.join(format!("{}.err", stem));
    fs::write(&err_path, &output.stderr).map_err(MoleculeError::io(&err_path))?;
    if !output.status.success() {
        return Err(MoleculeError::Sampling {
            reason: format!(
                "'{}' exited with {}; see '{}'",
                config.program,
                output.status,
                err_path.display()
            ),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let nconf = parse_conformer_count(&stdout).ok_or_else(|| MoleculeError::Sampling {
        reason: format!("conformer count not found in '{}'", out_path.display()),
    })?;
    let energies = read_sampling_energies(&work.join(ENERGIES_FILE))?;

    let record = SamplingRecord::from_energies(
        EnsembleMetadata {
            natoms,
            charge,
            nconf,
            name: Some(id.to_string()),
        },
        energies,
    );
    write_sampling_record(&dir.join(&layout.metadata_file), &record)?;
    Ok(record)
}

fn program_stem(program: &str) -> String {
    Path::new(program)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.to_string())
}

fn parse_conformer_count(output: &str) -> Option<usize> {
    output
        .lines()
        .find(|line| line.contains(CONFORMER_COUNT_MARKER))
        .and_then(|line| line.split_whitespace().nth(CONFORMER_COUNT_TOKEN))
        .and_then(|token| token.parse().ok())
}

/// Second column of every non-empty line.
fn read_sampling_energies(path: &Path) -> Result<Vec<f64>, MoleculeError> {
    let content = fs::read_to_string(path).map_err(MoleculeError::io(path))?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.split_whitespace()
                .nth(1)
                .and_then(|token| token.parse::<f64>().ok())
                .ok_or_else(|| MoleculeError::Sampling {
                    reason: format!("malformed line '{}' in '{}'", line.trim(), path.display()),
                })
        })
        .collect()
}

fn read_charge(path: &Path) -> Result<i32, MoleculeError> {
    let content = fs::read_to_string(path).map_err(MoleculeError::io(path))?;
    content
        .split_whitespace()
        .next()
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| MoleculeError::Sampling {
            reason: format!("invalid charge in '{}'", path.display()),
        })
}

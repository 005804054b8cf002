use crate::core::models::database::{EnergyDatabase, MoleculeEnergies};
use crate::core::models::ids::MoleculeId;
use crate::core::models::method::Method;
use crate::core::utils::stats::{self, StatsError, Summary};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// A value per cheap method.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CheapPair<T> {
    pub cheap_a: T,
    pub cheap_b: T,
}

impl<T: Copy> CheapPair<T> {
    pub fn get(&self, method: Method) -> Option<T> {
        match method {
            Method::Reference => None,
            Method::CheapA => Some(self.cheap_a),
            Method::CheapB => Some(self.cheap_b),
        }
    }
}

/// Rank correlation and RMSD of both cheap methods against the reference for one molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeScore {
    pub molecule: MoleculeId,
    pub points: usize,
    pub correlation: CheapPair<f64>,
    pub rmsd: CheapPair<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkipReason {
    Charged { charge: i32 },
    Misaligned,
    TooFewPoints { points: usize },
    ConstantInput { method: Method },
    NotANumber { method: Method },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Charged { charge } => write!(f, "net charge {} is not zero", charge),
            SkipReason::Misaligned => write!(f, "energy vectors differ in length"),
            SkipReason::TooFewPoints { points } => {
                write!(f, "{} relative energies, at least 2 required", points)
            }
            SkipReason::ConstantInput { method } => {
                write!(f, "constant {} energies, correlation undefined", method)
            }
            SkipReason::NotANumber { method } => write!(f, "{} statistics evaluate to NaN", method),
        }
    }
}

/// Head-to-head count of which cheap method scored better on a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub cheap_a: usize,
    pub cheap_b: usize,
    pub equal: usize,
}

impl Tally {
    fn record(&mut self, ordering: Ordering) {
        match ordering {
            Ordering::Greater => self.cheap_a += 1,
            Ordering::Less => self.cheap_b += 1,
            Ordering::Equal => self.equal += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BenchmarkReport {
    pub scores: Vec<MoleculeScore>,
    pub skipped: Vec<(MoleculeId, SkipReason)>,
    pub correlation: CheapPair<Option<Summary>>,
    pub rmsd: CheapPair<Option<Summary>>,
    /// Higher correlation wins.
    pub correlation_tally: Tally,
    /// Lower RMSD wins.
    pub rmsd_tally: Tally,
    /// Sum of relative-energy vector lengths over the included molecules.
    pub data_points: usize,
    pub molecules_total: usize,
}

impl BenchmarkReport {
    pub fn molecules_included(&self) -> usize {
        self.scores.len()
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV export to '{}' failed: {source}", .path.display())]
    Csv {
        path: std::path::PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[derive(Serialize)]
struct ScoreRow {
    molecule: MoleculeId,
    points: usize,
    rho_a: f64,
    rho_b: f64,
    rmsd_a: f64,
    rmsd_b: f64,
}

impl BenchmarkReport {
    /// Writes one row per included molecule.
    pub fn write_csv(&self, path: &Path) -> Result<(), ReportError> {
        let csv_err = |e: csv::Error| ReportError::Csv {
            path: path.to_path_buf(),
            source: e,
        };
        let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
        for score in &self.scores {
            writer
                .serialize(ScoreRow {
                    molecule: score.molecule,
                    points: score.points,
                    rho_a: score.correlation.cheap_a,
                    rho_b: score.correlation.cheap_b,
                    rmsd_a: score.rmsd.cheap_a,
                    rmsd_b: score.rmsd.cheap_b,
                })
                .map_err(csv_err)?;
        }
        writer.flush().map_err(|e| ReportError::Csv {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

/// Scores one molecule, or names the reason it cannot contribute.
pub fn score_molecule(
    molecule: MoleculeId,
    energies: &MoleculeEnergies,
) -> Result<MoleculeScore, SkipReason> {
    if energies.charge != 0 {
        return Err(SkipReason::Charged {
            charge: energies.charge,
        });
    }
    if !energies.is_consistent() {
        return Err(SkipReason::Misaligned);
    }
    let points = energies.len();
    if points < 2 {
        return Err(SkipReason::TooFewPoints { points });
    }

    let reference = energies.relative(Method::Reference);
    let mut correlation = CheapPair::default();
    let mut rmsd = CheapPair::default();
    for method in Method::CHEAP {
        let cheap = energies.relative(method);
        let rho = stats::spearman(reference, cheap).map_err(|e| match e {
            StatsError::ConstantInput => SkipReason::ConstantInput { method },
            StatsError::TooFewPoints { actual, .. } => SkipReason::TooFewPoints { points: actual },
            StatsError::LengthMismatch { .. } => SkipReason::Misaligned,
        })?;
        let deviation = stats::rmsd(reference, cheap).map_err(|_| SkipReason::Misaligned)?;
        if rho.is_nan() || deviation.is_nan() {
            return Err(SkipReason::NotANumber { method });
        }
        match method {
            Method::CheapA => {
                correlation.cheap_a = rho;
                rmsd.cheap_a = deviation;
            }
            _ => {
                correlation.cheap_b = rho;
                rmsd.cheap_b = deviation;
            }
        }
    }

    Ok(MoleculeScore {
        molecule,
        points,
        correlation,
        rmsd,
    })
}

/// Benchmarks both cheap methods against the reference over the whole database.
///
/// Skipped molecules contribute to neither the correlation nor the RMSD aggregates.
pub fn evaluate(database: &EnergyDatabase) -> BenchmarkReport {
    let mut report = BenchmarkReport {
        molecules_total: database.len(),
        ..Default::default()
    };

    for (id, energies) in database.iter() {
        match score_molecule(id, energies) {
            Ok(score) => {
                report.data_points += score.points;
                report.correlation_tally.record(compare(
                    score.correlation.cheap_a,
                    score.correlation.cheap_b,
                ));
                report
                    .rmsd_tally
                    .record(compare(score.rmsd.cheap_b, score.rmsd.cheap_a));
                report.scores.push(score);
            }
            Err(reason) => report.skipped.push((id, reason)),
        }
    }

    let collect = |f: fn(&MoleculeScore) -> f64| -> Vec<f64> { report.scores.iter().map(f).collect() };
    let correlation = CheapPair {
        cheap_a: stats::summarize(&collect(|s| s.correlation.cheap_a)),
        cheap_b: stats::summarize(&collect(|s| s.correlation.cheap_b)),
    };
    let rmsd = CheapPair {
        cheap_a: stats::summarize(&collect(|s| s.rmsd.cheap_a)),
        cheap_b: stats::summarize(&collect(|s| s.rmsd.cheap_b)),
    };
    report.correlation = correlation;
    report.rmsd = rmsd;
    report
}

fn compare(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

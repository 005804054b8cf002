use crate::core::io::energy::EnergyRecordLayout;
use crate::core::models::method::{Method, MethodSet};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// File and directory names of a run directory.
///
/// Paths are relative: the manifest to the working root, everything else to the molecule
/// directory or the conformer directory beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsembleLayout {
    pub manifest_file: PathBuf,
    pub index_file: PathBuf,
    pub metadata_file: PathBuf,
    pub energy_file: PathBuf,
    pub reference_dir: PathBuf,
    pub cheap_a_dir: PathBuf,
    pub cheap_b_dir: PathBuf,
    pub energy_record: EnergyRecordLayout,
}

impl EnsembleLayout {
    pub fn method_dir(&self, method: Method) -> &PathBuf {
        match method {
            Method::Reference => &self.reference_dir,
            Method::CheapA => &self.cheap_a_dir,
            Method::CheapB => &self.cheap_b_dir,
        }
    }
}

impl Default for EnsembleLayout {
    fn default() -> Self {
        Self {
            manifest_file: PathBuf::from("compounds.conformers.txt"),
            index_file: PathBuf::from("index.conformers"),
            metadata_file: PathBuf::from("conformer.json"),
            energy_file: PathBuf::from("energy"),
            reference_dir: PathBuf::from("TZ"),
            cheap_a_dir: PathBuf::from("gfn2"),
            cheap_b_dir: PathBuf::from("gp3"),
            energy_record: EnergyRecordLayout::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    /// Adjacent conformers closer than this (kcal/mol) in reference energy are duplicates.
    pub tolerance_kcal: f64,
    /// Ensembles with this many members or fewer are never deduplicated.
    pub min_members: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            tolerance_kcal: 0.01,
            min_members: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectConfig {
    pub layout: EnsembleLayout,
    pub methods: MethodSet,
    pub filter: FilterConfig,
    pub include_charged: bool,
    pub database_file: PathBuf,
}

#[derive(Default)]
pub struct CollectConfigBuilder {
    layout: Option<EnsembleLayout>,
    methods: Option<MethodSet>,
    tolerance_kcal: Option<f64>,
    min_members: Option<usize>,
    include_charged: Option<bool>,
    database_file: Option<PathBuf>,
}

impl CollectConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(mut self, layout: EnsembleLayout) -> Self {
        self.layout = Some(layout);
        self
    }
    pub fn methods(mut self, methods: MethodSet) -> Self {
        self.methods = Some(methods);
        self
    }
    pub fn tolerance_kcal(mut self, tolerance: f64) -> Self {
        self.tolerance_kcal = Some(tolerance);
        self
    }
    pub fn min_members(mut self, n: usize) -> Self {
        self.min_members = Some(n);
        self
    }
    pub fn include_charged(mut self, include: bool) -> Self {
        self.include_charged = Some(include);
        self
    }
    pub fn database_file(mut self, path: PathBuf) -> Self {
        self.database_file = Some(path);
        self
    }

    pub fn build(self) -> Result<CollectConfig, ConfigError> {
        let tolerance_kcal = self
            .tolerance_kcal
            .ok_or(ConfigError::MissingParameter("tolerance_kcal"))?;
        if !(tolerance_kcal.is_finite() && tolerance_kcal >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "tolerance_kcal",
                reason: format!("expected a non-negative number, got {}", tolerance_kcal),
            });
        }
        Ok(CollectConfig {
            layout: self.layout.unwrap_or_default(),
            methods: self.methods.unwrap_or_default(),
            filter: FilterConfig {
                tolerance_kcal,
                min_members: self
                    .min_members
                    .ok_or(ConfigError::MissingParameter("min_members"))?,
            },
            include_charged: self.include_charged.unwrap_or(false),
            database_file: self
                .database_file
                .ok_or(ConfigError::MissingParameter("database_file"))?,
        })
    }
}

/// Whether an existing archive directory may be replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveMode {
    Wipe,
    Keep,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveConfig {
    pub archive_dir: PathBuf,
    pub folder_prefix: String,
    pub required_files: Vec<String>,
    pub charge_file: String,
    pub coord_file: String,
    pub geometry_file: String,
    pub script_file: String,
    pub mode: ArchiveMode,
}

#[derive(Default)]
pub struct ArchiveConfigBuilder {
    archive_dir: Option<PathBuf>,
    folder_prefix: Option<String>,
    required_files: Option<Vec<String>>,
    charge_file: Option<String>,
    coord_file: Option<String>,
    geometry_file: Option<String>,
    script_file: Option<String>,
    mode: Option<ArchiveMode>,
}

impl ArchiveConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn archive_dir(mut self, dir: PathBuf) -> Self {
        self.archive_dir = Some(dir);
        self
    }
    pub fn folder_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.folder_prefix = Some(prefix.into());
        self
    }
    pub fn required_files(mut self, files: Vec<String>) -> Self {
        self.required_files = Some(files);
        self
    }
    pub fn charge_file(mut self, name: impl Into<String>) -> Self {
        self.charge_file = Some(name.into());
        self
    }
    pub fn coord_file(mut self, name: impl Into<String>) -> Self {
        self.coord_file = Some(name.into());
        self
    }
    pub fn geometry_file(mut self, name: impl Into<String>) -> Self {
        self.geometry_file = Some(name.into());
        self
    }
    pub fn script_file(mut self, name: impl Into<String>) -> Self {
        self.script_file = Some(name.into());
        self
    }
    pub fn mode(mut self, mode: ArchiveMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn build(self) -> Result<ArchiveConfig, ConfigError> {
        let required_files = self
            .required_files
            .ok_or(ConfigError::MissingParameter("required_files"))?;
        if required_files.is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "required_files",
                reason: "at least one file must be archived".to_string(),
            });
        }
        Ok(ArchiveConfig {
            archive_dir: self
                .archive_dir
                .ok_or(ConfigError::MissingParameter("archive_dir"))?,
            folder_prefix: self
                .folder_prefix
                .ok_or(ConfigError::MissingParameter("folder_prefix"))?,
            required_files,
            charge_file: self.charge_file.unwrap_or_else(|| ".CHRG".to_string()),
            coord_file: self
                .coord_file
                .ok_or(ConfigError::MissingParameter("coord_file"))?,
            geometry_file: self
                .geometry_file
                .ok_or(ConfigError::MissingParameter("geometry_file"))?,
            script_file: self
                .script_file
                .ok_or(ConfigError::MissingParameter("script_file"))?,
            mode: self.mode.ok_or(ConfigError::MissingParameter("mode"))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionConfig {
    pub min_conformers: usize,
    pub max_conformers: usize,
    pub seed: u64,
    pub trajectory_file: PathBuf,
}

#[derive(Default)]
pub struct SelectionConfigBuilder {
    min_conformers: Option<usize>,
    max_conformers: Option<usize>,
    seed: Option<u64>,
    trajectory_file: Option<PathBuf>,
}

impl SelectionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_conformers(mut self, n: usize) -> Self {
        self.min_conformers = Some(n);
        self
    }
    pub fn max_conformers(mut self, n: usize) -> Self {
        self.max_conformers = Some(n);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn trajectory_file(mut self, path: PathBuf) -> Self {
        self.trajectory_file = Some(path);
        self
    }

    pub fn build(self) -> Result<SelectionConfig, ConfigError> {
        let min_conformers = self
            .min_conformers
            .ok_or(ConfigError::MissingParameter("min_conformers"))?;
        let max_conformers = self
            .max_conformers
            .ok_or(ConfigError::MissingParameter("max_conformers"))?;
        if max_conformers == 0 || min_conformers > max_conformers {
            return Err(ConfigError::InvalidParameter {
                name: "max_conformers",
                reason: format!(
                    "must be positive and at least min_conformers ({} > {})",
                    min_conformers, max_conformers
                ),
            });
        }
        Ok(SelectionConfig {
            min_conformers,
            max_conformers,
            seed: self.seed.unwrap_or(1995),
            trajectory_file: self
                .trajectory_file
                .unwrap_or_else(|| PathBuf::from("crest/crest_conformers.xyz")),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplingConfig {
    pub program: String,
    /// Arguments passed after the structure file; `{threads}` is replaced by the per-worker
    /// thread budget.
    pub args: Vec<String>,
    pub structure_file: String,
    pub charge_file: String,
    pub work_dir: PathBuf,
    /// Total core budget; detected from the host when `None`.
    pub cores: Option<usize>,
}

#[derive(Default)]
pub struct SamplingConfigBuilder {
    program: Option<String>,
    args: Option<Vec<String>>,
    structure_file: Option<String>,
    charge_file: Option<String>,
    work_dir: Option<PathBuf>,
    cores: Option<usize>,
}

impl SamplingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }
    pub fn args(mut self, args: Vec<String>) -> Self {
        self.args = Some(args);
        self
    }
    pub fn structure_file(mut self, name: impl Into<String>) -> Self {
        self.structure_file = Some(name.into());
        self
    }
    pub fn charge_file(mut self, name: impl Into<String>) -> Self {
        self.charge_file = Some(name.into());
        self
    }
    pub fn work_dir(mut self, dir: PathBuf) -> Self {
        self.work_dir = Some(dir);
        self
    }
    pub fn cores(mut self, cores: Option<usize>) -> Self {
        self.cores = cores;
        self
    }

    pub fn build(self) -> Result<SamplingConfig, ConfigError> {
        if self.cores == Some(0) {
            return Err(ConfigError::InvalidParameter {
                name: "cores",
                reason: "core budget must be positive".to_string(),
            });
        }
        Ok(SamplingConfig {
            program: self
                .program
                .ok_or(ConfigError::MissingParameter("program"))?,
            args: self.args.unwrap_or_default(),
            structure_file: self
                .structure_file
                .ok_or(ConfigError::MissingParameter("structure_file"))?,
            charge_file: self.charge_file.unwrap_or_else(|| ".CHRG".to_string()),
            work_dir: self.work_dir.unwrap_or_else(|| PathBuf::from("crest")),
            cores: self.cores,
        })
    }
}

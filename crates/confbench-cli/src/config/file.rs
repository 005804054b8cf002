use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileLayoutConfig {
    pub manifest_file: Option<PathBuf>,
    pub index_file: Option<PathBuf>,
    pub metadata_file: Option<PathBuf>,
    pub energy_file: Option<PathBuf>,
    pub reference_dir: Option<PathBuf>,
    pub cheap_a_dir: Option<PathBuf>,
    pub cheap_b_dir: Option<PathBuf>,
    pub energy_line: Option<usize>,
    pub energy_field: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileMethodsConfig {
    pub reference: Option<String>,
    pub cheap_a: Option<String>,
    pub cheap_b: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileFilterConfig {
    pub tolerance_kcal: Option<f64>,
    pub min_members: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileCollectConfig {
    pub include_charged: Option<bool>,
    pub database_file: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileArchiveConfig {
    pub archive_dir: Option<PathBuf>,
    pub folder_prefix: Option<String>,
    pub required_files: Option<Vec<String>>,
    pub charge_file: Option<String>,
    pub coord_file: Option<String>,
    pub geometry_file: Option<String>,
    pub script_file: Option<String>,
    pub converter: Option<String>,
    pub converter_args: Option<Vec<String>>,
    pub converter_timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSelectionConfig {
    pub min_conformers: Option<usize>,
    pub max_conformers: Option<usize>,
    pub seed: Option<u64>,
    pub trajectory_file: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSamplingConfig {
    pub program: Option<String>,
    pub args: Option<Vec<String>>,
    pub structure_file: Option<String>,
    pub work_dir: Option<PathBuf>,
    pub cores: Option<usize>,
}

/// Every key of the optional TOML configuration file. Absent keys fall back to
/// [`DefaultsConfig`](super::defaults::DefaultsConfig).
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub layout: Option<FileLayoutConfig>,
    pub methods: Option<FileMethodsConfig>,
    pub filter: Option<FileFilterConfig>,
    pub collect: Option<FileCollectConfig>,
    pub archive: Option<FileArchiveConfig>,
    pub selection: Option<FileSelectionConfig>,
    pub sampling: Option<FileSamplingConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

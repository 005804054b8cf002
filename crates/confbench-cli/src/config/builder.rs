use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::{ArchiveModeArg, Cli, SampleArgs, SelectArgs};
use crate::error::{CliError, Result};
use confbench::core::io::energy::EnergyRecordLayout;
use confbench::core::models::method::MethodSet;
use confbench::engine::config::{
    self as core_config, ArchiveConfig, CollectConfig, EnsembleLayout, SamplingConfig,
    SelectionConfig,
};
use confbench::engine::convert::ExternalConverter;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub fn build_config(cli: &Cli) -> Result<AppConfig> {
    if !cli.root.is_dir() {
        return Err(CliError::Argument(format!(
            "Run directory '{}' does not exist",
            cli.root.display()
        )));
    }

    let file_config = if let Some(config_path) = &cli.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };
    let settings = apply_set_values(file_config, &cli.set_values)?;

    Ok(AppConfig {
        root: std::path::absolute(&cli.root)?,
        layout: merge_layout(&settings),
        methods: merge_methods(&settings),
        settings,
    })
}

fn merge_layout(settings: &FileConfig) -> EnsembleLayout {
    let defaults = EnsembleLayout::default();
    let Some(file) = settings.layout.clone() else {
        return defaults;
    };
    EnsembleLayout {
        manifest_file: file.manifest_file.unwrap_or(defaults.manifest_file),
        index_file: file.index_file.unwrap_or(defaults.index_file),
        metadata_file: file.metadata_file.unwrap_or(defaults.metadata_file),
        energy_file: file.energy_file.unwrap_or(defaults.energy_file),
        reference_dir: file.reference_dir.unwrap_or(defaults.reference_dir),
        cheap_a_dir: file.cheap_a_dir.unwrap_or(defaults.cheap_a_dir),
        cheap_b_dir: file.cheap_b_dir.unwrap_or(defaults.cheap_b_dir),
        energy_record: EnergyRecordLayout {
            line: file.energy_line.unwrap_or(defaults.energy_record.line),
            field: file.energy_field.unwrap_or(defaults.energy_record.field),
        },
    }
}

fn merge_methods(settings: &FileConfig) -> MethodSet {
    let defaults = MethodSet::default();
    let Some(file) = settings.methods.clone() else {
        return defaults;
    };
    MethodSet {
        reference: file.reference.unwrap_or(defaults.reference),
        cheap_a: file.cheap_a.unwrap_or(defaults.cheap_a),
        cheap_b: file.cheap_b.unwrap_or(defaults.cheap_b),
    }
}

impl AppConfig {
    /// Database location relative to the run directory; an explicit path wins.
    pub fn database_file(&self, cli_path: Option<&Path>) -> PathBuf {
        cli_path
            .map(Path::to_path_buf)
            .or_else(|| {
                self.settings
                    .collect
                    .as_ref()
                    .and_then(|c| c.database_file.clone())
            })
            .unwrap_or_else(|| DefaultsConfig::default().database_file)
    }

    pub fn collect_config(&self) -> Result<CollectConfig> {
        let defaults = DefaultsConfig::default();
        let filter = self.settings.filter.clone().unwrap_or_default();
        let collect = self.settings.collect.clone().unwrap_or_default();

        core_config::CollectConfigBuilder::new()
            .layout(self.layout.clone())
            .methods(self.methods.clone())
            .tolerance_kcal(filter.tolerance_kcal.unwrap_or(defaults.tolerance_kcal))
            .min_members(filter.min_members.unwrap_or(defaults.min_members))
            .include_charged(collect.include_charged.unwrap_or(defaults.include_charged))
            .database_file(self.database_file(None))
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    pub fn archive_config(&self, mode: ArchiveModeArg) -> Result<ArchiveConfig> {
        let defaults = DefaultsConfig::default();
        let file = self.settings.archive.clone().unwrap_or_default();

        let mut builder = core_config::ArchiveConfigBuilder::new()
            .archive_dir(file.archive_dir.unwrap_or(defaults.archive_dir))
            .folder_prefix(file.folder_prefix.unwrap_or(defaults.folder_prefix))
            .required_files(file.required_files.unwrap_or(defaults.required_files))
            .coord_file(file.coord_file.unwrap_or(defaults.coord_file))
            .geometry_file(file.geometry_file.unwrap_or(defaults.geometry_file))
            .script_file(file.script_file.unwrap_or(defaults.script_file))
            .mode(mode.into());
        if let Some(charge_file) = file.charge_file {
            builder = builder.charge_file(charge_file);
        }
        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    pub fn converter(&self) -> Result<ExternalConverter> {
        let file = self.settings.archive.clone().unwrap_or_default();
        let defaults = ExternalConverter::default();
        let timeout = match file.converter_timeout_secs {
            Some(0) => {
                return Err(CliError::Config(
                    "`archive.converter-timeout-secs` must be positive".to_string(),
                ));
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.timeout,
        };
        Ok(ExternalConverter {
            program: file.converter.unwrap_or(defaults.program),
            args: file.converter_args.unwrap_or(defaults.args),
            timeout,
        })
    }

    pub fn selection_config(&self, args: &SelectArgs) -> Result<SelectionConfig> {
        let file = self.settings.selection.clone().unwrap_or_default();
        let min = args.min.or(file.min_conformers).ok_or_else(|| {
            CliError::Config(
                "`--min` or `selection.min-conformers` is required for selection".to_string(),
            )
        })?;
        let max = args.max.or(file.max_conformers).ok_or_else(|| {
            CliError::Config(
                "`--max` or `selection.max-conformers` is required for selection".to_string(),
            )
        })?;

        let mut builder = core_config::SelectionConfigBuilder::new()
            .min_conformers(min)
            .max_conformers(max);
        if let Some(seed) = args.seed.or(file.seed) {
            builder = builder.seed(seed);
        }
        if let Some(trajectory) = file.trajectory_file {
            builder = builder.trajectory_file(trajectory);
        }
        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    pub fn sampling_config(&self, args: &SampleArgs) -> Result<SamplingConfig> {
        let defaults = DefaultsConfig::default();
        let file = self.settings.sampling.clone().unwrap_or_default();

        let mut builder = core_config::SamplingConfigBuilder::new()
            .program(file.program.unwrap_or(defaults.sampling_program))
            .args(file.args.unwrap_or(defaults.sampling_args))
            .structure_file(
                args.structure
                    .clone()
                    .or(file.structure_file)
                    .unwrap_or(defaults.structure_file),
            )
            .cores(args.cores.or(file.cores));
        if let Some(work_dir) = file.work_dir {
            builder = builder.work_dir(work_dir);
        }
        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid {} value for {}: {}",
            std::any::type_name::<T>(),
            key,
            value
        ))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "layout.manifest-file" => {
                config.layout.get_or_insert_with(Default::default).manifest_file =
                    Some(parse_value(key, value)?);
            }
            "methods.reference" => {
                config.methods.get_or_insert_with(Default::default).reference =
                    Some(value.to_string());
            }
            "methods.cheap-a" => {
                config.methods.get_or_insert_with(Default::default).cheap_a =
                    Some(value.to_string());
            }
            "methods.cheap-b" => {
                config.methods.get_or_insert_with(Default::default).cheap_b =
                    Some(value.to_string());
            }
            "filter.tolerance-kcal" => {
                config.filter.get_or_insert_with(Default::default).tolerance_kcal =
                    Some(parse_value(key, value)?);
            }
            "filter.min-members" => {
                config.filter.get_or_insert_with(Default::default).min_members =
                    Some(parse_value(key, value)?);
            }
            "collect.include-charged" => {
                config.collect.get_or_insert_with(Default::default).include_charged =
                    Some(parse_value(key, value)?);
            }
            "collect.database-file" => {
                config.collect.get_or_insert_with(Default::default).database_file =
                    Some(parse_value(key, value)?);
            }
            "archive.archive-dir" => {
                config.archive.get_or_insert_with(Default::default).archive_dir =
                    Some(parse_value(key, value)?);
            }
            "archive.folder-prefix" => {
                config.archive.get_or_insert_with(Default::default).folder_prefix =
                    Some(value.to_string());
            }
            "archive.converter" => {
                config.archive.get_or_insert_with(Default::default).converter =
                    Some(value.to_string());
            }
            "archive.converter-timeout-secs" => {
                config
                    .archive
                    .get_or_insert_with(Default::default)
                    .converter_timeout_secs = Some(parse_value(key, value)?);
            }
            "selection.min-conformers" => {
                config
                    .selection
                    .get_or_insert_with(Default::default)
                    .min_conformers = Some(parse_value(key, value)?);
            }
            "selection.max-conformers" => {
                config
                    .selection
                    .get_or_insert_with(Default::default)
                    .max_conformers = Some(parse_value(key, value)?);
            }
            "selection.seed" => {
                config.selection.get_or_insert_with(Default::default).seed =
                    Some(parse_value(key, value)?);
            }
            "sampling.program" => {
                config.sampling.get_or_insert_with(Default::default).program =
                    Some(value.to_string());
            }
            "sampling.structure-file" => {
                config.sampling.get_or_insert_with(Default::default).structure_file =
                    Some(value.to_string());
            }
            "sampling.cores" => {
                config.sampling.get_or_insert_with(Default::default).cores =
                    Some(parse_value(key, value)?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

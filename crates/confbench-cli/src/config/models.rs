use super::file::FileConfig;
use confbench::core::models::method::MethodSet;
use confbench::engine::config::EnsembleLayout;
use std::path::PathBuf;

/// Settings shared by every subcommand. Command-specific configs are derived from `settings`
/// on demand, so a missing key only fails the command that needs it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub root: PathBuf,
    pub layout: EnsembleLayout,
    pub methods: MethodSet,
    /// File configuration with all `-S` overrides applied.
    pub settings: FileConfig,
}

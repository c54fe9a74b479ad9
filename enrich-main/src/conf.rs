use std::path::Path;

use enrich_config::ConfigLoader;
use enrich_connectors_native_mysql::MysqlLookupConfig;
use enrich_core::err::{Context, Result};
use enrich_logging::info;

/// Where the configuration is read from when no path is supplied
pub const DEFAULT_CONFIG_PATH: &str = "/etc/enrich/lookup.yml";

/// Loads and validates the lookup configuration file
pub fn load_conf(path: &Path) -> Result<MysqlLookupConfig> {
    let path = path
        .canonicalize()
        .with_context(|| format!("Failed to load configuration: {} not found", path.display()))?;
    let path = path.as_path();
    info!("Loading configuration from {}...", path.display());

    let options = ConfigLoader::new()
        .load_yaml(path)
        .context("Failed to load configuration")?;

    MysqlLookupConfig::parse(options)
        .with_context(|| format!("Invalid configuration in {}", path.display()))
}

use std::{
    any::type_name,
    fs,
    path::{Path, PathBuf},
};

use enrich_core::err::{Context, Result};
use enrich_logging::{debug, info};
use serde::{de::DeserializeOwned, Deserialize};
use serde_yaml::Deserializer;

use crate::processor::{
    dir::DirConfigProcessor,
    env::EnvConfigProcessor,
    util::{interpolate, process_strings},
    ConfigExprProcessor, Ctx,
};

/// Parses and loads configuration files
pub struct ConfigLoader {
    processors: Vec<Box<dyn ConfigExprProcessor>>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Initialises the configuration loader
    pub fn new() -> Self {
        Self {
            processors: vec![
                Box::new(EnvConfigProcessor::default()),
                Box::new(DirConfigProcessor::default()),
            ],
        }
    }

    /// Loads the configuration from the supplied file into `T`
    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let path = path
            .canonicalize()
            .with_context(|| format!("Failed to find config file {}", path.display()))?;
        info!("Loading config from path {}", path.display());

        let processed = self.load_yaml(path.as_path())?;
        debug!("Parsing into {}", type_name::<T>());

        serde_yaml::from_value(processed)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Loads processed yaml from the supplied file
    pub fn load_yaml(&self, path: &Path) -> Result<serde_yaml::Value> {
        debug!("Loading yaml from file {}", path.display());

        let file_data = fs::read(path)
            .with_context(|| format!("Failed to read config from file {}", path.display()))?;

        self.load_data(file_data.as_slice(), Some(path.to_path_buf()))
    }

    /// Parses and processes the supplied yaml
    pub fn load_data(&self, data: &[u8], path: Option<PathBuf>) -> Result<serde_yaml::Value> {
        let config = serde_yaml::Value::deserialize(Deserializer::from_slice(data))
            .context("Failed to parse yaml")?;
        let ctx = Ctx::new(path);

        let config = process_strings(config, &|string| {
            interpolate(&string, &|parts| {
                for processor in self.processors.iter() {
                    let res = processor.process(&ctx, parts).with_context(|| {
                        format!(
                            "Failed to evaluate ${{{}:...}} using the {} processor",
                            parts.first().map(String::as_str).unwrap_or_default(),
                            processor.display_name()
                        )
                    })?;

                    if res.is_some() {
                        return Ok(res);
                    }
                }

                Ok(None)
            })
        })?;

        debug!("Finished processing yaml");
        Ok(config)
    }
}

use std::env;

use enrich_core::err::{bail, Result};

use super::{ConfigExprProcessor, Ctx};

/// Interpolates configuration using environment variables
///
/// Format: `${env:NAME}` or `${env:NAME:default}`
#[derive(Default)]
pub struct EnvConfigProcessor {}

impl ConfigExprProcessor for EnvConfigProcessor {
    fn display_name(&self) -> &str {
        "environment"
    }

    fn process(&self, _ctx: &Ctx, parts: &[String]) -> Result<Option<String>> {
        let (name, default) = match parts {
            [kind, name] if kind == "env" => (name, None),
            [kind, name, default @ ..] if kind == "env" => (name, Some(default.join(":"))),
            _ => return Ok(None),
        };

        match (env::var(name), default) {
            (Ok(val), _) => Ok(Some(val)),
            (Err(_), Some(default)) => Ok(Some(default)),
            (Err(err), None) => bail!("Failed to read environment variable \"{}\": {}", name, err),
        }
    }
}

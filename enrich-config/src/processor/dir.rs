use enrich_core::err::{Context, Result};

use super::{ConfigExprProcessor, Ctx};

/// Interpolates the directory of the current config file
///
/// Format: `${dir}`
#[derive(Default)]
pub struct DirConfigProcessor {}

impl ConfigExprProcessor for DirConfigProcessor {
    fn display_name(&self) -> &str {
        "directory"
    }

    fn process(&self, ctx: &Ctx, parts: &[String]) -> Result<Option<String>> {
        if parts != ["dir"] {
            return Ok(None);
        }

        let dir = ctx
            .path
            .as_ref()
            .and_then(|p| p.parent())
            .context("Cannot interpolate ${dir} without a config file path")?;

        Ok(Some(dir.display().to_string()))
    }
}

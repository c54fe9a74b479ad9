use std::path::PathBuf;

use enrich_core::err::Result;

pub(crate) mod dir;
pub(crate) mod env;
pub(crate) mod util;

/// Context available to processors while loading a config file
pub(crate) struct Ctx {
    /// Path of the config file being loaded, if any
    pub path: Option<PathBuf>,
}

impl Ctx {
    pub(crate) fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

/// Resolves `${kind:arg1:...}` interpolations found in config strings
pub(crate) trait ConfigExprProcessor {
    /// Gets the human readable display name for the processor
    fn display_name(&self) -> &str;

    /// Resolves the supplied interpolation parts, eg `["env", "DB_PASSWORD"]`.
    /// Returns `None` if the interpolation is not handled by this processor.
    fn process(&self, ctx: &Ctx, parts: &[String]) -> Result<Option<String>>;
}

//! Error handling shared across the workspace

pub use anyhow::{anyhow, bail, ensure, Context, Error, Result};

//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod check;
mod completions;
mod config;
mod render;
mod validate;

pub use check::handle_check;
pub use completions::handle_completions;
pub use config::handle_config;
pub use render::handle_render;
pub use validate::handle_validate;

use crate::error::{Error, Result};
use std::path::Path;

/// Fail early with a clear error when an input file is missing
fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        tracing::error!("File not found: {}", path.display());
        Err(Error::FileNotFound {
            path: path.to_path_buf(),
        })
    }
}

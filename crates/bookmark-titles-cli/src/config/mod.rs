//! Configuration loading and resolution.

use std::path::{Path, PathBuf};

use anyhow::Context;

/// Environment variable naming the default output file.
pub const OUTPUT_ENV: &str = "BOOKMARK_TITLES_OUT";

/// Where to write the rewritten page. `None` means stdout.
pub fn resolve_output_path(explicit: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }

    if let Ok(env_path) = std::env::var(OUTPUT_ENV) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    None
}

/// Read a saved page from disk.
pub fn read_page(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write the rewritten page, creating parent directories as needed.
pub fn write_page(path: &Path, html: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, html).with_context(|| format!("Failed to write {}", path.display()))
}

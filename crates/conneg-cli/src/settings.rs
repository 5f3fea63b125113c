//! Format configuration from files and flags

use anyhow::{Context, Result};
use conneg::FormatConfig;
use std::path::Path;

/// Load the configuration file, if any, then apply `--formats`
///
/// Files ending in `.json` are read as JSON, anything else as TOML.
pub fn load(path: Option<&Path>, formats: Option<&str>) -> Result<FormatConfig> {
    let mut config = match path {
        Some(path) => read(path)?,
        None => FormatConfig::new(),
    };
    if let Some(formats) = formats {
        config = config.with_formats(split_list(formats));
    }
    Ok(config)
}

fn read(path: &Path) -> Result<FormatConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        FormatConfig::from_json(text.as_bytes())
            .with_context(|| format!("Invalid JSON configuration in {}", path.display()))?
    } else {
        FormatConfig::from_toml(&text)
            .with_context(|| format!("Invalid TOML configuration in {}", path.display()))?
    };
    Ok(config)
}

/// Split a comma-separated flag value, dropping blanks
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

use anyhow::{Context, Result};
use ssmkit::AssociationConfig;
use std::fs;
use std::path::Path;

/// Load an association definition from a TOML file.
pub fn load_association(path: &Path) -> Result<AssociationConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Invalid association definition in {}", path.display()))
}

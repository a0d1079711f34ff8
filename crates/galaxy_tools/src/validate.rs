//! Data validation utilities.

use std::fs;
use std::path::Path;

use galaxy_core::catalog::{
    Catalog, CatalogSources, BLUEPRINTS_FILE, DISCOVERIES_FILE, PARTS_FILE, TECHS_FILE,
};
use tracing::{debug, info};

use crate::error::{Result, ToolError};

fn read(dir: &Path, name: &str) -> Result<String> {
    let path = dir.join(name);
    debug!(path = %path.display(), "reading catalog file");
    fs::read_to_string(&path).map_err(|source| ToolError::Io { path, source })
}

/// Load the four catalog files from a directory and cross-check them.
///
/// # Errors
///
/// Returns an error if a file is missing, fails to parse, or the catalog
/// has dangling references or duplicate ids.
pub fn validate_data_directory(dir: &Path) -> Result<Catalog> {
    let parts = read(dir, PARTS_FILE)?;
    let techs = read(dir, TECHS_FILE)?;
    let blueprints = read(dir, BLUEPRINTS_FILE)?;
    let discoveries = read(dir, DISCOVERIES_FILE)?;

    let catalog = Catalog::from_ron(CatalogSources {
        parts: &parts,
        techs: &techs,
        blueprints: &blueprints,
        discoveries: &discoveries,
    })?;
    catalog.validate()?;
    info!(
        parts = catalog.parts().len(),
        techs = catalog.techs().len(),
        discoveries = catalog.discoveries().len(),
        "catalog valid"
    );
    Ok(catalog)
}

/// Validate the catalog compiled into the core.
///
/// # Errors
///
/// Returns an error if the embedded data is inconsistent.
pub fn validate_standard() -> Result<Catalog> {
    let catalog = Catalog::standard()?;
    catalog.validate()?;
    Ok(catalog)
}

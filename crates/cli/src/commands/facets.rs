//! Facet inspection.
//!
//! Loads a `gifts.json` facet payload and shows which selection a gift
//! finder page at a given path would start with.
//!
//! # Usage
//!
//! ```bash
//! gg-cli facets --data public/gifts.json --path /gifts/wedding/mom/tea/
//! ```

use std::io::Write;
use std::path::Path;

use giftgrid_core::QueryKey;
use giftgrid_storefront::facets::{FacetCatalog, Resolution, resolve};
use serde_json::json;
use tracing::{info, warn};

use super::CliError;

/// Resolve the starting selection for `path` against the facet data file.
///
/// # Errors
///
/// Returns an error if the data file cannot be read.
pub fn run(data: &Path, path: &str) -> Result<(), CliError> {
    let payload = std::fs::read_to_string(data)?;
    let catalog = FacetCatalog::load(Some(&payload), None);
    if !catalog.is_searchable() {
        warn!(data = %data.display(), "Facet data is missing values");
    }

    let resolution = resolve(&catalog, None, path);
    info!(path, from_url = resolution.from_url, "Resolved facet selection");

    let report = report(&catalog, &resolution);
    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    Ok(())
}

fn report(catalog: &FacetCatalog, resolution: &Resolution) -> serde_json::Value {
    let listing = resolution
        .selection
        .complete()
        .and_then(|selection| QueryKey::gifts(selection).ok())
        .map(|key| key.page_path(1));

    json!({
        "catalog": catalog,
        "searchable": catalog.is_searchable(),
        "resolution": resolution,
        "listing": listing,
    })
}

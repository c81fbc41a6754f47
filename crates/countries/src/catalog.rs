//! Picking a catalog source and loading it for one-shot commands

use anyhow::{Context, Result};
use countries_core::{
    CatalogSource, FETCH_FAILURE_MESSAGE, FileCatalog, HttpCatalog, RecordStore, get_api_base_url,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// A local file wins over any API URL
pub fn source(api_url: Option<&str>, catalog_file: Option<&Path>) -> Box<dyn CatalogSource> {
    match catalog_file {
        Some(path) => Box::new(FileCatalog::new(path)),
        None => Box::new(HttpCatalog::new(get_api_base_url(api_url))),
    }
}

/// Fetch the whole catalog, with a spinner on stderr while waiting
pub fn load(source: &dyn CatalogSource) -> Result<RecordStore> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Loading countries from {}", source.describe()));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = source.fetch_all();
    spinner.finish_and_clear();

    let records = result.context(FETCH_FAILURE_MESSAGE)?;
    Ok(RecordStore::new(records))
}

//! Catalog sources: the single outbound fetch of all country records

use crate::model::CountryRecord;
use reqwest::blocking::Client;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default catalog base URL
pub const DEFAULT_API_URL: &str = "https://restcountries.com/v3.1";

/// Environment variable overriding [`DEFAULT_API_URL`]
pub const API_URL_ENV: &str = "COUNTRIES_API_URL";

/// User-facing message shown in place of the grid when loading fails
pub const FETCH_FAILURE_MESSAGE: &str = "Failed to load countries. Please try again later.";

/// The one error kind of the catalog fetch.
///
/// Network errors, non-success statuses and malformed payloads are all
/// reported the same way; the cause is kept for logging only.
#[derive(Debug, Error)]
#[error("failed to load countries from {origin}")]
pub struct FetchFailure {
    pub origin: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl FetchFailure {
    fn new(
        origin: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            origin: origin.into(),
            source: source.into(),
        }
    }

    /// Static message for display in place of the grid
    pub fn user_message(&self) -> &'static str {
        FETCH_FAILURE_MESSAGE
    }
}

/// Something that can produce the complete record set in one call
pub trait CatalogSource: Send {
    fn fetch_all(&self) -> Result<Vec<CountryRecord>, FetchFailure>;

    /// Human-readable origin, for logs and status lines
    fn describe(&self) -> String;
}

/// Resolve the catalog base URL: explicit override, then env, then default
pub fn get_api_base_url(explicit: Option<&str>) -> String {
    if let Some(url) = explicit {
        return url.trim_end_matches('/').to_string();
    }
    if let Ok(url) = std::env::var(API_URL_ENV) {
        return url.trim_end_matches('/').to_string();
    }
    DEFAULT_API_URL.to_string()
}

/// REST Countries over HTTP
pub struct HttpCatalog {
    base_url: String,
    client: Client,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    /// Endpoint for the "all records" request
    pub fn all_url(&self) -> String {
        format!("{}/all", self.base_url)
    }
}

impl Default for HttpCatalog {
    fn default() -> Self {
        Self::new(get_api_base_url(None))
    }
}

impl CatalogSource for HttpCatalog {
    fn fetch_all(&self) -> Result<Vec<CountryRecord>, FetchFailure> {
        let url = self.all_url();
        log::debug!("Fetching country catalog from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| FetchFailure::new(&url, e))?;

        let records: Vec<CountryRecord> =
            response.json().map_err(|e| FetchFailure::new(&url, e))?;

        log::debug!("Fetched {} countries", records.len());
        Ok(records)
    }

    fn describe(&self) -> String {
        self.all_url()
    }
}

/// A catalog snapshot stored as a JSON file (same shape as the endpoint body)
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for FileCatalog {
    fn fetch_all(&self) -> Result<Vec<CountryRecord>, FetchFailure> {
        let origin = self.path.display().to_string();
        log::debug!("Reading country catalog from {}", origin);

        let contents =
            std::fs::read_to_string(&self.path).map_err(|e| FetchFailure::new(&origin, e))?;
        serde_json::from_str(&contents).map_err(|e| FetchFailure::new(&origin, e))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Download a flag image. Only PNG/raster URLs are useful to terminal image protocols.
pub fn fetch_flag_image(url: &str) -> anyhow::Result<Vec<u8>> {
    let response = Client::new().get(url).send()?.error_for_status()?;
    Ok(response.bytes()?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io::Write;

    #[test]
    fn test_api_base_url_explicit_wins() {
        assert_eq!(
            get_api_base_url(Some("http://localhost:8080/v3.1/")),
            "http://localhost:8080/v3.1"
        );
    }

    #[test]
    fn test_all_url() {
        let catalog = HttpCatalog::new("https://restcountries.com/v3.1");
        assert_eq!(catalog.all_url(), "https://restcountries.com/v3.1/all");
    }

    #[test]
    fn test_file_catalog_reads_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"cca3":"FRA","name":{{"common":"France"}},"population":67000000,"region":"Europe","flags":{{}}}}]"#
        )
        .unwrap();

        let records = FileCatalog::new(file.path()).fetch_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].cca3, "FRA");
    }

    #[test]
    fn test_file_catalog_malformed_payload_is_fetch_failure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"status": 404, "message": "Not Found"}}"#).unwrap();

        let err = FileCatalog::new(file.path()).fetch_all().unwrap_err();
        assert_eq!(err.user_message(), FETCH_FAILURE_MESSAGE);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_file_catalog_missing_file_is_fetch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileCatalog::new(dir.path().join("missing.json"))
            .fetch_all()
            .unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }
}

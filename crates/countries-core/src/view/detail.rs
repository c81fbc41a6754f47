use super::{NO_BORDERS, NOT_AVAILABLE, format_population, join_or_placeholder};
use crate::store::RecordStore;
use serde::Serialize;

/// Everything the detail overlay shows for one country
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    pub key: String,
    pub flag_url: Option<String>,
    /// Raster flag for terminal image protocols
    #[serde(skip)]
    pub flag_png_url: Option<String>,
    pub flag_alt: String,
    pub name: String,
    pub native_name: String,
    pub population: String,
    pub region: String,
    pub subregion: String,
    pub capital: String,
    pub top_level_domains: String,
    pub currencies: String,
    pub languages: String,
    pub borders: BorderSection,
}

/// Activatable link to a bordering country
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BorderLink {
    pub key: String,
    /// Resolved display name, or the raw key when it is not in the current set
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BorderSection {
    /// No land borders; rendered as the literal "None"
    None,
    Links(Vec<BorderLink>),
}

impl BorderSection {
    pub fn links(&self) -> &[BorderLink] {
        match self {
            BorderSection::None => &[],
            BorderSection::Links(links) => links,
        }
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            BorderSection::None => Some(NO_BORDERS),
            BorderSection::Links(_) => None,
        }
    }
}

/// Build the overlay for `key`, looked up in the full store.
///
/// Returns `None` when the key does not resolve; callers treat that as a no-op.
pub fn detail_view(store: &RecordStore, key: &str) -> Option<DetailView> {
    let record = store.get(key)?;

    let borders = if record.border_keys().is_empty() {
        BorderSection::None
    } else {
        BorderSection::Links(
            record
                .border_keys()
                .iter()
                .map(|border| BorderLink {
                    key: border.clone(),
                    label: store
                        .display_name(border)
                        .unwrap_or(border.as_str())
                        .to_string(),
                })
                .collect(),
        )
    };

    let tlds = record.tld.iter().flatten().map(String::as_str);
    let currencies = record
        .currencies
        .iter()
        .flat_map(|c| c.values())
        .map(|c| c.name.as_str());
    let languages = record
        .languages
        .iter()
        .flat_map(|l| l.values())
        .map(String::as_str);

    Some(DetailView {
        key: record.cca3.clone(),
        flag_url: record.flag_url().map(str::to_string),
        flag_png_url: record.flags.png.clone(),
        flag_alt: record.flag_alt_text(),
        name: record.display_name().to_string(),
        native_name: record.native_name().to_string(),
        population: format_population(record.population),
        region: record.region.clone(),
        subregion: record
            .subregion
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(NOT_AVAILABLE)
            .to_string(),
        capital: record
            .primary_capital()
            .unwrap_or(NOT_AVAILABLE)
            .to_string(),
        top_level_domains: join_or_placeholder(tlds),
        currencies: join_or_placeholder(currencies),
        languages: join_or_placeholder(languages),
        borders,
    })
}

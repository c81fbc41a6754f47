//! Record builders for unit tests

use crate::model::{CountryName, CountryRecord, Flags};
use crate::store::RecordStore;

pub fn record(key: &str, name: &str, region: &str) -> CountryRecord {
    CountryRecord {
        cca3: key.to_string(),
        name: CountryName {
            common: name.to_string(),
            official: None,
            native_name: None,
        },
        population: 0,
        region: region.to_string(),
        subregion: None,
        capital: None,
        flags: Flags {
            png: Some(format!("https://flagcdn.com/w320/{}.png", key.to_lowercase())),
            svg: Some(format!("https://flagcdn.com/{}.svg", key.to_lowercase())),
            alt: None,
        },
        flag: None,
        tld: None,
        currencies: None,
        languages: None,
        borders: None,
    }
}

pub fn with_borders(mut record: CountryRecord, borders: &[&str]) -> CountryRecord {
    record.borders = Some(borders.iter().map(|b| b.to_string()).collect());
    record
}

pub fn with_population(mut record: CountryRecord, population: u64) -> CountryRecord {
    record.population = population;
    record
}

/// France and Germany; France also borders Spain, which is not in the set
pub fn france_germany() -> RecordStore {
    RecordStore::new(vec![
        with_population(
            with_borders(record("FRA", "France", "Europe"), &["DEU", "ESP"]),
            67_000_000,
        ),
        with_population(
            with_borders(record("DEU", "Germany", "Europe"), &["FRA"]),
            83_000_000,
        ),
    ])
}

//! Country records as published by the REST Countries v3.1 catalog.
//!
//! Records are deserialized verbatim and never mutated afterwards. Only the
//! attributes the browser consumes are modelled; everything else in the
//! payload is ignored.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// One country as supplied by the external catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    /// Three-letter identity key, unique within one fetched set
    pub cca3: String,
    pub name: CountryName,
    pub population: u64,
    pub region: String,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default)]
    pub capital: Option<Vec<String>>,
    pub flags: Flags,
    /// Emoji flag, when the catalog provides one
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub tld: Option<Vec<String>>,
    #[serde(default)]
    pub currencies: Option<OrderedMap<Currency>>,
    #[serde(default)]
    pub languages: Option<OrderedMap<String>>,
    /// Identity keys of bordering countries; absent means no land borders
    #[serde(default)]
    pub borders: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryName {
    pub common: String,
    #[serde(default)]
    pub official: Option<String>,
    #[serde(rename = "nativeName", default)]
    pub native_name: Option<OrderedMap<LocalizedName>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedName {
    pub common: String,
    #[serde(default)]
    pub official: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flags {
    #[serde(default)]
    pub png: Option<String>,
    #[serde(default)]
    pub svg: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

impl CountryRecord {
    /// Common display name
    pub fn display_name(&self) -> &str {
        &self.name.common
    }

    /// First capital, if any
    pub fn primary_capital(&self) -> Option<&str> {
        self.capital
            .as_ref()
            .and_then(|c| c.first())
            .map(String::as_str)
    }

    /// First localized native name in catalog order, falling back to the display name
    pub fn native_name(&self) -> &str {
        self.name
            .native_name
            .as_ref()
            .and_then(|names| names.values().next())
            .map(|n| n.common.as_str())
            .unwrap_or(&self.name.common)
    }

    /// Preferred flag image URL (SVG first, PNG otherwise)
    pub fn flag_url(&self) -> Option<&str> {
        self.flags.svg.as_deref().or(self.flags.png.as_deref())
    }

    /// Accessible text for the flag image
    pub fn flag_alt_text(&self) -> String {
        let subject = self
            .flags
            .alt
            .as_deref()
            .filter(|alt| !alt.is_empty())
            .unwrap_or(&self.name.common);
        format!("{} flag", subject)
    }

    /// Border keys, empty when the country has no land borders
    pub fn border_keys(&self) -> &[String] {
        self.borders.as_deref().unwrap_or(&[])
    }
}

/// JSON object that keeps the catalog's key order.
///
/// The first native-name variant is significant, so a sorted map would
/// change which variant is shown.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<T>(Vec<(String, T)>);

impl<T> OrderedMap<T> {
    pub fn new(entries: Vec<(String, T)>) -> Self {
        Self(entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter().map(|(_, v)| v)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> Default for OrderedMap<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T: Serialize> Serialize for OrderedMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OrderedMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<T> {
            type Value = OrderedMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, T>()? {
                    entries.push((key, value));
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SWITZERLAND: &str = r#"{
        "cca3": "CHE",
        "name": {
            "common": "Switzerland",
            "official": "Swiss Confederation",
            "nativeName": {
                "gsw": { "official": "Schweizerische Eidgenossenschaft", "common": "Schweiz" },
                "fra": { "official": "Confédération suisse", "common": "Suisse" },
                "ita": { "official": "Confederazione Svizzera", "common": "Svizzera" }
            }
        },
        "population": 8654622,
        "region": "Europe",
        "subregion": "Western Europe",
        "capital": ["Bern"],
        "flags": { "png": "https://flagcdn.com/w320/ch.png", "svg": "https://flagcdn.com/ch.svg" },
        "flag": "🇨🇭",
        "tld": [".ch"],
        "currencies": { "CHF": { "name": "Swiss franc", "symbol": "Fr." } },
        "languages": { "fra": "French", "gsw": "Swiss German", "ita": "Italian", "roh": "Romansh" },
        "borders": ["AUT", "FRA", "ITA", "LIE", "DEU"],
        "unMember": true
    }"#;

    #[test]
    fn test_deserialize_full_record() {
        let record: CountryRecord = serde_json::from_str(SWITZERLAND).unwrap();
        assert_eq!(record.cca3, "CHE");
        assert_eq!(record.display_name(), "Switzerland");
        assert_eq!(record.primary_capital(), Some("Bern"));
        assert_eq!(record.border_keys().len(), 5);
        assert_eq!(
            record.languages.as_ref().unwrap().get("roh"),
            Some(&"Romansh".to_string())
        );
    }

    #[test]
    fn test_native_name_keeps_catalog_order() {
        // "gsw" sorts after "fra"; the first variant in the payload must win
        let record: CountryRecord = serde_json::from_str(SWITZERLAND).unwrap();
        assert_eq!(record.native_name(), "Schweiz");
    }

    #[test]
    fn test_optional_fields_absent() {
        let json = r#"{
            "cca3": "ATA",
            "name": { "common": "Antarctica" },
            "population": 1000,
            "region": "Antarctic",
            "flags": { "png": "https://flagcdn.com/w320/aq.png" }
        }"#;
        let record: CountryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.primary_capital(), None);
        assert_eq!(record.native_name(), "Antarctica");
        assert!(record.border_keys().is_empty());
        assert_eq!(record.flag_url(), Some("https://flagcdn.com/w320/aq.png"));
        assert_eq!(record.flag_alt_text(), "Antarctica flag");
    }

    #[test]
    fn test_missing_required_field_fails() {
        let json = r#"{ "name": { "common": "Nowhere" }, "population": 0, "region": "", "flags": {} }"#;
        assert!(serde_json::from_str::<CountryRecord>(json).is_err());
    }

    #[test]
    fn test_flag_alt_text_prefers_catalog_alt() {
        let json = r#"{
            "cca3": "JPN",
            "name": { "common": "Japan" },
            "population": 125836021,
            "region": "Asia",
            "flags": { "svg": "https://flagcdn.com/jp.svg", "alt": "The flag of Japan features a crimson-red circle" }
        }"#;
        let record: CountryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            record.flag_alt_text(),
            "The flag of Japan features a crimson-red circle flag"
        );
    }
}

//! Free-text and region filtering over the full record set

use crate::model::CountryRecord;
use crate::store::RecordStore;
use std::fmt;
use std::str::FromStr;

/// Current filter inputs.
///
/// Recomputed from scratch on every change: one full pass over the store,
/// results in catalog order, no cap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// Case-insensitive substring of the common name; empty matches all
    pub query: String,
    /// Case-insensitive exact region; `None` or empty matches all
    pub region: Option<String>,
}

impl Filter {
    pub fn new(query: impl Into<String>, region: Option<String>) -> Self {
        Self {
            query: query.into(),
            region,
        }
    }

    /// Records satisfying both predicates, in store order
    pub fn apply<'a>(&self, store: &'a RecordStore) -> Vec<&'a CountryRecord> {
        let query = self.query.to_lowercase();
        let region = self
            .region
            .as_deref()
            .filter(|r| !r.is_empty())
            .map(str::to_lowercase);

        store
            .records()
            .iter()
            .filter(|record| matches_query(record, &query))
            .filter(|record| matches_region(record, region.as_deref()))
            .collect()
    }
}

/// `query` must already be lowercased
fn matches_query(record: &CountryRecord, query: &str) -> bool {
    query.is_empty() || record.name.common.to_lowercase().contains(query)
}

/// `region` must already be lowercased
fn matches_region(record: &CountryRecord, region: Option<&str>) -> bool {
    match region {
        None => true,
        Some(region) => record.region.to_lowercase() == region,
    }
}

/// The closed set of regions offered by the region selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Africa,
    Americas,
    Antarctic,
    Asia,
    Europe,
    Oceania,
}

impl Region {
    pub const ALL: &'static [Region] = &[
        Region::Africa,
        Region::Americas,
        Region::Antarctic,
        Region::Asia,
        Region::Europe,
        Region::Oceania,
    ];

    /// Name as it appears in the catalog's `region` field
    pub fn label(&self) -> &'static str {
        match self {
            Region::Africa => "Africa",
            Region::Americas => "Americas",
            Region::Antarctic => "Antarctic",
            Region::Asia => "Asia",
            Region::Europe => "Europe",
            Region::Oceania => "Oceania",
        }
    }

    /// Next selector value; `None` is "all regions" and sits before the first region
    pub fn cycle_next(current: Option<Region>) -> Option<Region> {
        match current {
            None => Self::ALL.first().copied(),
            Some(r) => {
                let idx = Self::ALL.iter().position(|x| *x == r).unwrap_or(0);
                Self::ALL.get(idx + 1).copied()
            }
        }
    }

    /// Previous selector value, wrapping through "all regions"
    pub fn cycle_prev(current: Option<Region>) -> Option<Region> {
        match current {
            None => Self::ALL.last().copied(),
            Some(r) => {
                let idx = Self::ALL.iter().position(|x| *x == r).unwrap_or(0);
                idx.checked_sub(1).map(|i| Self::ALL[i])
            }
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .iter()
            .copied()
            .find(|r| r.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<_> = Region::ALL.iter().map(|r| r.label()).collect();
                format!("unknown region '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

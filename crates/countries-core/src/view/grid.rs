use super::{NOT_AVAILABLE, format_population};
use crate::model::CountryRecord;
use serde::Serialize;

/// One activatable card in the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    /// Activation target handed to the detail overlay
    pub key: String,
    pub flag_url: Option<String>,
    pub flag_alt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag_emoji: Option<String>,
    pub name: String,
    pub population: String,
    pub region: String,
    pub capital: String,
}

/// Full replacement content for the grid container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridView {
    /// Catalog not loaded yet
    Loading,
    /// Fetch failed; a single static message replaces the grid
    Failed(String),
    Cards(Vec<CardView>),
}

impl GridView {
    pub fn cards(&self) -> &[CardView] {
        match self {
            GridView::Cards(cards) => cards,
            _ => &[],
        }
    }
}

pub fn card_view(record: &CountryRecord) -> CardView {
    CardView {
        key: record.cca3.clone(),
        flag_url: record.flag_url().map(str::to_string),
        flag_alt: record.flag_alt_text(),
        flag_emoji: record.flag.clone(),
        name: record.display_name().to_string(),
        population: format_population(record.population),
        region: record.region.clone(),
        capital: record
            .primary_capital()
            .unwrap_or(NOT_AVAILABLE)
            .to_string(),
    }
}

/// One card per record, in the given order
pub fn grid_view<'a>(records: impl IntoIterator<Item = &'a CountryRecord>) -> GridView {
    GridView::Cards(records.into_iter().map(card_view).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;
    use crate::testing::{france_germany, record};

    #[test]
    fn test_empty_grid_has_no_cards() {
        let view = grid_view(std::iter::empty());
        assert_eq!(view, GridView::Cards(Vec::new()));
        assert!(view.cards().is_empty());
    }

    #[test]
    fn test_card_fields() {
        let store = france_germany();
        let view = grid_view(store.records());
        let cards = view.cards();
        assert_eq!(cards.len(), 2);

        let france = &cards[0];
        assert_eq!(france.key, "FRA");
        assert_eq!(france.name, "France");
        assert_eq!(france.population, "67,000,000");
        assert_eq!(france.region, "Europe");
        assert_eq!(france.capital, "N/A");
        assert_eq!(france.flag_alt, "France flag");
        assert_eq!(france.flag_url.as_deref(), Some("https://flagcdn.com/fra.svg"));
    }

    #[test]
    fn test_card_uses_first_capital() {
        let mut za = record("ZAF", "South Africa", "Africa");
        za.capital = Some(vec![
            "Pretoria".to_string(),
            "Bloemfontein".to_string(),
            "Cape Town".to_string(),
        ]);
        assert_eq!(card_view(&za).capital, "Pretoria");
    }

    #[test]
    fn test_grid_follows_filtered_order() {
        let store = france_germany();
        let filtered = Filter::new("germ", None).apply(&store);
        let view = grid_view(filtered);
        let keys: Vec<_> = view.cards().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["DEU"]);
    }

    #[test]
    fn test_failed_and_loading_have_no_cards() {
        assert!(GridView::Loading.cards().is_empty());
        assert!(GridView::Failed("boom".into()).cards().is_empty());
    }
}

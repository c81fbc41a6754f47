use anyhow::Result;
use countries_core::{CatalogSource, PreferenceStore, ThemeController};

pub fn execute(source: Box<dyn CatalogSource>) -> Result<()> {
    let theme = ThemeController::load(PreferenceStore::open_default()?);
    log::debug!("Starting browser with {} theme", theme.current());
    countries_tui::run(source, theme)
}

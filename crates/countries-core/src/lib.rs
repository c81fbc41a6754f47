//! # countries-core
//!
//! Everything the country browser does that does not touch a terminal:
//! fetching the catalog, holding the record set, filtering it, and turning
//! records into view descriptions for a rendering boundary.
//!
//! ```rust,no_run
//! use countries_core::{CatalogSource, Filter, HttpCatalog, RecordStore, grid_view};
//!
//! let records = HttpCatalog::default().fetch_all()?;
//! let store = RecordStore::new(records);
//! let visible = Filter::new("land", Some("Europe".to_string())).apply(&store);
//! let grid = grid_view(visible);
//! # Ok::<(), countries_core::FetchFailure>(())
//! ```

pub mod filter;
pub mod model;
pub mod overlay;
pub mod source;
pub mod store;
pub mod theme;
pub mod view;

#[cfg(test)]
mod testing;

pub use filter::{Filter, Region};
pub use model::CountryRecord;
pub use overlay::{OverlayAction, OverlayState, reduce};
pub use source::{
    CatalogSource, FETCH_FAILURE_MESSAGE, FetchFailure, FileCatalog, HttpCatalog,
    fetch_flag_image, get_api_base_url,
};
pub use store::RecordStore;
pub use theme::{PreferenceStore, Theme, ThemeController};
pub use view::{
    BorderLink, BorderSection, CardView, DetailView, GridView, detail_view, format_population,
    grid_view,
};

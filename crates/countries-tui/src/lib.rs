//! Interactive terminal browser over a country catalog.
//!
//! [`run`] takes over the terminal until the user quits. The catalog is
//! fetched on a background thread; everything shown is built from the
//! pure views in `countries_core`.

mod app;
mod flag;
mod input;
mod palette;
mod ui;
mod worker;

pub use app::{App, LoadState, run};
pub use input::{TextInput, Toast};
pub use palette::Palette;

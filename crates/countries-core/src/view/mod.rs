//! Declarative view descriptions.
//!
//! These are pure functions from records to plain data. The rendering
//! boundary (terminal UI or CLI printer) decides how they are drawn.

mod detail;
mod grid;

pub use detail::{BorderLink, BorderSection, DetailView, detail_view};
pub use grid::{CardView, GridView, card_view, grid_view};

/// Placeholder for absent optional attributes
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for a country without land borders
pub const NO_BORDERS: &str = "None";

/// Group digits in threes with commas (`67000000` -> `67,000,000`)
pub fn format_population(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Join values with ", ", or the placeholder when there are none
fn join_or_placeholder<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let joined = values.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        joined
    }
}

use anyhow::Result;
use clap::Args;
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use countries_core::{CardView, CatalogSource, Filter, Region, grid_view};
use std::io::{self, Write};

use crate::catalog;

#[derive(Args, Debug)]
#[command(about = "Print countries matching a search and region")]
pub struct ListArgs {
    /// Case-insensitive substring of the country name
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Only countries in this region
    #[arg(short, long)]
    pub region: Option<Region>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

pub fn execute(args: ListArgs, source: &dyn CatalogSource) -> Result<()> {
    let store = catalog::load(source)?;
    let filter = Filter::new(args.search, args.region.map(|r| r.label().to_string()));
    let grid = grid_view(filter.apply(&store));
    log::debug!("{} of {} countries match", grid.cards().len(), store.len());

    let mut writer = io::stdout().lock();
    match args.format {
        OutputFormat::Json => {
            writeln!(writer, "{}", serde_json::to_string_pretty(grid.cards())?)?;
        }
        OutputFormat::Human => write_table(grid.cards(), writer)?,
    }
    Ok(())
}

fn write_table<W: Write>(cards: &[CardView], mut writer: W) -> io::Result<()> {
    if cards.is_empty() {
        return writeln!(writer, "No countries found");
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(comfy_table::ContentArrangement::DynamicFullWidth);
    table.set_header(vec!["Code", "Name", "Population", "Region", "Capital"]);

    for card in cards {
        table.add_row(vec![
            card.key.as_str(),
            card.name.as_str(),
            card.population.as_str(),
            card.region.as_str(),
            card.capital.as_str(),
        ]);
    }

    writeln!(writer, "{table}")
}

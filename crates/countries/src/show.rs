use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use countries_core::{BorderSection, CatalogSource, DetailView, detail_view};
use std::io::{self, Write};

use crate::catalog;
use crate::list::OutputFormat;

#[derive(Args, Debug)]
#[command(about = "Print everything known about one country")]
pub struct ShowArgs {
    /// Three-letter country code, e.g. FRA
    pub code: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

pub fn execute(args: ShowArgs, source: &dyn CatalogSource) -> Result<()> {
    let store = catalog::load(source)?;
    let code = args.code.trim().to_uppercase();

    let Some(detail) = detail_view(&store, &code) else {
        bail!("No country with code {}", args.code);
    };

    let mut writer = io::stdout().lock();
    match args.format {
        OutputFormat::Json => {
            writeln!(writer, "{}", serde_json::to_string_pretty(&detail)?)?;
        }
        OutputFormat::Human => write_detail(&detail, writer)?,
    }
    Ok(())
}

fn border_text(borders: &BorderSection) -> String {
    match borders.placeholder() {
        Some(placeholder) => placeholder.to_string(),
        None => borders
            .links()
            .iter()
            .map(|link| link.label.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn write_detail<W: Write>(detail: &DetailView, mut writer: W) -> io::Result<()> {
    writeln!(writer, "{} ({})", detail.name.bold(), detail.key)?;

    let borders = border_text(&detail.borders);
    let rows = [
        ("Flag", detail.flag_alt.as_str()),
        ("Native Name", detail.native_name.as_str()),
        ("Population", detail.population.as_str()),
        ("Region", detail.region.as_str()),
        ("Sub Region", detail.subregion.as_str()),
        ("Capital", detail.capital.as_str()),
        ("Top Level Domain", detail.top_level_domains.as_str()),
        ("Currencies", detail.currencies.as_str()),
        ("Languages", detail.languages.as_str()),
        ("Border Countries", borders.as_str()),
    ];
    for (label, value) in rows {
        writeln!(writer, "  {} {}", format!("{label:<17}").dimmed(), value)?;
    }
    Ok(())
}

use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;
use std::path::PathBuf;

mod browse;
mod catalog;
mod list;
mod show;
mod theme;

#[derive(Parser)]
#[command(name = "countries")]
#[command(about = "Browse world country data from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true, hide = true)]
    debug: bool,

    /// Base URL of the REST Countries API
    #[arg(long, global = true, value_name = "URL", env = "COUNTRIES_API_URL")]
    api_url: Option<String>,

    /// Read the catalog from a JSON file instead of the API (takes precedence over --api-url)
    #[arg(long, global = true, value_name = "PATH")]
    catalog_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive browser (default)
    #[command(alias = "b")]
    Browse,

    /// Print countries matching a search and region
    #[command(alias = "ls")]
    List(list::ListArgs),

    /// Print everything known about one country
    Show(show::ShowArgs),

    /// Show or toggle the saved display theme
    Theme(theme::ThemeArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger with default level depending on --debug (overridden by RUST_LOG)
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("error")
    };
    env_logger::Builder::from_env(env).init();

    let source = || catalog::source(cli.api_url.as_deref(), cli.catalog_file.as_deref());

    match cli.command {
        None | Some(Commands::Browse) => browse::execute(source()),
        Some(Commands::List(args)) => list::execute(args, source().as_ref()),
        Some(Commands::Show(args)) => show::execute(args, source().as_ref()),
        Some(Commands::Theme(args)) => theme::execute(args),
    }
}

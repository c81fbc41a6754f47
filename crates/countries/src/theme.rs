use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use countries_core::{PreferenceStore, ThemeController};

#[derive(Args, Debug)]
#[command(about = "Show or toggle the saved display theme")]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub action: Option<ThemeAction>,
}

#[derive(Subcommand, Debug)]
pub enum ThemeAction {
    /// Print the saved theme (default)
    Show,
    /// Switch between light and dark and save the result
    Toggle,
}

pub fn execute(args: ThemeArgs) -> Result<()> {
    let store = PreferenceStore::open_default()?;
    log::debug!("Preferences at {}", store.path().display());
    let mut controller = ThemeController::load(store);

    match args.action.unwrap_or(ThemeAction::Show) {
        ThemeAction::Show => println!("{}", controller.current()),
        ThemeAction::Toggle => {
            let theme = controller.toggle()?;
            println!("Theme set to {}", theme.to_string().bold());
        }
    }
    Ok(())
}

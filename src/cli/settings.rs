//! Code related to CLI commands for the program settings.
use crate::settings::{Settings, get_settings_file_path};
use anyhow::Result;
use clap::Subcommand;

/// The available subcommands for managing the settings file.
#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Show the path to where the settings file is read from.
    ShowPath,
    /// Show the contents of a default settings file, with all options commented out.
    ShowDefault,
}

impl SettingsSubcommands {
    /// Execute the supplied settings subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::ShowPath => handle_show_path_command(),
            Self::ShowDefault => handle_show_default_command()?,
        }

        Ok(())
    }
}

/// Handle the `settings show-path` command.
fn handle_show_path_command() {
    println!("{}", get_settings_file_path().display());
}

/// Handle the `settings show-default` command.
fn handle_show_default_command() -> Result<()> {
    print!("{}", Settings::default_file_contents()?);

    Ok(())
}

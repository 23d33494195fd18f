//! Code related to the example data sets and the CLI commands for interacting with them.
use super::{AssessOpts, handle_assess_command};
use crate::example::{Example, get_example_names};
use crate::settings::Settings;
use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The available subcommands for managing example data sets.
#[derive(Subcommand)]
pub enum ExampleSubcommands {
    /// List available examples.
    List,
    /// Provide information about the specified example.
    Info {
        /// The name of the example.
        name: String,
    },
    /// Extract an example data set to a new directory.
    Extract {
        /// The name of the example to extract.
        name: String,
        /// The destination folder for the example.
        new_path: Option<PathBuf>,
    },
    /// Assess an example.
    Run {
        /// The name of the example to run.
        name: String,
        /// Other assessment options
        #[command(flatten)]
        opts: AssessOpts,
    },
}

impl ExampleSubcommands {
    /// Execute the supplied example subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::List => handle_example_list_command(),
            Self::Info { name } => handle_example_info_command(&name)?,
            Self::Extract { name, new_path } => {
                handle_example_extract_command(&name, new_path.as_deref())?;
            }
            Self::Run { name, opts } => handle_example_run_command(&name, &opts, None)?,
        }

        Ok(())
    }
}

/// Handle the `example list` command.
fn handle_example_list_command() {
    for name in get_example_names() {
        println!("{name}");
    }
}

/// Handle the `example info` command.
fn handle_example_info_command(name: &str) -> Result<()> {
    // If we can't load it, it's a bug, hence why we panic
    let info = Example::from_name(name)?
        .get_readme()
        .unwrap_or_else(|_| panic!("Could not load README.txt for '{name}' example"));
    print!("{info}");

    Ok(())
}

/// Handle the `example extract` command
fn handle_example_extract_command(name: &str, dest: Option<&Path>) -> Result<()> {
    Example::from_name(name)?.extract(dest.unwrap_or(Path::new(name)))
}

/// Handle the `example run` command.
pub fn handle_example_run_command(
    name: &str,
    opts: &AssessOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let example = Example::from_name(name)?;
    let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
    let data_path = temp_dir.path().join(name);
    example
        .extract(&data_path)
        .context("Could not extract example")?;
    handle_assess_command(&data_path, opts, settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_dir_non_empty(path: &Path) {
        assert!(
            path.read_dir().unwrap().next().is_some(),
            "Directory is empty"
        );
    }

    #[test]
    fn check_extract_example() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("out");
        handle_example_extract_command("simple", Some(&dest)).unwrap();
        assert_dir_non_empty(&dest);
        assert!(dest.join("assessment.toml").is_file());
    }
}

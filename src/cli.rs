//! The command line interface for the assessment engine.
use crate::assessment::{AssessmentParameters, assess};
use crate::input::validate::validate_data;
use crate::input::{CsvDataSource, InMemorySource};
use crate::log;
use crate::output::metadata::write_metadata;
use crate::output::{create_output_directory, get_output_dir, write_assessment};
use crate::price_area::PriceArea;
use crate::projection::ProductType;
use crate::settings::Settings;
use ::log::{info, warn};
use anyhow::{Context, Result, ensure};
use chrono::NaiveDate;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;

pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the assessment engine.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the `assess` command
#[derive(Args, Default)]
pub struct AssessOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// The price area to assess
    #[arg(long)]
    pub price_area: Option<PriceArea>,
    /// First day of the period (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
    /// Last day of the period, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<NaiveDate>,
    /// The kind of flexibility product
    #[arg(long, value_enum)]
    pub product_type: Option<ProductType>,
    /// Capacity made available, in MW
    #[arg(long, value_name = "MW")]
    pub available_capacity: Option<f64>,
    /// Percentage of the available capacity which is activated (0 to 100)
    #[arg(long, value_name = "PERCENT")]
    pub activated_fraction: Option<f64>,
}

impl AssessOpts {
    /// The request parameters given on the command line
    fn parameters(&self) -> AssessmentParameters {
        AssessmentParameters {
            price_area: self.price_area,
            start_date: self.start_date,
            end_date: self.end_date,
            product_type: self.product_type,
            available_capacity_mw: self.available_capacity,
            activated_fraction_pct: self.activated_fraction,
        }
    }
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Assess the CO2 saved by a flexibility product.
    Assess {
        /// Path to the data directory.
        data_dir: PathBuf,
        /// Other assessment options
        #[command(flatten)]
        opts: AssessOpts,
    },
    /// Manage example data sets.
    Example {
        /// The available subcommands for managing example data sets.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Validate the data in a directory.
    Validate {
        /// The path to the data directory.
        data_dir: PathBuf,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Assess { data_dir, opts } => handle_assess_command(&data_dir, &opts, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Validate { data_dir } => handle_validate_command(&data_dir, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start the program
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ flexfordel --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    if let Some(command) = cli.command {
        command.execute()?;
    } else {
        // No command provided. Show help.
        Cli::command().print_long_help()?;
    }

    Ok(())
}

/// Handle the `assess` command.
pub fn handle_assess_command(
    data_dir: &Path,
    opts: &AssessOpts,
    settings: Option<Settings>,
) -> Result<()> {
    // Load program settings, if not provided
    let mut settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // This setting can be overridden by command-line arguments
    if opts.overwrite {
        settings.overwrite = true;
    }

    // Read and check the request before creating any output
    let request = AssessmentParameters::from_data_dir(data_dir)
        .context("Failed to load assessment parameters.")?
        .with_overrides(opts.parameters())
        .into_request()
        .context("Invalid assessment request.")?;

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(data_dir, settings.results_root)?;
        &pathbuf
    };

    let overwrite =
        create_output_directory(output_path, settings.overwrite).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    // Initialise program logger
    log::init(&settings.log_level, Some(output_path)).context("Failed to initialise logging.")?;

    info!("Starting flexfordel v{}", env!("CARGO_PKG_VERSION"));
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    // Read everything up front so that each dataset is only parsed once
    let source = InMemorySource::from_source(&CsvDataSource::new(data_dir))
        .context("Failed to load data.")?;
    info!("Loaded data from {}", data_dir.display());

    let assessment = assess(&source, &request).context("Assessment failed.")?;
    write_metadata(output_path, data_dir).context("Failed to save metadata.")?;
    write_assessment(output_path, &assessment, settings.hourly_output)
        .context("Failed to save results.")?;

    info!(
        "Total CO2 saved: {:.0} kg",
        assessment.total_co2_saved().value()
    );
    info!(
        "Mean CO2 intensity: {:.0} g/kWh",
        assessment.mean_intensity().value()
    );
    info!("Assessment complete!");

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(data_dir: &Path, settings: Option<Settings>) -> Result<()> {
    // Load program settings, if not provided
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(&settings.log_level, None).context("Failed to initialise logging.")?;

    let report =
        validate_data(&CsvDataSource::new(data_dir)).context("Failed to validate data.")?;
    for (dataset, count) in &report.record_counts {
        info!("{dataset}: {count} records");
    }
    info!("{} hours present in all datasets", report.joined_hours);
    for issue in &report.issues {
        warn!("{issue}");
    }

    ensure!(
        report.is_valid(),
        "Data validation failed with {} issue(s).",
        report.issues.len()
    );
    info!("Data validation successful!");

    Ok(())
}

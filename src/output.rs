//! The module responsible for writing output data to disk.
use crate::assessment::Assessment;
use crate::production::ProportionCategory;
use crate::units::Dimensionless;
use anyhow::{Context, Result, ensure};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The output file name for production proportions
const PROPORTIONS_FILE_NAME: &str = "proportions.csv";

/// The output file name for the daily CO2 saved
const DAILY_SAVINGS_FILE_NAME: &str = "daily_savings.csv";

/// The output file name for the hourly intensities
const HOURLY_INTENSITY_FILE_NAME: &str = "hourly_intensity.csv";

/// The output file name for the summary of an assessment
const SUMMARY_FILE_NAME: &str = "summary.toml";

/// Get the default output directory for the data in the specified directory
pub fn get_output_dir(data_dir: &Path, results_root: PathBuf) -> Result<PathBuf> {
    // Get the data set name from the directory path
    let data_dir = data_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to data directory")?;

    let name = data_dir
        .file_name()
        .context("Data directory cannot be the root folder")?
        .to_str()
        .context("Invalid chars in data directory name")?;

    Ok([results_root, name.into()].iter().collect())
}

/// Create a new output directory, deleting the existing one if `allow_overwrite` is set.
///
/// # Returns
///
/// `true` if an existing, non-empty directory was deleted, otherwise `false`.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let overwrite = if let Ok(mut it) = fs::read_dir(output_dir) {
        if it.next().is_none() {
            // Folder exists and is empty: nothing to do
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Please delete the folder or pass the \
             --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir)?;
        true
    } else {
        false
    };

    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// A row of the production proportions file
#[derive(Serialize)]
struct ProportionRow {
    category: ProportionCategory,
    share: Dimensionless,
}

/// Totals and request parameters for an assessment
#[derive(Serialize)]
struct Summary {
    price_area: String,
    start_date: String,
    end_date: String,
    product_type: String,
    available_capacity_mw: f64,
    activated_fraction_pct: f64,
    daily_energy_kwh: f64,
    total_co2_saved_kg: f64,
    mean_intensity_g_per_kwh: f64,
    days_requested: u64,
    days: usize,
    hours_used: usize,
    hours_excluded: usize,
    hours_dropped: usize,
}

impl Summary {
    fn new(assessment: &Assessment) -> Self {
        let request = &assessment.request;
        let reduction = &assessment.reduction;
        Self {
            price_area: request.price_area.to_string(),
            start_date: request.period.first_day().to_string(),
            end_date: request.period.last_day().to_string(),
            product_type: request.product_type.to_string(),
            available_capacity_mw: request.available_capacity.value(),
            activated_fraction_pct: request.activated_fraction_pct,
            daily_energy_kwh: assessment.savings.daily_energy().value(),
            total_co2_saved_kg: assessment.total_co2_saved().value(),
            mean_intensity_g_per_kwh: assessment.mean_intensity().value(),
            days_requested: request.period.num_days(),
            days: assessment.savings.daily().len(),
            hours_used: reduction.hours().len(),
            hours_excluded: reduction.excluded_hours().len(),
            hours_dropped: reduction.dropped_hours(),
        }
    }
}

/// Write a series of rows to a CSV file
fn write_csv<T, I>(file_path: &Path, rows: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = csv::Writer::from_path(file_path)
        .with_context(|| format!("Could not create {}", file_path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Write the results of an assessment to `output_path`.
///
/// The per-hour quantities are only written if `hourly_output` is set.
pub fn write_assessment(
    output_path: &Path,
    assessment: &Assessment,
    hourly_output: bool,
) -> Result<()> {
    write_csv(
        &output_path.join(PROPORTIONS_FILE_NAME),
        assessment
            .proportions
            .iter()
            .map(|(category, share)| ProportionRow { category, share }),
    )?;
    write_csv(
        &output_path.join(DAILY_SAVINGS_FILE_NAME),
        assessment.savings.daily(),
    )?;
    if hourly_output {
        write_csv(
            &output_path.join(HOURLY_INTENSITY_FILE_NAME),
            assessment.reduction.hours(),
        )?;
    }

    let summary = toml::to_string(&Summary::new(assessment))?;
    fs::write(output_path.join(SUMMARY_FILE_NAME), summary)?;

    Ok(())
}

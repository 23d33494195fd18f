//! Run a complete assessment of a flexibility product for one request.
//!
//! An assessment loads the datasets for the requested period and price area, calculates the mix of
//! non-renewable production, derives the hourly intensity series and projects it onto the product
//! to give the daily CO2 saved.
use crate::error::EmissionError;
use crate::input::{DataSource, read_toml};
use crate::period::Period;
use crate::price_area::PriceArea;
use crate::projection::{ProductType, Savings, daily_energy, project_savings};
use crate::proportion::{ProductionProportions, compute_proportions};
use crate::reduction::{Co2Reduction, compute_co2_diff};
use crate::units::{GramsPerKilowattHour, Kilograms, Megawatts};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use serde::Deserialize;
use std::path::Path;

/// The name of the optional file in a data directory holding the request parameters
pub const ASSESSMENT_FILE_NAME: &str = "assessment.toml";

/// Request parameters, any of which may be missing.
///
/// These are read from `assessment.toml` and can be overridden on the command line.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssessmentParameters {
    /// The price area to assess
    pub price_area: Option<PriceArea>,
    /// First day of the period
    pub start_date: Option<NaiveDate>,
    /// Last day of the period (inclusive)
    pub end_date: Option<NaiveDate>,
    /// The kind of flexibility product
    pub product_type: Option<ProductType>,
    /// Capacity made available, in MW
    pub available_capacity_mw: Option<f64>,
    /// Percentage of the available capacity which is activated
    pub activated_fraction_pct: Option<f64>,
}

impl AssessmentParameters {
    /// Read parameters from `assessment.toml` in `data_dir`, if present
    pub fn from_data_dir(data_dir: &Path) -> Result<Self> {
        let file_path = data_dir.join(ASSESSMENT_FILE_NAME);
        if !file_path.is_file() {
            return Ok(Self::default());
        }

        read_toml(&file_path)
    }

    /// Replace parameters with those from `overrides`, where given
    pub fn with_overrides(self, overrides: AssessmentParameters) -> Self {
        Self {
            price_area: overrides.price_area.or(self.price_area),
            start_date: overrides.start_date.or(self.start_date),
            end_date: overrides.end_date.or(self.end_date),
            product_type: overrides.product_type.or(self.product_type),
            available_capacity_mw: overrides
                .available_capacity_mw
                .or(self.available_capacity_mw),
            activated_fraction_pct: overrides
                .activated_fraction_pct
                .or(self.activated_fraction_pct),
        }
    }

    /// Convert into a complete [`Request`].
    ///
    /// The price area, dates and product type are required. Capacity and activation default to
    /// zero.
    pub fn into_request(self) -> Result<Request> {
        let price_area = self.price_area.context("No price area given")?;
        let start_date = self.start_date.context("No start date given")?;
        let end_date = self.end_date.context("No end date given")?;
        let product_type = self.product_type.context("No product type given")?;
        let request = Request {
            price_area,
            period: Period::new(start_date, end_date)?,
            product_type,
            available_capacity: Megawatts(self.available_capacity_mw.unwrap_or(0.0)),
            activated_fraction_pct: self.activated_fraction_pct.unwrap_or(0.0),
        };

        // Check capacity and activation now, rather than after loading data
        daily_energy(request.available_capacity, request.activated_fraction_pct)?;

        Ok(request)
    }
}

/// A complete request for an assessment
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// The price area to assess
    pub price_area: PriceArea,
    /// The days to assess
    pub period: Period,
    /// The kind of flexibility product
    pub product_type: ProductType,
    /// Capacity made available
    pub available_capacity: Megawatts,
    /// Percentage of the available capacity which is activated
    pub activated_fraction_pct: f64,
}

/// Everything calculated for a [`Request`]
#[derive(Debug, Clone)]
pub struct Assessment {
    /// The request which was assessed
    pub request: Request,
    /// Mix of non-renewable production over the period
    pub proportions: ProductionProportions,
    /// Hourly intensities over the period
    pub reduction: Co2Reduction,
    /// CO2 saved by the product
    pub savings: Savings,
}

impl Assessment {
    /// Total CO2 saved over the period
    pub fn total_co2_saved(&self) -> Kilograms {
        self.savings.total()
    }

    /// Mean of the daily intensities relevant to the product
    pub fn mean_intensity(&self) -> GramsPerKilowattHour {
        self.savings.mean_intensity()
    }
}

/// Run an assessment.
///
/// Production proportions are calculated over whole days, from midnight at the start of the first
/// day up to (but not including) midnight after the last day. The intensity series covers every
/// hour from the start of the first day to the start of the last hour of the last day.
pub fn assess<S: DataSource>(source: &S, request: &Request) -> Result<Assessment, EmissionError> {
    let period = request.period;
    info!(
        "Assessing {} regulation in {} from {} to {}",
        request.product_type,
        request.price_area,
        period.first_day(),
        period.last_day()
    );

    let proportions = compute_proportions(
        source,
        period.start(),
        period.end_exclusive(),
        request.price_area,
    )?;
    let reduction = compute_co2_diff(
        source,
        period.start(),
        period.last_hour(),
        request.price_area,
    )?;
    let savings = project_savings(
        &request.product_type.select(&reduction),
        request.available_capacity,
        request.activated_fraction_pct,
    )?;

    Ok(Assessment {
        request: request.clone(),
        proportions,
        reduction,
        savings,
    })
}

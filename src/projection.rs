//! Project an hourly CO2-intensity series onto a flexibility product.
//!
//! A flexibility product shifts a fixed amount of energy each day. The mass of CO2 it avoids on a
//! given day is the day's mean intensity multiplied by that energy.
use crate::error::EmissionError;
use crate::input::Dataset;
use crate::reduction::{Co2Reduction, IntensitySeries};
use crate::units::{GramsPerKilowattHour, KWH_PER_MWH, Kilograms, KilowattHours, Megawatts};
use chrono::NaiveDate;
use serde::Serialize;
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};
use std::collections::BTreeMap;

/// Number of hours in a day
const HOURS_PER_DAY: f64 = 24.0;

/// The kind of flexibility product being assessed
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    clap::ValueEnum,
    SerializeLabeledStringEnum,
    DeserializeLabeledStringEnum,
)]
pub enum ProductType {
    /// Up-regulation: consumption is moved away from non-renewable production
    #[string = "up"]
    Up,
    /// Down-regulation: consumption is added at the grid-average intensity
    #[string = "down"]
    Down,
}

impl ProductType {
    /// The intensity series relevant to this product type
    pub fn select(&self, reduction: &Co2Reduction) -> IntensitySeries {
        match self {
            Self::Up => reduction.co2_diff_series(),
            Self::Down => reduction.co2_equiv_series(),
        }
    }
}

/// The CO2 saved on a single day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySaving {
    /// The (UTC) day
    pub date: NaiveDate,
    /// Mean of the hourly intensities on this day
    #[serde(rename = "mean_intensity_g_per_kwh")]
    pub mean_intensity: GramsPerKilowattHour,
    /// Mass of CO2 saved
    #[serde(rename = "co2_saved_kg")]
    pub co2_saved: Kilograms,
}

/// The CO2 saved by a flexibility product over a period
#[derive(Debug, Clone, PartialEq)]
pub struct Savings {
    daily: Vec<DailySaving>,
    daily_energy: KilowattHours,
}

impl Savings {
    /// Savings per day, ordered by date. Days without any hourly values are absent.
    pub fn daily(&self) -> &[DailySaving] {
        &self.daily
    }

    /// Energy shifted by the product each day
    pub fn daily_energy(&self) -> KilowattHours {
        self.daily_energy
    }

    /// Total CO2 saved over all days
    pub fn total(&self) -> Kilograms {
        self.daily.iter().map(|day| day.co2_saved).sum()
    }

    /// Mean of the daily mean intensities
    pub fn mean_intensity(&self) -> GramsPerKilowattHour {
        let sum: GramsPerKilowattHour = self.daily.iter().map(|day| day.mean_intensity).sum();
        GramsPerKilowattHour(sum.value() / self.daily.len() as f64)
    }
}

/// Energy shifted each day by a product with the given capacity and activation.
///
/// # Arguments
///
/// * `available_capacity` - Capacity the consumer makes available
/// * `activated_pct` - Percentage of the capacity that is activated (0 to 100)
pub fn daily_energy(
    available_capacity: Megawatts,
    activated_pct: f64,
) -> Result<KilowattHours, EmissionError> {
    if !(available_capacity.is_finite() && available_capacity.value() >= 0.0) {
        return Err(EmissionError::InvalidParameter(format!(
            "Available capacity must be a finite number greater than or equal to zero \
             (got {available_capacity})"
        )));
    }
    if !(0.0..=100.0).contains(&activated_pct) {
        return Err(EmissionError::InvalidParameter(format!(
            "Activated fraction must be between 0 and 100 (got {activated_pct})"
        )));
    }

    let activated_mw = available_capacity.value() * activated_pct / 100.0;
    Ok(KilowattHours(activated_mw * KWH_PER_MWH * HOURS_PER_DAY))
}

/// Calculate the daily CO2 saved by a flexibility product.
///
/// The hourly series is resampled to a daily mean per UTC day, which is multiplied by the energy
/// shifted per day (see [`daily_energy`]).
///
/// # Returns
///
/// The savings, [`EmissionError::InvalidParameter`] if the capacity or activation is out of range
/// or [`EmissionError::EmptyRange`] if the series is empty.
pub fn project_savings(
    series: &IntensitySeries,
    available_capacity: Megawatts,
    activated_pct: f64,
) -> Result<Savings, EmissionError> {
    let daily_energy = daily_energy(available_capacity, activated_pct)?;
    if series.is_empty() {
        return Err(EmissionError::EmptyRange {
            dataset: Dataset::DeclarationEmission,
        });
    }

    let mut days: BTreeMap<NaiveDate, (GramsPerKilowattHour, usize)> = BTreeMap::new();
    for (hour, intensity) in series {
        let (sum, count) = days.entry(hour.date_naive()).or_default();
        *sum += *intensity;
        *count += 1;
    }

    let daily = days
        .into_iter()
        .map(|(date, (sum, count))| {
            let mean_intensity = GramsPerKilowattHour(sum.value() / count as f64);
            DailySaving {
                date,
                mean_intensity,
                co2_saved: (daily_energy * mean_intensity).to_kilograms(),
            }
        })
        .collect();

    Ok(Savings {
        daily,
        daily_energy,
    })
}

//! Calculate the hourly CO2 intensity avoided by excluding renewable production.
//!
//! The grid-average intensity of an hour (`co2_equiv`) is spread over all production, including
//! renewables which emit nothing. Dividing it by the non-renewable share gives the intensity of
//! the non-renewable production alone (`co2_equiv_non_ve`); the difference between the two is the
//! intensity avoided per kWh of consumption that is moved away from that hour.
use crate::error::EmissionError;
use crate::input::validate::SHARE_SUM_TOLERANCE;
use crate::input::{
    ConsumptionRecord, DataSource, Dataset, EmissionRecord, HourKey, HourlyRecord, ShareRecord,
    load_non_empty,
};
use crate::period::calendar_month;
use crate::price_area::PriceArea;
use crate::production::ProductionGroup;
use crate::units::{Dimensionless, Grams, GramsPerKilowattHour, KilowattHours};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// A time series of CO2 intensities keyed by the start of each hour (or day)
pub type IntensitySeries = BTreeMap<DateTime<Utc>, GramsPerKilowattHour>;

/// The derived quantities for one hour and price area
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyIntensity {
    /// Start of the hour
    pub hour_utc: DateTime<Utc>,
    /// Price area
    pub price_area: PriceArea,
    /// Share of production from renewable sources
    pub share_ve: Dimensionless,
    /// Share of production from non-renewable sources
    pub share_non_ve: Dimensionless,
    /// Grid-average CO2-equivalent intensity
    pub co2_equiv: GramsPerKilowattHour,
    /// CO2-equivalent intensity of non-renewable production only
    pub co2_equiv_non_ve: GramsPerKilowattHour,
    /// Consumption met by non-renewable production
    pub consumption_non_ve: KilowattHours,
    /// Consumption-weighted average of `co2_equiv` over the calendar month, if defined
    pub co2_equiv_month: Option<GramsPerKilowattHour>,
    /// Intensity avoided by excluding renewables (`co2_equiv_non_ve - co2_equiv`)
    pub co2_diff: GramsPerKilowattHour,
}

/// The result of [`compute_co2_diff`]
#[derive(Debug, Clone, PartialEq)]
pub struct Co2Reduction {
    price_area: PriceArea,
    hours: Vec<HourlyIntensity>,
    excluded_hours: Vec<DateTime<Utc>>,
    dropped_hours: usize,
}

impl Co2Reduction {
    /// The price area the values refer to
    pub fn price_area(&self) -> PriceArea {
        self.price_area
    }

    /// The derived quantities for each usable hour, ordered by hour
    pub fn hours(&self) -> &[HourlyIntensity] {
        &self.hours
    }

    /// Hours with no non-renewable production, for which the intensity is undefined
    pub fn excluded_hours(&self) -> &[DateTime<Utc>] {
        &self.excluded_hours
    }

    /// Number of hours which were not present in all three datasets
    pub fn dropped_hours(&self) -> usize {
        self.dropped_hours
    }

    /// The avoided intensity (`co2_diff`) per hour
    pub fn co2_diff_series(&self) -> IntensitySeries {
        self.hours
            .iter()
            .map(|hour| (hour.hour_utc, hour.co2_diff))
            .collect()
    }

    /// The grid-average intensity (`co2_equiv`) per hour
    pub fn co2_equiv_series(&self) -> IntensitySeries {
        self.hours
            .iter()
            .map(|hour| (hour.hour_utc, hour.co2_equiv))
            .collect()
    }
}

/// Renewable and non-renewable shares for an hour, as summed from the raw records
#[derive(Debug, Default)]
struct SharePivot {
    ve: Option<f64>,
    non_ve: Option<f64>,
}

/// Compute the hourly CO2 intensities for a price area.
///
/// # Arguments
///
/// * `source` - Where to load the datasets from
/// * `start` - Start of the first hour (inclusive)
/// * `end` - Start of the last hour (inclusive)
/// * `price_area` - The price area of interest
///
/// # Returns
///
/// The derived quantities for every hour present in all three datasets. Hours without any
/// non-renewable production are excluded and listed in [`Co2Reduction::excluded_hours`]. If no
/// hours remain, [`EmissionError::EmptyRange`] is returned.
pub fn compute_co2_diff<S: DataSource>(
    source: &S,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    price_area: PriceArea,
) -> Result<Co2Reduction, EmissionError> {
    let shares = pivot_shares(&load_non_empty::<ShareRecord, _>(
        source, start, end, price_area,
    )?)?;
    let emissions = index_by_key(load_non_empty::<EmissionRecord, _>(
        source, start, end, price_area,
    )?)?;
    let consumption = index_by_key(load_non_empty::<ConsumptionRecord, _>(
        source, start, end, price_area,
    )?)?;

    let all_keys: BTreeSet<HourKey> = shares
        .keys()
        .chain(emissions.keys())
        .chain(consumption.keys())
        .copied()
        .collect();

    let mut hours = Vec::new();
    let mut excluded_hours = Vec::new();
    let mut dropped_hours = 0;
    for key in all_keys {
        let (Some(&(share_ve, share_non_ve)), Some(emission), Some(consumption)) = (
            shares.get(&key),
            emissions.get(&key),
            consumption.get(&key),
        ) else {
            dropped_hours += 1;
            continue;
        };

        match hourly_intensity(
            key,
            share_ve,
            share_non_ve,
            emission.co2_equiv(),
            consumption.consumption(),
        ) {
            Ok(hour) => hours.push(hour),
            Err(err) => {
                debug!("{err}");
                excluded_hours.push(key.hour_utc);
            }
        }
    }

    if dropped_hours > 0 {
        debug!("Dropped {dropped_hours} hour(s) for {price_area} lacking data in some dataset");
    }
    if !excluded_hours.is_empty() {
        warn!(
            "Excluded {} hour(s) for {price_area} with no non-renewable production",
            excluded_hours.len()
        );
    }
    if hours.is_empty() {
        return Err(EmissionError::EmptyRange {
            dataset: Dataset::DeclarationCoverage,
        });
    }

    apply_monthly_intensity(&mut hours);

    Ok(Co2Reduction {
        price_area,
        hours,
        excluded_hours,
        dropped_hours,
    })
}

/// Sum shares into renewable and non-renewable parts for each hour.
///
/// An hour with only renewable rows has a non-renewable share of zero. Hours without any renewable
/// rows, or whose shares are all zero, are skipped. Parts which do not sum to one are renormalised.
fn pivot_shares(
    records: &[ShareRecord],
) -> Result<BTreeMap<HourKey, (Dimensionless, Dimensionless)>, EmissionError> {
    let mut seen: HashSet<(HourKey, ProductionGroup)> = HashSet::new();
    let mut pivots: BTreeMap<HourKey, SharePivot> = BTreeMap::new();
    for record in records {
        let key = record.key();
        if !seen.insert((key, record.production_group)) {
            return Err(duplicate_record::<ShareRecord>(key));
        }

        let pivot = pivots.entry(key).or_default();
        let part = if record.production_group.is_ve() {
            &mut pivot.ve
        } else {
            &mut pivot.non_ve
        };
        *part.get_or_insert(0.0) += record.share;
    }

    let mut shares = BTreeMap::new();
    let mut num_renormalised = 0;
    for (key, pivot) in pivots {
        let Some(mut ve) = pivot.ve else {
            debug!("No renewable shares for {} at {}", key.price_area, key.hour_utc);
            continue;
        };
        let mut non_ve = pivot.non_ve.unwrap_or(0.0);

        let total = ve + non_ve;
        if total <= 0.0 {
            debug!("Shares for {} at {} are all zero", key.price_area, key.hour_utc);
            continue;
        }
        if (total - 1.0).abs() > SHARE_SUM_TOLERANCE {
            debug!("Shares for {} at {} sum to {total}", key.price_area, key.hour_utc);
            num_renormalised += 1;
            ve /= total;
            non_ve /= total;
        }

        shares.insert(key, (Dimensionless(ve), Dimensionless(non_ve)));
    }

    if num_renormalised > 0 {
        warn!("Renormalised shares for {num_renormalised} hour(s) which did not sum to 1");
    }

    Ok(shares)
}

/// Index records by their key, failing if any key occurs twice
fn index_by_key<R: HourlyRecord>(records: Vec<R>) -> Result<HashMap<HourKey, R>, EmissionError> {
    let mut map = HashMap::with_capacity(records.len());
    for record in records {
        let key = record.key();
        if map.insert(key, record).is_some() {
            return Err(duplicate_record::<R>(key));
        }
    }

    Ok(map)
}

fn duplicate_record<R: HourlyRecord>(key: HourKey) -> EmissionError {
    EmissionError::DuplicateRecord {
        dataset: R::DATASET,
        hour: key.hour_utc,
        price_area: key.price_area,
    }
}

/// Derive the per-hour quantities (apart from the monthly intensity) for one joined hour
fn hourly_intensity(
    key: HourKey,
    share_ve: Dimensionless,
    share_non_ve: Dimensionless,
    co2_equiv: GramsPerKilowattHour,
    consumption: KilowattHours,
) -> Result<HourlyIntensity, EmissionError> {
    if share_non_ve.value() <= 0.0 {
        return Err(EmissionError::UndefinedIntensity {
            hour: key.hour_utc,
            price_area: key.price_area,
        });
    }

    let co2_equiv_non_ve = co2_equiv / share_non_ve;
    Ok(HourlyIntensity {
        hour_utc: key.hour_utc,
        price_area: key.price_area,
        share_ve,
        share_non_ve,
        co2_equiv,
        co2_equiv_non_ve,
        consumption_non_ve: consumption * share_non_ve,
        co2_equiv_month: None,
        co2_diff: co2_equiv_non_ve - co2_equiv,
    })
}

/// Set the consumption-weighted monthly intensity on every hour.
///
/// Months are grouped by price area, year and month.
///
/// NB: The monthly intensity is reported but is NOT used to calculate `co2_diff`.
// TODO: Decide whether `co2_diff` should be based on the monthly intensity instead
fn apply_monthly_intensity(hours: &mut [HourlyIntensity]) {
    let mut totals: HashMap<(PriceArea, (i32, u32)), (Grams, KilowattHours)> = HashMap::new();
    for hour in hours.iter() {
        let (emitted, consumed) = totals
            .entry((hour.price_area, calendar_month(hour.hour_utc)))
            .or_default();
        *emitted += hour.consumption_non_ve * hour.co2_equiv;
        *consumed += hour.consumption_non_ve;
    }

    for hour in hours.iter_mut() {
        let (emitted, consumed) = totals[&(hour.price_area, calendar_month(hour.hour_utc))];
        hour.co2_equiv_month = (consumed.value() > 0.0).then(|| emitted / consumed);
    }
}

//! Checks on the consistency of a full set of input datasets.
use super::{DataSource, Dataset, HourKey, HourlyRecord, InMemorySource, ShareRecord};
use crate::error::EmissionError;
use crate::production::ProductionGroup;
use log::debug;
use std::collections::{BTreeMap, HashSet};

/// The largest deviation from 1 tolerated when summing shares for an hour
pub const SHARE_SUM_TOLERANCE: f64 = 1e-6;

/// The outcome of checking a set of datasets
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Number of records read per dataset
    pub record_counts: Vec<(Dataset, usize)>,
    /// Number of (hour, price area) keys present in all three datasets
    pub joined_hours: usize,
    /// Problems found with the data
    pub issues: Vec<String>,
}

impl ValidationReport {
    /// Whether no problems were found
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Read every dataset from `source` and check it for consistency.
///
/// The following are reported as issues:
///
/// * A dataset without any records
/// * More than one record for the same key (and production group, for shares)
/// * Shares for an hour which do not sum to 1
///
/// Failing to read a dataset is an error.
pub fn validate_data<S: DataSource>(source: &S) -> Result<ValidationReport, EmissionError> {
    let data = InMemorySource::from_source(source)?;
    let mut report = ValidationReport {
        record_counts: vec![
            (Dataset::DeclarationCoverage, data.shares.len()),
            (Dataset::DeclarationEmission, data.emissions.len()),
            (Dataset::ProductionConsumption, data.consumption.len()),
        ],
        ..ValidationReport::default()
    };

    for (dataset, count) in &report.record_counts {
        if *count == 0 {
            report.issues.push(format!("{dataset}: no records"));
        }
    }

    let share_keys = check_shares(&data.shares, &mut report.issues);
    let emission_keys = check_unique_keys(&data.emissions, &mut report.issues);
    let consumption_keys = check_unique_keys(&data.consumption, &mut report.issues);

    report.joined_hours = share_keys
        .iter()
        .filter(|key| emission_keys.contains(key) && consumption_keys.contains(key))
        .count();
    debug!("{} hours are present in all datasets", report.joined_hours);

    Ok(report)
}

/// Check that each key occurs at most once, returning the set of keys
fn check_unique_keys<R: HourlyRecord>(
    records: &[R],
    issues: &mut Vec<String>,
) -> HashSet<HourKey> {
    let mut keys = HashSet::new();
    for record in records {
        let key = record.key();
        if !keys.insert(key) {
            issues.push(format!(
                "{}: duplicate record for {} at {}",
                R::DATASET,
                key.price_area,
                key.hour_utc
            ));
        }
    }

    keys
}

/// Check share records for duplicates and that each hour's shares sum to 1
fn check_shares(records: &[ShareRecord], issues: &mut Vec<String>) -> HashSet<HourKey> {
    let mut seen: HashSet<(HourKey, ProductionGroup)> = HashSet::new();
    let mut totals: BTreeMap<HourKey, f64> = BTreeMap::new();
    for record in records {
        let key = record.key();
        if !seen.insert((key, record.production_group)) {
            issues.push(format!(
                "{}: duplicate record for {} ({}) at {}",
                ShareRecord::DATASET,
                key.price_area,
                record.production_group,
                key.hour_utc
            ));
        }

        *totals.entry(key).or_default() += record.share;
    }

    for (key, total) in &totals {
        if (total - 1.0).abs() > SHARE_SUM_TOLERANCE {
            issues.push(format!(
                "{}: shares for {} at {} sum to {total} (expected 1)",
                ShareRecord::DATASET,
                key.price_area,
                key.hour_utc
            ));
        }
    }

    totals.into_keys().collect()
}

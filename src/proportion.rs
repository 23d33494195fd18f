//! Calculate the mix of non-renewable production displaced by a flexibility product.
//!
//! For a window of time, the share of each non-renewable production group is summed over all
//! hours and normalised by the total across all non-renewable groups. Straw and wood residue are
//! reported together as biomass.
use crate::error::EmissionError;
use crate::input::{DataSource, Dataset, ShareRecord};
use crate::period::within_half_open;
use crate::price_area::PriceArea;
use crate::production::{ProductionGroup, ProportionCategory};
use crate::units::Dimensionless;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log::debug;
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

/// Production groups which are folded into the biomass category and may be missing from the data
const WOOD_FUELS: [ProductionGroup; 2] = [ProductionGroup::Straw, ProductionGroup::WoodResidue];

/// The proportion of non-renewable production attributable to each [`ProportionCategory`].
///
/// Every category is always present (possibly with a proportion of zero) and the proportions sum
/// to one.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionProportions(IndexMap<ProportionCategory, Dimensionless>);

impl ProductionProportions {
    /// The proportion for the given category
    pub fn get(&self, category: ProportionCategory) -> Dimensionless {
        self.0[&category]
    }

    /// Iterate over the categories and their proportions, in reporting order
    pub fn iter(&self) -> impl Iterator<Item = (ProportionCategory, Dimensionless)> + '_ {
        self.0.iter().map(|(category, share)| (*category, *share))
    }

    /// The sum of all proportions
    pub fn total(&self) -> Dimensionless {
        self.0.values().copied().sum()
    }
}

/// Compute the proportion of non-renewable production per category.
///
/// # Arguments
///
/// * `source` - Where to load production shares from
/// * `start` - Start of the window (inclusive)
/// * `end` - End of the window (exclusive)
/// * `price_area` - The price area of interest
///
/// # Returns
///
/// The proportions, or [`EmissionError::EmptyRange`] if there was no non-renewable production in
/// the window.
pub fn compute_proportions<S: DataSource>(
    source: &S,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    price_area: PriceArea,
) -> Result<ProductionProportions, EmissionError> {
    let records: Vec<ShareRecord> = source.load(start, end, price_area)?;
    proportions_from_records(
        records
            .iter()
            .filter(|record| within_half_open(record.hour_utc, start, end)),
    )
}

/// Compute proportions from share records which have already been filtered
fn proportions_from_records<'a, I>(records: I) -> Result<ProductionProportions, EmissionError>
where
    I: Iterator<Item = &'a ShareRecord>,
{
    // Sum shares per (hour, group) first, then across hours
    let mut hourly: BTreeMap<(DateTime<Utc>, ProductionGroup), f64> = BTreeMap::new();
    for record in records.filter(|record| !record.production_group.is_ve()) {
        *hourly
            .entry((record.hour_utc, record.production_group))
            .or_default() += record.share;
    }

    let mut per_group: BTreeMap<ProductionGroup, f64> = BTreeMap::new();
    for ((_, group), share) in hourly {
        *per_group.entry(group).or_default() += share;
    }

    let total: f64 = per_group.values().sum();
    if total <= 0.0 {
        return Err(EmissionError::EmptyRange {
            dataset: Dataset::DeclarationCoverage,
        });
    }

    for group in WOOD_FUELS {
        if !per_group.contains_key(&group) {
            debug!("No {group} production in window; counting it as zero");
        }
    }

    // Pre-seed every category so that missing groups contribute zero
    let mut proportions: IndexMap<_, _> = ProportionCategory::iter()
        .map(|category| (category, Dimensionless(0.0)))
        .collect();
    for (group, share) in per_group {
        let category = group
            .category()
            .expect("Renewable groups were filtered out");
        proportions[&category] += Dimensionless(share / total);
    }

    Ok(ProductionProportions(proportions))
}

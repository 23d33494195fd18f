//! Records of the share of production per production group.
use super::{
    Dataset, HourlyRecord, InMemorySource, deserialise_hour_utc, deserialise_non_negative,
};
use crate::price_area::PriceArea;
use crate::production::ProductionGroup;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// The share of a price area's production attributable to one production group in one hour
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShareRecord {
    /// Start of the hour
    #[serde(rename = "HourUTC", deserialize_with = "deserialise_hour_utc")]
    pub hour_utc: DateTime<Utc>,
    /// Price area
    #[serde(rename = "PriceArea")]
    pub price_area: PriceArea,
    /// Production group
    #[serde(rename = "ProductionGroup")]
    pub production_group: ProductionGroup,
    /// Fraction of total production
    #[serde(rename = "Share", deserialize_with = "deserialise_non_negative")]
    pub share: f64,
}

impl HourlyRecord for ShareRecord {
    const DATASET: Dataset = Dataset::DeclarationCoverage;

    fn hour_utc(&self) -> DateTime<Utc> {
        self.hour_utc
    }

    fn price_area(&self) -> PriceArea {
        self.price_area
    }

    fn in_memory(source: &InMemorySource) -> &[Self] {
        &source.shares
    }
}

//! Records of gross electricity consumption.
use super::{
    Dataset, HourlyRecord, InMemorySource, deserialise_hour_utc, deserialise_non_negative,
};
use crate::price_area::PriceArea;
use crate::units::{KilowattHours, MegawattHours};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Gross consumption for a price area in one hour
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConsumptionRecord {
    /// Start of the hour
    #[serde(rename = "HourUTC", deserialize_with = "deserialise_hour_utc")]
    pub hour_utc: DateTime<Utc>,
    /// Price area
    #[serde(rename = "PriceArea")]
    pub price_area: PriceArea,
    /// Gross consumption in MWh
    #[serde(rename = "GrossConsumptionMWh", deserialize_with = "deserialise_non_negative")]
    pub gross_consumption_mwh: f64,
}

impl ConsumptionRecord {
    /// Gross consumption in kWh
    pub fn consumption(&self) -> KilowattHours {
        MegawattHours(self.gross_consumption_mwh).to_kilowatt_hours()
    }
}

impl HourlyRecord for ConsumptionRecord {
    const DATASET: Dataset = Dataset::ProductionConsumption;

    fn hour_utc(&self) -> DateTime<Utc> {
        self.hour_utc
    }

    fn price_area(&self) -> PriceArea {
        self.price_area
    }

    fn in_memory(source: &InMemorySource) -> &[Self] {
        &source.consumption
    }
}

//! Records of grid-average emission factors.
use super::{
    Dataset, HourlyRecord, InMemorySource, deserialise_hour_utc, deserialise_non_negative,
};
use crate::price_area::PriceArea;
use crate::units::GramsPerKilowattHour;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Conversion factor from methane intensity to CO2-equivalent intensity
pub const CH4_TO_CO2_EQUIV: f64 = 0.025;

/// Emission factors for a price area in one hour
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmissionRecord {
    /// Start of the hour
    #[serde(rename = "HourUTC", deserialize_with = "deserialise_hour_utc")]
    pub hour_utc: DateTime<Utc>,
    /// Price area
    #[serde(rename = "PriceArea")]
    pub price_area: PriceArea,
    /// Direct CO2 emissions in g/kWh
    #[serde(rename = "CO2PerkWh", deserialize_with = "deserialise_non_negative")]
    pub co2_per_kwh: f64,
    /// Methane emissions in g/kWh
    #[serde(rename = "CH4PerkWh", deserialize_with = "deserialise_non_negative")]
    pub ch4_per_kwh: f64,
}

impl EmissionRecord {
    /// The CO2-equivalent intensity, including the contribution of methane
    pub fn co2_equiv(&self) -> GramsPerKilowattHour {
        GramsPerKilowattHour(self.co2_per_kwh + self.ch4_per_kwh * CH4_TO_CO2_EQUIV)
    }
}

impl HourlyRecord for EmissionRecord {
    const DATASET: Dataset = Dataset::DeclarationEmission;

    fn hour_utc(&self) -> DateTime<Utc> {
        self.hour_utc
    }

    fn price_area(&self) -> PriceArea {
        self.price_area
    }

    fn in_memory(source: &InMemorySource) -> &[Self] {
        &source.emissions
    }
}

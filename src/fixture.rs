//! Fixtures for tests

use crate::input::{ConsumptionRecord, EmissionRecord, InMemorySource, ShareRecord};
use crate::price_area::PriceArea;
use crate::production::ProductionGroup;
use chrono::{DateTime, TimeZone, Utc};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// The start of the given hour (UTC)
pub fn hour(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

/// A production share record
pub fn share(
    hour_utc: DateTime<Utc>,
    price_area: PriceArea,
    production_group: ProductionGroup,
    share: f64,
) -> ShareRecord {
    ShareRecord {
        hour_utc,
        price_area,
        production_group,
        share,
    }
}

/// An emission factor record
pub fn emission(
    hour_utc: DateTime<Utc>,
    price_area: PriceArea,
    co2_per_kwh: f64,
    ch4_per_kwh: f64,
) -> EmissionRecord {
    EmissionRecord {
        hour_utc,
        price_area,
        co2_per_kwh,
        ch4_per_kwh,
    }
}

/// A consumption record
pub fn consumption(
    hour_utc: DateTime<Utc>,
    price_area: PriceArea,
    gross_consumption_mwh: f64,
) -> ConsumptionRecord {
    ConsumptionRecord {
        hour_utc,
        price_area,
        gross_consumption_mwh,
    }
}

/// Data for one hour, split between coal, straw and onshore wind
pub fn hour_of_data(
    hour_utc: DateTime<Utc>,
    price_area: PriceArea,
    share_non_ve: f64,
    co2_per_kwh: f64,
    gross_consumption_mwh: f64,
) -> (Vec<ShareRecord>, EmissionRecord, ConsumptionRecord) {
    let shares = vec![
        share(
            hour_utc,
            price_area,
            ProductionGroup::Coal,
            share_non_ve * 0.75,
        ),
        share(
            hour_utc,
            price_area,
            ProductionGroup::Straw,
            share_non_ve * 0.25,
        ),
        share(
            hour_utc,
            price_area,
            ProductionGroup::WindOnshore,
            1.0 - share_non_ve,
        ),
    ];

    (
        shares,
        emission(hour_utc, price_area, co2_per_kwh, 0.0),
        consumption(hour_utc, price_area, gross_consumption_mwh),
    )
}

/// Build a source from per-hour data
pub fn source_from_hours<I>(hours: I) -> InMemorySource
where
    I: IntoIterator<Item = (Vec<ShareRecord>, EmissionRecord, ConsumptionRecord)>,
{
    let mut shares = Vec::new();
    let mut emissions = Vec::new();
    let mut consumption = Vec::new();
    for (s, e, c) in hours {
        shares.extend(s);
        emissions.push(e);
        consumption.push(c);
    }

    InMemorySource::new(shares, emissions, consumption)
}

/// Two hours of DK1 data on 2020-01-01 with a non-renewable share of 0.8
#[fixture]
pub fn two_hour_source() -> InMemorySource {
    source_from_hours([
        hour_of_data(hour(2020, 1, 1, 0), PriceArea::DK1, 0.8, 100.0, 1000.0),
        hour_of_data(hour(2020, 1, 1, 1), PriceArea::DK1, 0.8, 120.0, 1000.0),
    ])
}

/// A day of DK1 data, the third hour of which has no non-renewable production
#[fixture]
pub fn source_with_fully_renewable_hour() -> InMemorySource {
    source_from_hours((0..24).map(|h| {
        let share_non_ve = if h == 2 { 0.0 } else { 0.5 };
        hour_of_data(
            hour(2020, 1, 1, h),
            PriceArea::DK1,
            share_non_ve,
            100.0,
            1000.0,
        )
    }))
}

//! Errors raised by the emission-accounting engine.
use crate::input::Dataset;
use crate::price_area::PriceArea;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// A failure while assessing the CO2 reduction for a request.
///
/// Load-time errors are fatal to the request. [`EmissionError::UndefinedIntensity`] is raised per
/// hour and only reaches the caller as part of an exclusion list.
#[derive(Debug, Error)]
pub enum EmissionError {
    /// A dataset could not be read or parsed
    #[error("Dataset {dataset} is unavailable: {reason}")]
    DataUnavailable {
        /// The dataset which failed to load
        dataset: Dataset,
        /// Description of the underlying failure
        reason: String,
    },

    /// A dataset contains more than one row for the same hour and price area
    #[error("Dataset {dataset} has more than one record for {price_area} at {hour}")]
    DuplicateRecord {
        /// The offending dataset
        dataset: Dataset,
        /// Hour of the duplicated key
        hour: DateTime<Utc>,
        /// Price area of the duplicated key
        price_area: PriceArea,
    },

    /// No records survive the time and price-area filters
    #[error("No usable data in {dataset} for the requested period")]
    EmptyRange {
        /// The dataset (or derived series) which came up empty
        dataset: Dataset,
    },

    /// The renewable-excluded intensity cannot be computed because there was no non-renewable
    /// production in this hour
    #[error("CO2 intensity is undefined for {price_area} at {hour}: no non-renewable production")]
    UndefinedIntensity {
        /// The hour in question
        hour: DateTime<Utc>,
        /// The price area in question
        price_area: PriceArea,
    },

    /// A request parameter is out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl EmissionError {
    /// Whether this error signals an absence of data (as opposed to a fault)
    pub fn is_empty_range(&self) -> bool {
        matches!(self, Self::EmptyRange { .. })
    }
}

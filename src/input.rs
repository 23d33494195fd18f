//! Common routines for loading the hourly input datasets.
//!
//! The three datasets (production shares, emission factors and gross consumption) are flat tables
//! keyed by hour and price area. They are read through a [`DataSource`], which filters the rows
//! by time range and price area.
use crate::error::EmissionError;
use crate::period::within_inclusive;
use crate::price_area::PriceArea;
use anyhow::{Context, Result, ensure};
use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use itertools::Itertools;
use serde::de::{DeserializeOwned, Error};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

mod consumption;
pub use consumption::ConsumptionRecord;
mod emission;
pub use emission::EmissionRecord;
mod share;
pub use share::ShareRecord;
pub mod validate;

/// Formats accepted for naive (implicitly UTC) timestamps
const NAIVE_HOUR_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// The hourly datasets consumed by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// Share of production per production group
    DeclarationCoverage,
    /// Grid-average emission factors
    DeclarationEmission,
    /// Gross electricity consumption
    ProductionConsumption,
}

impl Dataset {
    /// The name of the dataset, as used by the upstream data service
    pub fn name(&self) -> &'static str {
        match self {
            Self::DeclarationCoverage => "declarationcoveragehour",
            Self::DeclarationEmission => "declarationemissionhour",
            Self::ProductionConsumption => "productionconsumptionsettlement",
        }
    }

    /// The name of the CSV file holding this dataset
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.name())
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The key on which the datasets are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HourKey {
    /// Start of the hour
    pub hour_utc: DateTime<Utc>,
    /// Price area
    pub price_area: PriceArea,
}

/// A row of one of the hourly datasets
pub trait HourlyRecord: DeserializeOwned + Clone {
    /// The dataset this record type belongs to
    const DATASET: Dataset;

    /// Start of the hour this record describes
    fn hour_utc(&self) -> DateTime<Utc>;

    /// The price area this record describes
    fn price_area(&self) -> PriceArea;

    /// The records of this type held by an [`InMemorySource`]
    fn in_memory(source: &InMemorySource) -> &[Self];

    /// The join key for this record
    fn key(&self) -> HourKey {
        HourKey {
            hour_utc: self.hour_utc(),
            price_area: self.price_area(),
        }
    }
}

/// Somewhere the hourly datasets can be read from
pub trait DataSource {
    /// Read every record of a dataset, unfiltered
    fn read_all<R: HourlyRecord>(&self) -> Result<Vec<R>, EmissionError>;

    /// Load the records of a dataset for one price area between `start` and `end` (inclusive),
    /// ordered by hour.
    fn load<R: HourlyRecord>(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        price_area: PriceArea,
    ) -> Result<Vec<R>, EmissionError> {
        let records = self
            .read_all::<R>()?
            .into_iter()
            .filter(|record| {
                record.price_area() == price_area
                    && within_inclusive(record.hour_utc(), start, end)
            })
            .sorted_by_key(|record| record.hour_utc())
            .collect_vec();

        Ok(records)
    }
}

/// Load records as for [`DataSource::load`], treating an empty result as an error
pub fn load_non_empty<R, S>(
    source: &S,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    price_area: PriceArea,
) -> Result<Vec<R>, EmissionError>
where
    R: HourlyRecord,
    S: DataSource + ?Sized,
{
    let records = source.load::<R>(start, end, price_area)?;
    if records.is_empty() {
        return Err(EmissionError::EmptyRange {
            dataset: R::DATASET,
        });
    }

    Ok(records)
}

/// Reads the datasets from CSV files in a directory
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    data_dir: PathBuf,
}

impl CsvDataSource {
    /// Create a source for the CSV files in `data_dir`
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Path to the file holding the given dataset
    pub fn file_path(&self, dataset: Dataset) -> PathBuf {
        self.data_dir.join(dataset.file_name())
    }
}

impl DataSource for CsvDataSource {
    fn read_all<R: HourlyRecord>(&self) -> Result<Vec<R>, EmissionError> {
        let file_path = self.file_path(R::DATASET);
        read_csv(&file_path).map_err(|err| EmissionError::DataUnavailable {
            dataset: R::DATASET,
            reason: format!("{err:#}"),
        })
    }
}

/// Holds the datasets in memory.
///
/// The records cannot be changed once the source has been built, so it can be shared freely
/// between readers.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    shares: Vec<ShareRecord>,
    emissions: Vec<EmissionRecord>,
    consumption: Vec<ConsumptionRecord>,
}

impl InMemorySource {
    /// Create a source from the records of each dataset
    pub fn new(
        shares: Vec<ShareRecord>,
        emissions: Vec<EmissionRecord>,
        consumption: Vec<ConsumptionRecord>,
    ) -> Self {
        Self {
            shares,
            emissions,
            consumption,
        }
    }

    /// Read every dataset from `source` into memory
    pub fn from_source<S: DataSource>(source: &S) -> Result<Self, EmissionError> {
        Ok(Self::new(
            source.read_all()?,
            source.read_all()?,
            source.read_all()?,
        ))
    }
}

impl DataSource for InMemorySource {
    fn read_all<R: HourlyRecord>(&self) -> Result<Vec<R>, EmissionError> {
        Ok(R::in_memory(self).to_vec())
    }
}

/// Read a series of type `T`s from a CSV file.
///
/// Leading and trailing whitespace is trimmed from every field.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
///
/// # Returns
///
/// The records, which may be empty if the file only has a header row, or an error if the file
/// could not be read or parsed.
pub fn read_csv<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let records = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(file_path)
        .with_context(|| input_err_msg(file_path))?
        .into_deserialize()
        .process_results(|iter| iter.collect_vec())
        .with_context(|| input_err_msg(file_path))?;

    Ok(records)
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;

    Ok(toml_data)
}

/// Format an error message to include the file path
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Parse the start of an hour.
///
/// Timestamps without an offset are taken to be in UTC. The timestamp must lie exactly on an hour
/// boundary.
pub fn parse_hour_utc(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    let hour = if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        dt.with_timezone(&Utc)
    } else {
        NAIVE_HOUR_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
            .with_context(|| format!("Invalid timestamp: {s}"))?
            .and_utc()
    };

    ensure!(
        hour.minute() == 0 && hour.second() == 0 && hour.nanosecond() == 0,
        "Timestamp {s} does not lie on the hour"
    );

    Ok(hour)
}

/// Deserialise the start of an hour (see [`parse_hour_utc`])
pub fn deserialise_hour_utc<'de, D>(deserialiser: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserialiser)?;
    parse_hour_utc(&s).map_err(|err| D::Error::custom(format!("{err:#}")))
}

/// Deserialise a finite `f64` which is greater than or equal to zero
pub fn deserialise_non_negative<'de, D>(deserialiser: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserialiser)?;
    if !(value.is_finite() && value >= 0.0) {
        return Err(D::Error::custom(format!(
            "Value must be a finite number greater than or equal to zero (got {value})"
        )));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, hour, share};
    use crate::production::ProductionGroup;
    use rstest::rstest;
    use serde::de::IntoDeserializer;
    use serde::de::value::{Error as ValueError, F64Deserializer};
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Record {
        id: String,
        value: u32,
    }

    /// Create an example CSV file in dir_path
    fn create_csv_file(dir_path: &Path, contents: &str) -> PathBuf {
        let file_path = dir_path.join("test.csv");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "{contents}").unwrap();
        file_path
    }

    #[test]
    fn read_csv_works() {
        let dir = tempdir().unwrap();
        let file_path = create_csv_file(dir.path(), "id,value\nhello,1\nworld,2\n");
        let records: Vec<Record> = read_csv(&file_path).unwrap();
        assert_eq!(
            records,
            &[
                Record {
                    id: "hello".to_string(),
                    value: 1,
                },
                Record {
                    id: "world".to_string(),
                    value: 2,
                }
            ]
        );

        // Whitespace should be trimmed
        let file_path = create_csv_file(dir.path(), "id , value\t\n  hello\t ,1\n");
        let records: Vec<Record> = read_csv(&file_path).unwrap();
        assert_eq!(
            records,
            &[Record {
                id: "hello".to_string(),
                value: 1,
            }]
        );

        // Header only: no records
        let file_path = create_csv_file(dir.path(), "id,value");
        assert!(read_csv::<Record>(&file_path).unwrap().is_empty());
    }

    #[test]
    fn read_toml_works() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.toml");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "id = \"hello\"\nvalue = 1").unwrap();
        }

        assert_eq!(
            read_toml::<Record>(&file_path).unwrap(),
            Record {
                id: "hello".to_string(),
                value: 1,
            }
        );
    }

    #[rstest]
    #[case("2020-01-01T05:00:00", hour(2020, 1, 1, 5))]
    #[case("2020-01-01 05:00:00", hour(2020, 1, 1, 5))]
    #[case("2020-01-01T05:00", hour(2020, 1, 1, 5))]
    #[case("2020-01-01T05:00:00Z", hour(2020, 1, 1, 5))]
    #[case("2020-01-01T06:00:00+01:00", hour(2020, 1, 1, 5))]
    #[case("  2020-01-01T05:00:00 ", hour(2020, 1, 1, 5))]
    fn parse_hour_utc_valid(#[case] s: &str, #[case] expected: DateTime<Utc>) {
        assert_eq!(parse_hour_utc(s).unwrap(), expected);
    }

    #[rstest]
    #[case("2020-01-01T05:30:00", "Timestamp 2020-01-01T05:30:00 does not lie on the hour")]
    #[case("01.01.2020 05:00", "Invalid timestamp: 01.01.2020 05:00")]
    #[case("", "Invalid timestamp: ")]
    fn parse_hour_utc_invalid(#[case] s: &str, #[case] msg: &str) {
        assert_error!(parse_hour_utc(s), msg);
    }

    #[rstest]
    #[case(0.0, true)]
    #[case(0.5, true)]
    #[case(1e6, true)]
    #[case(-1e-9, false)]
    #[case(f64::NAN, false)]
    #[case(f64::INFINITY, false)]
    fn deserialise_non_negative_works(#[case] value: f64, #[case] valid: bool) {
        let deserialiser: F64Deserializer<ValueError> = value.into_deserializer();
        assert_eq!(deserialise_non_negative(deserialiser).is_ok(), valid);
    }

    #[test]
    fn in_memory_load_filters_and_sorts() {
        let source = InMemorySource::new(
            vec![
                share(hour(2020, 1, 1, 2), PriceArea::DK1, ProductionGroup::Coal, 1.0),
                share(hour(2020, 1, 1, 0), PriceArea::DK1, ProductionGroup::Coal, 1.0),
                share(hour(2020, 1, 1, 1), PriceArea::DK2, ProductionGroup::Coal, 1.0),
                share(hour(2020, 1, 1, 3), PriceArea::DK1, ProductionGroup::Coal, 1.0),
            ],
            Vec::new(),
            Vec::new(),
        );

        let records: Vec<ShareRecord> = source
            .load(hour(2020, 1, 1, 0), hour(2020, 1, 1, 2), PriceArea::DK1)
            .unwrap();
        let hours = records.iter().map(|r| r.hour_utc()).collect_vec();
        assert_eq!(hours, [hour(2020, 1, 1, 0), hour(2020, 1, 1, 2)]);
    }

    #[test]
    fn load_non_empty_empty_range() {
        let source = InMemorySource::default();
        let result = load_non_empty::<EmissionRecord, _>(
            &source,
            hour(2020, 1, 1, 0),
            hour(2020, 1, 2, 0),
            PriceArea::DK1,
        );
        assert!(matches!(
            result,
            Err(EmissionError::EmptyRange {
                dataset: Dataset::DeclarationEmission
            })
        ));
    }

    #[test]
    fn csv_source_missing_file() {
        let dir = tempdir().unwrap();
        let source = CsvDataSource::new(dir.path());
        let result = source.read_all::<ConsumptionRecord>();
        assert!(matches!(
            result,
            Err(EmissionError::DataUnavailable {
                dataset: Dataset::ProductionConsumption,
                ..
            })
        ));
    }

    #[test]
    fn csv_source_reads_shares() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("declarationcoveragehour.csv"),
            "HourUTC,PriceArea,ProductionGroup,Share\n\
             2020-01-01T00:00:00,DK1,Kul,0.25\n\
             2020-01-01T00:00:00,DK1,Onshore,0.75\n\
             2020-01-01T00:00:00,DK2,Kul,1.0\n",
        )
        .unwrap();

        let source = CsvDataSource::new(dir.path());
        let records: Vec<ShareRecord> = source
            .load(hour(2020, 1, 1, 0), hour(2020, 1, 1, 0), PriceArea::DK1)
            .unwrap();
        assert_eq!(
            records,
            [
                share(hour(2020, 1, 1, 0), PriceArea::DK1, ProductionGroup::Coal, 0.25),
                share(
                    hour(2020, 1, 1, 0),
                    PriceArea::DK1,
                    ProductionGroup::WindOnshore,
                    0.75
                ),
            ]
        );
    }
}

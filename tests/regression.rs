//! Common code for running regression tests.
use float_cmp::approx_eq;
use flexfordel::cli::AssessOpts;
use flexfordel::cli::example::handle_example_run_command;
use flexfordel::settings::Settings;
use itertools::Itertools;
use std::env;
use std::fs::read_dir;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

const FLOAT_CMP_TOLERANCE: f64 = 1e-10;

/// Run a regression test for an example data set
#[allow(dead_code)]
pub fn run_regression_test(example_name: &str) {
    unsafe { env::set_var("FLEXFORDEL_LOG_LEVEL", "off") };

    // Allow user to set output dir for regression tests so they can examine results
    let tmp: TempDir;
    let output_dir = if let Ok(dir) = env::var("FLEXFORDEL_TEST_OUTPUT_DIR") {
        [&dir, example_name].iter().collect()
    } else {
        tmp = tempdir().unwrap();
        tmp.path().to_path_buf()
    };

    let opts = AssessOpts {
        output_dir: Some(output_dir.clone()),
        ..AssessOpts::default()
    };
    handle_example_run_command(example_name, &opts, Some(Settings::default())).unwrap();

    let expected_dir = PathBuf::from(format!("tests/data/{example_name}"));
    let file_names = csv_file_names(&expected_dir);
    assert_eq!(csv_file_names(&output_dir), file_names);

    let errors = file_names
        .iter()
        .flat_map(|name| compare_tables(name, &output_dir.join(name), &expected_dir.join(name)))
        .collect_vec();
    assert!(
        errors.is_empty(),
        "Results differ from {}:\n  * {}",
        expected_dir.display(),
        errors.join("\n  * ")
    );
}

/// Names of the CSV files in `dir`, sorted
fn csv_file_names(dir: &Path) -> Vec<String> {
    read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .filter(|name| name.ends_with(".csv"))
        .sorted()
        .collect()
}

/// Read a CSV file as its header followed by its rows
fn read_table(path: &Path) -> Vec<csv::StringRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader.records().map(Result::unwrap).collect()
}

/// Describe every difference between two CSV files
fn compare_tables(name: &str, actual: &Path, expected: &Path) -> Vec<String> {
    let actual = read_table(actual);
    let expected = read_table(expected);

    let mut errors = Vec::new();
    if actual.len() != expected.len() {
        errors.push(format!(
            "{name}: {} rows, expected {}",
            actual.len(),
            expected.len()
        ));
    }

    for (row, (got, want)) in actual.iter().zip(&expected).enumerate() {
        let same = got.len() == want.len()
            && got
                .iter()
                .zip(want.iter())
                .all(|(a, b)| fields_match(a, b));
        if !same {
            errors.push(format!(
                "{name}: row {row}:\n    + {:?}\n    - {:?}",
                got.iter().join(","),
                want.iter().join(",")
            ));
        }
    }

    errors
}

/// Compare fields numerically where both are finite numbers, otherwise as text
fn fields_match(actual: &str, expected: &str) -> bool {
    let as_number = |s: &str| s.parse::<f64>().ok().filter(|x| x.is_finite());
    match (as_number(actual), as_number(expected)) {
        (Some(a), Some(b)) => approx_eq!(f64, a, b, epsilon = FLOAT_CMP_TOLERANCE, ulps = 16),
        _ => actual == expected,
    }
}

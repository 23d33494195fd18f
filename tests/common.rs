use assert_cmd::cargo_bin_cmd;

/// Run flexfordel with the given arguments and check that it succeeds
#[allow(dead_code)]
pub fn assert_flexfordel_runs(args: &[&str]) {
    cargo_bin_cmd!("flexfordel")
        .env("FLEXFORDEL_USE_DEFAULT_SETTINGS", "1")
        .args(args)
        .assert()
        .success();
}

/// Run flexfordel with the given arguments and check that it fails
#[allow(dead_code)]
pub fn assert_flexfordel_fails(args: &[&str]) {
    cargo_bin_cmd!("flexfordel")
        .env("FLEXFORDEL_USE_DEFAULT_SETTINGS", "1")
        .args(args)
        .assert()
        .failure();
}

/// Run flexfordel with the given arguments and return what it printed to stdout
#[allow(dead_code)]
pub fn get_flexfordel_stdout(args: &[&str]) -> String {
    let output = cargo_bin_cmd!("flexfordel")
        .env("FLEXFORDEL_USE_DEFAULT_SETTINGS", "1")
        .env("FLEXFORDEL_LOG_LEVEL", "off")
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    String::from_utf8(output).unwrap()
}

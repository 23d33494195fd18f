//! A regression test for the "simple" example.
mod regression;
use regression::run_regression_test;

#[test]
fn regression_simple() {
    run_regression_test("simple");
}

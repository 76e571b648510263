//! The crate-level reporting functions against the real standard streams.
//!
//! Each test re-runs this test binary with `SCENARIO_VAR` set, so that only
//! `child_scenario` does anything, and inspects the child's stdout and stderr.

use std::fmt;
use std::process::{Command, Output};
use testmatrix::{BuildParameters, Reporter, UNKNOWN_FAILURE};

const SCENARIO_VAR: &str = "TESTMATRIX_STDIO_SCENARIO";

struct PanickyDisplay;

impl fmt::Display for PanickyDisplay {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        panic!("display exploded")
    }
}

fn params() -> BuildParameters {
    testmatrix::build_parameters!("TESTMATRIX_SELFTEST")
}

#[test]
fn child_scenario() {
    let Ok(scenario) = std::env::var(SCENARIO_VAR) else {
        return;
    };

    let code = match scenario.as_str() {
        "parameters" => {
            testmatrix::report_executable_parameters(&params());
            0
        }
        "parameters-macro" => {
            testmatrix::report_executable_parameters!("TESTMATRIX_SELFTEST");
            0
        }
        "success" => {
            testmatrix::report_success();
            0
        }
        "error" => {
            testmatrix::report_error("disk full");
            0
        }
        "undescribed-error" => {
            testmatrix::report_error(&PanickyDisplay);
            0
        }
        "panicking-run" => {
            let outcome = Reporter::stdio().run(&params(), || -> Result<(), String> {
                panic!("index out of range")
            });
            if outcome.is_success() {
                0
            } else {
                1
            }
        }
        other => panic!("unknown scenario {other}"),
    };
    std::process::exit(code);
}

fn run_scenario(scenario: &str) -> Output {
    let exe = std::env::current_exe().expect("test binary path");
    Command::new(exe)
        .args(["--exact", "child_scenario", "--nocapture", "--test-threads=1"])
        .env(SCENARIO_VAR, scenario)
        .env("RUST_BACKTRACE", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to re-run test binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

const SELFTEST_BLOCK: &str = "[mytest]\n__CXXPARAMS__: -O2 -std=c++20\n__LDPARAMS__: -lpthread\n";

#[test]
fn test_report_executable_parameters_on_stdout() {
    let output = run_scenario("parameters");

    assert!(output.status.success());
    assert!(stdout(&output).ends_with(SELFTEST_BLOCK));
    assert_eq!(stderr(&output), "");
}

#[test]
fn test_report_executable_parameters_macro_on_stdout() {
    let output = run_scenario("parameters-macro");

    assert!(output.status.success());
    assert!(stdout(&output).ends_with(SELFTEST_BLOCK));
    assert_eq!(stderr(&output), "");
}

#[test]
fn test_report_success_writes_nothing() {
    let output = run_scenario("success");

    assert!(output.status.success());
    assert!(!stdout(&output).contains("__CXXPARAMS__"));
    assert_eq!(stderr(&output), "");
}

#[test]
fn test_report_error_writes_one_line_to_stderr() {
    let output = run_scenario("error");

    assert!(output.status.success());
    assert_eq!(stderr(&output), "disk full\n");
}

#[test]
fn test_undescribed_error_writes_only_the_fallback() {
    let output = run_scenario("undescribed-error");

    assert!(output.status.success());
    assert_eq!(stderr(&output), format!("{UNKNOWN_FAILURE}\n"));
}

#[test]
fn test_panicking_run_writes_only_the_panic_message() {
    let output = run_scenario("panicking-run");

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).ends_with(SELFTEST_BLOCK));
    assert_eq!(stderr(&output), "index out of range\n");
}

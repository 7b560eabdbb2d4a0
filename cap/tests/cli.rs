//! End-to-end runs of the `test-cap` binary. Built only with the
//! `logging` feature: `cargo test -p cap --features logging`.

use test_driver::{SessionOutput, TestSession};

const HINT: &str = "Hint: Use '--help' for help menu\n";

fn run(args: &[&str], expected_code: i32) -> SessionOutput {
    run_with_env(args, &[], expected_code)
}

fn run_with_env(args: &[&str], env: &[(&str, &str)], expected_code: i32) -> SessionOutput {
    let session = TestSession::spawn(env!("CARGO_BIN_EXE_test-cap"), args, env)
        .expect("failed to spawn test-cap");
    session.wait_exit(expected_code)
}

fn assert_line(out: &SessionOutput, line: &str) {
    assert!(
        out.stdout_lines().contains(&line),
        "missing line {line:?} in stdout:\n{}",
        out.stdout
    );
}

#[test]
fn defaults_fill_unset_options() {
    let out = run(&["mon"], 0);
    assert_eq!(
        out.stdout_lines(),
        [
            "program=test-cap",
            "verbose=false",
            "run=false",
            "color=true",
            "jobs=1",
            "ratio=0.5",
            "output=none",
            "part=both",
            "day=mon",
            "input=[]",
            "remainder=none",
        ]
    );
    assert_eq!(out.stderr, "");
}

#[test]
fn short_option_with_separate_value() {
    let out = run(&["-j", "4", "mon"], 0);
    assert_line(&out, "jobs=4");
    assert_line(&out, "day=mon");
}

#[test]
fn long_option_forms() {
    let out = run(&["--output=answers.txt", "--jobs", "8", "tue"], 0);
    assert_line(&out, "output=answers.txt");
    assert_line(&out, "jobs=8");

    let out = run(&["wed", "-x", ".25"], 0);
    assert_line(&out, "ratio=0.25");
}

#[test]
fn flag_clusters() {
    let out = run(&["-vr", "mon"], 0);
    assert_line(&out, "verbose=true");
    assert_line(&out, "run=true");

    let out = run(&["-vnj3", "mon"], 0);
    assert_line(&out, "verbose=true");
    assert_line(&out, "color=false");
    assert_line(&out, "jobs=3");
}

#[test]
fn enum_option_is_case_insensitive() {
    let out = run(&["--part", "TWO", "mon"], 0);
    assert_line(&out, "part=two");
}

#[test]
fn variadic_and_remainder() {
    let out = run(&["mon", "a.txt", "b.txt", "--", "-weird", "arg"], 0);
    assert_line(&out, "input=[\"a.txt\", \"b.txt\"]");
    assert_line(&out, "remainder=[\"-weird\", \"arg\"]");
}

#[test]
fn help_goes_to_stdout() {
    let out = run(&["--help"], 0);
    assert!(out
        .stdout
        .starts_with("test-cap - Run an Advent of Code day against its input files.\n\nUsage: test-cap"));
    assert!(out.stdout.contains("\nPositionals:\n"));
    assert!(out.stdout.contains("\nOptions:\n"));
    assert!(out.stdout.contains("  -V, --version"));
    assert!(out
        .stdout
        .contains("  * Arguments following `--`: forwarded to the solver.\n"));
    assert_eq!(out.stderr, "");
}

#[test]
fn help_wins_over_bad_arguments() {
    let out = run(&["--bogus", "--help"], 0);
    assert!(out.stdout.contains("Usage: test-cap"));
    assert_eq!(out.stderr, "");
}

#[test]
fn version_flag() {
    let out = run(&["mon", "-V"], 0);
    assert_eq!(out.stdout, "test-cap 1.0.0\n");
}

#[test]
fn unknown_option_suggests_and_fails() {
    let out = run(&["--jbos", "4", "mon"], 1);
    assert_eq!(out.stdout, "");
    assert!(out
        .stderr
        .starts_with("Error: Unrecognized option '--jbos'. Did you mean '--jobs'?\nUsage: test-cap"));
    assert!(out.stderr.ends_with(HINT));
}

#[test]
fn enum_typo_suggests_entry() {
    let out = run(&["--part=tow", "mon"], 1);
    assert!(out.stderr.starts_with(
        "Error: Option '--part' expects one of 'one|two|both' but got 'tow'. Did you mean 'two'?\n"
    ));
}

#[test]
fn positional_count_errors() {
    let out = run(&["-j", "2"], 1);
    assert!(out
        .stderr
        .starts_with("Error: Expected at least 1 positional argument, got 0.\n"));
    assert!(out.stderr.ends_with(HINT));

    let out = run(&["mon", "a", "b", "c", "d"], 1);
    assert!(out.stderr.starts_with(
        "Error: Expected at most 4 positional arguments, argument 'd' surpassed this.\n"
    ));
}

#[test]
fn missing_and_invalid_values() {
    let out = run(&["mon", "-o"], 1);
    assert!(out
        .stderr
        .starts_with("Error: Expected value following option '-o'.\n"));

    let out = run(&["mon", "--jobs=many"], 1);
    assert!(out
        .stderr
        .starts_with("Error: Option '--jobs' expected an integer, but got 'many'.\n"));
}

#[test]
fn debug_logging_goes_to_stderr() {
    let out = run_with_env(&["mon"], &[("RUST_LOG", "cap=debug")], 0);
    assert!(out.stderr.contains("parse succeeded"), "stderr:\n{}", out.stderr);
    assert_line(&out, "day=mon");
}

//! Command line parsing tests.

use crate::{parse_args, Args};

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn no_arguments_runs_production_mode() {
    let parsed = parse_args(args(&[])).unwrap();
    assert_eq!(parsed, Args::default());
}

#[test]
fn simulate_and_config_are_parsed() {
    let parsed = parse_args(args(&["--config", "/etc/rain.toml", "--simulate"])).unwrap();
    assert!(parsed.simulate);
    assert_eq!(parsed.config_path.as_deref(), Some("/etc/rain.toml"));
}

#[test]
fn config_without_path_is_rejected() {
    let err = parse_args(args(&["--config"])).unwrap_err();
    assert!(err.to_string().contains("needs a path"));
}

#[test]
fn unknown_flag_is_rejected() {
    assert!(parse_args(args(&["--stdout"])).is_err());
}

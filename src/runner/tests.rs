//! Tests for journey selection and naming.

use super::*;
use clap::ValueEnum;
use rstest::rstest;

#[rstest]
fn journey_names_match_command_line_values() {
    for journey in Journey::ALL {
        let value = journey
            .to_possible_value()
            .expect("every journey is selectable");
        assert_eq!(value.get_name(), journey.name());
        assert_eq!(journey.to_string(), journey.name());
    }
}

#[rstest]
#[case("order-lifecycle", Journey::OrderLifecycle)]
#[case("known-pet", Journey::KnownPet)]
fn journeys_parse_from_kebab_case(#[case] raw: &str, #[case] expected: Journey) {
    assert_eq!(Journey::from_str(raw, false), Ok(expected));
}

#[rstest]
fn reporter_without_log_only_traces() {
    let reporter = reporter_for(&HarnessConfig::default()).expect("no log to open");
    reporter.record("Runner", "tracing only");
}

#[rstest]
fn unopenable_evidence_log_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = camino::Utf8PathBuf::from_path_buf(dir.path().join("missing/evidence.jsonl"))
        .expect("utf-8 temp path");
    let config = HarnessConfig::default().with_evidence_log(path);
    let err = reporter_for(&config).err().expect("parent directory is absent");
    assert!(err.to_string().starts_with("open evidence log"));
}

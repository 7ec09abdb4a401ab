use pretty_assertions::assert_eq;
use topo_store::{StoreConfig, View};
use topo_test_utils::{TeamFileBuilder, TempCorpus};
use topo_validate::{validate_all, validate_config_files};

fn config(corpus: &TempCorpus) -> StoreConfig {
    StoreConfig::new().with_data_root(corpus.root())
}

const PRODUCTS: &str = r##"{
  "products": [
    {"id": "dispatchhub", "name": "DispatchHub", "description": "Dispatch", "color": "#3498db"}
  ]
}"##;

const STREAMS: &str = r##"{
  "business_streams": [
    {"id": "b2b", "name": "B2B Fleet", "description": "Fleets", "products": ["DispatchHub"], "color": "#2ecc71"}
  ]
}"##;

const BASELINE_TYPES: &str = r##"{
  "team_types": [
    {"id": "feature-team", "name": "Feature Team", "description": "Builds features", "color": "#e74c3c"}
  ]
}"##;

#[test]
fn test_tt_sweep_buckets_and_messages() {
    let corpus = TempCorpus::new();
    corpus.add_team(
        "tt-teams",
        &TeamFileBuilder::new("Platform A")
            .team_type("platform")
            .position(10.0, 20.0)
            .dependencies(&["Squad B"]),
    );
    corpus.add_team(
        "tt-teams",
        &TeamFileBuilder::new("Squad B")
            .team_type("stream-aligned")
            .dependencies(&["Ghost Team"]),
    );
    corpus.add_team("tt-teams", &TeamFileBuilder::new("Odd Team").team_type("squad"));
    corpus.write("tt-teams/README.md", "# not checked\n");
    corpus.write("tt-teams/example-undefined-team.md", "# not checked either\n");

    let report = validate_all(&config(&corpus), View::Tt).unwrap();

    assert_eq!(report.view, View::Tt);
    assert_eq!(report.total_files, 3);
    assert_eq!(report.valid_files, 1);
    assert_eq!(report.files_with_warnings, 1);
    assert_eq!(report.files_with_errors, 1);
    assert!(report.has_errors());

    let squad = report.issues_for("squad-b.md").unwrap();
    assert!(squad.errors.is_empty());
    assert_eq!(
        squad.warnings,
        vec!["Dependency 'Ghost Team' not found - team does not exist"]
    );

    let odd = report.issues_for("odd-team.md").unwrap();
    assert_eq!(odd.errors.len(), 1);
    assert!(odd.errors[0].starts_with("Invalid team_type: 'squad' (valid: "));
}

#[test]
fn test_structural_problems_are_per_file() {
    let corpus = TempCorpus::new();
    corpus.add_team("tt-teams", &TeamFileBuilder::new("Good Team").team_type("enabling"));
    corpus.write("tt-teams/no-front-matter.md", "# Just markdown\n");
    corpus.write("tt-teams/unclosed.md", "---\nname: Unclosed\n");
    std::fs::write(corpus.root().join("tt-teams/binary.md"), [0xff, 0xfe, 0x00]).unwrap();

    let report = validate_all(&config(&corpus), View::Tt).unwrap();
    assert_eq!(report.total_files, 4);
    assert_eq!(report.files_with_errors, 3);

    assert_eq!(
        report.issues_for("no-front-matter.md").unwrap().errors,
        vec!["Missing YAML front matter (must start with '---')"]
    );
    assert_eq!(
        report.issues_for("unclosed.md").unwrap().errors,
        vec!["Malformed YAML front matter (missing closing '---')"]
    );
    assert!(report.issues_for("binary.md").unwrap().errors[0].starts_with("File reading error: "));
}

#[test]
fn test_nested_files_reported_with_relative_path() {
    let corpus = TempCorpus::new();
    corpus.add_team("tt-teams/core", &TeamFileBuilder::new("Core Team").team_type("nope"));

    let report = validate_all(&config(&corpus), View::Tt).unwrap();
    assert_eq!(report.issues[0].file, "core/core-team.md");
}

#[test]
fn test_fractal_grouping_errors_only_in_tt() {
    let team = TeamFileBuilder::new("Inner Team")
        .team_type("platform")
        .field("value_stream_inner", "Checkout");

    let corpus = TempCorpus::new();
    corpus.add_team("tt-teams", &team);
    corpus.add_team("baseline-teams", &team);

    let tt = validate_all(&config(&corpus), View::Tt).unwrap();
    assert_eq!(
        tt.issues_for("inner-team.md").unwrap().errors,
        vec!["value_stream_inner requires either value_stream or platform_grouping to be set"]
    );

    let baseline = validate_all(&config(&corpus), View::Baseline).unwrap();
    assert_eq!(baseline.valid_files, 1);
}

#[test]
fn test_baseline_vocabulary_from_config_files() {
    let corpus = TempCorpus::new();
    corpus.write("baseline-teams/baseline-team-types.json", BASELINE_TYPES);
    corpus.write("baseline-teams/products.json", PRODUCTS);
    corpus.write("baseline-teams/business-streams.json", STREAMS);

    corpus.add_team(
        "baseline-teams",
        &TeamFileBuilder::new("Fleet Team")
            .team_type("feature-team")
            .field("product_line", "dispatchhub")
            .field("business_stream", "B2B Fleet"),
    );
    corpus.add_team(
        "baseline-teams",
        &TeamFileBuilder::new("Engineering").team_type("department"),
    );
    corpus.add_team(
        "baseline-teams",
        &TeamFileBuilder::new("Lost Team")
            .team_type("feature-team")
            .field("product_line", "RouteOptix"),
    );

    let report = validate_all(&config(&corpus), View::Baseline).unwrap();
    assert_eq!(report.valid_files, 2);
    assert_eq!(report.files_with_warnings, 1);

    let lost = report.issues_for("lost-team.md").unwrap();
    assert_eq!(
        lost.warnings,
        vec!["Product line 'RouteOptix' not found in products.json. Valid options: dispatchhub, DispatchHub"]
    );
}

#[test]
fn test_invalid_vocabulary_json_is_an_error() {
    let corpus = TempCorpus::new();
    corpus.write("baseline-teams/products.json", "{ not json");
    assert!(validate_all(&config(&corpus), View::Baseline).is_err());
}

#[test]
fn test_config_file_checks() {
    let corpus = TempCorpus::new();
    corpus.write("baseline-teams/baseline-team-types.json", BASELINE_TYPES);
    corpus.write(
        "baseline-teams/products.json",
        r#"{"products": [{"id": "", "name": "P", "description": "d", "color": "blue"}]}"#,
    );
    corpus.write(
        "baseline-teams/organization-hierarchy.json",
        r#"{"company": {"id": "acme", "name": "Acme", "children": [{"id": "eng", "name": "", "level": -1}]}}"#,
    );

    let report = validate_config_files(&config(&corpus), View::Baseline);
    assert_eq!(report.view, View::Baseline);
    assert_eq!(report.config_files.len(), 4);
    assert_eq!(report.total_errors, 3);
    assert!(report.has_errors());

    assert!(report.config_files["baseline-team-types.json"].valid);
    assert_eq!(
        report.config_files["products.json"].errors,
        vec![
            "products → 0 → id: must be 1-50 characters",
            "products → 0 → color: 'blue' is not a hex color like #3498db",
        ]
    );
    assert!(report.config_files["business-streams.json"].errors[0].starts_with("File not found: "));
    assert_eq!(
        report.config_files["organization-hierarchy.json"].errors,
        vec![
            "company → children → 0 → name: must be at least 1 character",
            "company → children → 0 → level: must be >= 0",
        ]
    );

    corpus.write(
        "baseline-teams/organization-hierarchy.json",
        r#"{"company": {"id": "acme", "name": "Acme"}}"#,
    );
    let report = validate_config_files(&config(&corpus), View::Baseline);
    assert!(report.config_files["organization-hierarchy.json"].valid);
    assert_eq!(report.total_errors, 2);

    let tt = validate_config_files(&config(&corpus), View::Tt);
    assert_eq!(tt.config_files.len(), 1);
    assert!(tt.config_files.contains_key("tt-team-types.json"));
}

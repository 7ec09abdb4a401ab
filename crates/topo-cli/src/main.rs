//! `teamtopo` command line

mod logging;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::process::ExitCode;
use topo_model::{Position, TeamRecord};
use topo_store::{StoreConfig, TeamStore, View};
use topo_validate::{validate_all, validate_config_files};
use tracing::debug;

fn cli() -> Command {
    let json = || {
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Output as JSON")
    };
    let identifier = || {
        Arg::new("identifier")
            .required(true)
            .help("team_id, display name or name slug")
    };

    Command::new("teamtopo")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect, validate and edit team topology files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Data root holding one directory per view [env: TEAMTOPO_DATA_DIR]"),
        )
        .arg(
            Arg::new("view")
                .long("view")
                .global(true)
                .default_value("tt")
                .value_parser(|s: &str| s.parse::<View>())
                .help("Which corpus to operate on: tt or baseline"),
        )
        .arg(
            Arg::new("variant")
                .long("variant")
                .global(true)
                .help("Directory name of the tt view [env: TT_DESIGN_VARIANT]"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(
            Command::new("list")
                .about("List the teams of a view")
                .arg(json()),
        )
        .subcommand(
            Command::new("show")
                .about("Show one team")
                .arg(identifier())
                .arg(json()),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate every team file of a view")
                .arg(json()),
        )
        .subcommand(Command::new("duplicates").about("Report team_ids used by more than one file"))
        .subcommand(
            Command::new("move")
                .about("Set the canvas position of a team")
                .arg(identifier())
                .arg(
                    Arg::new("x")
                        .long("x")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new("y")
                        .long("y")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64)),
                ),
        )
        .subcommand(
            Command::new("check-config")
                .about("Validate the JSON config files of a view")
                .arg(json()),
        )
}

/// Environment first, then explicit flags
fn store_config(matches: &ArgMatches) -> StoreConfig {
    let mut config = StoreConfig::from_env();
    if let Some(root) = matches.get_one::<PathBuf>("data-dir") {
        config = config.with_data_root(root);
    }
    if let Some(variant) = matches.get_one::<String>("variant") {
        config = config.with_tt_variant(variant);
    }
    config
}

fn main() -> Result<ExitCode> {
    let matches = cli().get_matches();
    logging::init(matches.get_flag("log-json"));

    let config = store_config(&matches);
    let view = matches.get_one::<View>("view").copied().unwrap_or_default();
    debug!(data_root = %config.data_root.display(), %view, "resolved configuration");

    let success = match matches.subcommand() {
        Some(("list", args)) => list(config, view, args.get_flag("json")),
        Some(("show", args)) => {
            let identifier = required_str(args, "identifier")?;
            show(config, view, identifier, args.get_flag("json"))
        }
        Some(("validate", args)) => validate(&config, view, args.get_flag("json")),
        Some(("duplicates", _)) => duplicates(config, view),
        Some(("move", args)) => {
            let identifier = required_str(args, "identifier")?;
            let x = *args.get_one::<f64>("x").context("missing --x")?;
            let y = *args.get_one::<f64>("y").context("missing --y")?;
            move_team(config, view, identifier, Position::new(x, y))
        }
        Some(("check-config", args)) => check_config(&config, view, args.get_flag("json")),
        _ => Ok(true),
    }?;

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn required_str<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing <{name}>"))
}

fn list(config: StoreConfig, view: View, json: bool) -> Result<bool> {
    let teams = TeamStore::new(config, view).load_all();
    if json {
        println!("{}", serde_json::to_string_pretty(&teams)?);
    } else {
        for team in &teams {
            println!("{:<40} {:<32} {}", team.team_id.as_str(), team.name, team.team_type);
        }
    }
    Ok(true)
}

fn show(config: StoreConfig, view: View, identifier: &str, json: bool) -> Result<bool> {
    let index = TeamStore::new(config, view).index();
    let team = index
        .find_by_id(identifier)
        .or_else(|| index.find_by_name_or_slug(identifier))
        .with_context(|| format!("no team matches '{identifier}' in the {view} view"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&team.record)?);
    } else {
        println!("# {}", team.path.display());
        print_record(&team.record);
    }
    Ok(true)
}

fn print_record(team: &TeamRecord) {
    println!("team_id:   {}", team.team_id);
    println!("name:      {}", team.name);
    println!("team_type: {}", team.team_type);
    println!("position:  ({}, {})", team.position.x, team.position.y);
    if let Some(purpose) = &team.purpose {
        println!("purpose:   {purpose}");
    }
    if let Some(size) = team.size {
        println!("size:      {size}");
    }
    if !team.dependency_list().is_empty() {
        println!("dependencies:");
        for dep in team.dependency_list() {
            println!("  - {dep}");
        }
    }
    if !team.interaction_modes.is_empty() {
        println!("interaction modes:");
        for (other, mode) in &team.interaction_modes {
            println!("  - {other}: {mode}");
        }
    }
}

fn validate(config: &StoreConfig, view: View, json: bool) -> Result<bool> {
    let report = validate_all(config, view)
        .with_context(|| format!("failed to load the {view} view configuration"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(!report.has_errors())
}

fn duplicates(config: StoreConfig, view: View) -> Result<bool> {
    let duplicates = TeamStore::new(config, view).find_duplicate_ids();
    if duplicates.is_empty() {
        println!("No duplicate team_ids in the {view} view");
        return Ok(true);
    }

    for (team_id, paths) in &duplicates {
        println!("{team_id}");
        for path in paths {
            println!("  {}", path.display());
        }
    }
    Ok(false)
}

fn move_team(config: StoreConfig, view: View, identifier: &str, position: Position) -> Result<bool> {
    let moved = TeamStore::new(config, view)
        .update_position(identifier, position)
        .with_context(|| format!("failed to move '{identifier}'"))?;
    println!(
        "Moved {} to ({}, {}) in {}",
        moved.record.name,
        position.x,
        position.y,
        moved.path.display()
    );
    Ok(true)
}

fn check_config(config: &StoreConfig, view: View, json: bool) -> Result<bool> {
    let report = validate_config_files(config, view);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for (file, result) in &report.config_files {
            let status = if result.valid { "ok" } else { "invalid" };
            println!("{file}: {status}");
            for error in &result.errors {
                println!("  {error}");
            }
        }
    }
    Ok(!report.has_errors())
}

#[cfg(test)]
mod tests {
    use super::*;
    use topo_test_utils::{TeamFileBuilder, TempCorpus};

    #[test]
    fn command_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn global_flags_override_configuration() {
        let matches = cli()
            .try_get_matches_from([
                "teamtopo", "list", "--data-dir", "/srv/topo", "--variant", "tt-teams-initial",
                "--view", "current",
            ])
            .unwrap();
        let config = store_config(&matches);
        assert_eq!(config.data_root, PathBuf::from("/srv/topo"));
        assert_eq!(config.tt_variant, "tt-teams-initial");
        assert_eq!(matches.get_one::<View>("view"), Some(&View::Baseline));
    }

    #[test]
    fn rejects_unknown_view() {
        assert!(cli()
            .try_get_matches_from(["teamtopo", "list", "--view", "future"])
            .is_err());
    }

    #[test]
    fn move_accepts_negative_coordinates() {
        let matches = cli()
            .try_get_matches_from(["teamtopo", "move", "platform-a", "--x", "-10", "--y", "2.5"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(args.get_one::<f64>("x"), Some(&-10.0));
        assert_eq!(args.get_one::<f64>("y"), Some(&2.5));
    }

    #[test]
    fn move_patches_the_team_file() {
        let corpus = TempCorpus::new();
        let path = corpus.add_team(
            "tt-teams",
            &TeamFileBuilder::new("Platform A").team_type("platform").position(1.0, 2.0),
        );
        let config = StoreConfig::new().with_data_root(corpus.root());

        assert!(move_team(config, View::Tt, "Platform A", Position::new(30.0, 40.0)).unwrap());

        let record = topo_parse::parse_file(&path).unwrap();
        assert_eq!(record.position, Position::new(30.0, 40.0));
    }

    #[test]
    fn duplicates_fail_the_exit_code() {
        let corpus = TempCorpus::new();
        corpus.add_team("tt-teams", &TeamFileBuilder::new("Alpha Team"));
        corpus.write(
            "tt-teams/copy.md",
            &TeamFileBuilder::new("Alpha Team").build(),
        );
        let config = StoreConfig::new().with_data_root(corpus.root());
        assert!(!duplicates(config, View::Tt).unwrap());
    }
}

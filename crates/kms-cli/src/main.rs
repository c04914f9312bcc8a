mod simulate;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use kms_governance::{
    allowed_transitions, can_edit, can_read, GovernanceConfig, LifecycleState, ReviewCycle,
    ReviewStatus, Role, Sensitivity, Timestamp,
};
use serde_json::json;
use simulate::{run_simulator, SimulatorConfig};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("kms")
        .version(kms_governance::VERSION)
        .about("Knowledge base content governance")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to a governance TOML file"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Output as JSON"),
        )
        .subcommand(
            Command::new("can-read")
                .about("Check read access for a role")
                .arg(Arg::new("role").long("role").required(true).help("Acting role"))
                .arg(
                    Arg::new("sensitivity")
                        .long("sensitivity")
                        .required(true)
                        .help("Content sensitivity"),
                )
                .arg(
                    Arg::new("owner")
                        .long("owner")
                        .action(ArgAction::SetTrue)
                        .help("Caller owns the content"),
                ),
        )
        .subcommand(
            Command::new("can-edit")
                .about("Check edit access for a role")
                .arg(Arg::new("role").long("role").required(true).help("Acting role"))
                .arg(
                    Arg::new("owner")
                        .long("owner")
                        .action(ArgAction::SetTrue)
                        .help("Caller owns the content"),
                )
                .arg(
                    Arg::new("author")
                        .long("author")
                        .action(ArgAction::SetTrue)
                        .help("Caller authored the content"),
                ),
        )
        .subcommand(
            Command::new("review")
                .about("Compute the next review date and urgency")
                .arg(
                    Arg::new("created")
                        .long("created")
                        .required(true)
                        .help("Creation date (YYYY-MM-DD or RFC 3339)"),
                )
                .arg(
                    Arg::new("last-reviewed")
                        .long("last-reviewed")
                        .help("Last review date"),
                )
                .arg(
                    Arg::new("cycle")
                        .long("cycle")
                        .value_parser(value_parser!(u32))
                        .help("Review cycle in months (default from config)"),
                )
                .arg(Arg::new("now").long("now").help("Evaluation time (default: now)"))
                .arg(
                    Arg::new("threshold")
                        .long("threshold")
                        .value_parser(value_parser!(u32))
                        .help("Due-soon window in days (default from config)"),
                ),
        )
        .subcommand(
            Command::new("transitions")
                .about("List states reachable from a state")
                .arg(Arg::new("state").long("state").required(true).help("Current state")),
        )
        .subcommand(
            Command::new("simulate")
                .about("Run concurrent random transitions and verify consistency")
                .arg(
                    Arg::new("items")
                        .long("items")
                        .default_value("16")
                        .value_parser(value_parser!(usize))
                        .help("Number of content items"),
                )
                .arg(
                    Arg::new("workers")
                        .long("workers")
                        .default_value("4")
                        .value_parser(value_parser!(usize))
                        .help("Concurrent worker threads"),
                )
                .arg(
                    Arg::new("operations")
                        .long("ops")
                        .default_value("1000")
                        .value_parser(value_parser!(usize))
                        .help("Transition attempts per worker"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .default_value("42")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for reproducibility"),
                ),
        )
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let config = match matches.get_one::<String>("config") {
        Some(path) => GovernanceConfig::from_path(path)
            .with_context(|| format!("loading configuration from {path}"))?,
        None => GovernanceConfig::default(),
    };
    let json = matches.get_flag("json");

    match matches.subcommand() {
        Some(("can-read", args)) => {
            let role: Role = required(args, "role")?.parse()?;
            let sensitivity: Sensitivity = required(args, "sensitivity")?.parse()?;
            let is_owner = args.get_flag("owner");
            let granted = can_read(role, sensitivity, is_owner);
            if json {
                println!(
                    "{}",
                    json!({ "role": role, "sensitivity": sensitivity, "is_owner": is_owner, "granted": granted })
                );
            } else {
                println!("{}", verdict(granted));
            }
        }
        Some(("can-edit", args)) => {
            let role: Role = required(args, "role")?.parse()?;
            let is_owner = args.get_flag("owner");
            let is_author = args.get_flag("author");
            let granted = can_edit(role, is_owner, is_author);
            if json {
                println!(
                    "{}",
                    json!({ "role": role, "is_owner": is_owner, "is_author": is_author, "granted": granted })
                );
            } else {
                println!("{}", verdict(granted));
            }
        }
        Some(("review", args)) => {
            let created = parse_timestamp(required(args, "created")?)?;
            let last_reviewed = args
                .get_one::<String>("last-reviewed")
                .map(|s| parse_timestamp(s))
                .transpose()?;
            let cycle = match args.get_one::<u32>("cycle") {
                Some(months) => ReviewCycle::new(*months)?,
                None => config.default_review_cycle()?,
            };
            let now = match args.get_one::<String>("now") {
                Some(s) => parse_timestamp(s)?,
                None => Utc::now(),
            };
            let threshold = args
                .get_one::<u32>("threshold")
                .copied()
                .unwrap_or(config.due_soon_threshold_days);

            let next = kms_governance::next_review_date(last_reviewed, created, cycle);
            let status = ReviewStatus::classify(next, now, threshold);
            if json {
                println!(
                    "{}",
                    json!({ "next_review_date": next, "status": status, "cycle_months": cycle.months() })
                );
            } else {
                println!("Next review: {}", next.format("%Y-%m-%d"));
                println!("Status: {status:?}");
            }
        }
        Some(("transitions", args)) => {
            let state: LifecycleState = required(args, "state")?.parse()?;
            let targets = allowed_transitions(state);
            if json {
                println!("{}", json!({ "from": state, "to": targets }));
            } else if targets.is_empty() {
                println!("{state} is terminal");
            } else {
                for target in targets {
                    println!("{state} -> {target}");
                }
            }
        }
        Some(("simulate", args)) => {
            let sim = SimulatorConfig {
                seed: *args.get_one::<u64>("seed").context("missing --seed")?,
                items: *args.get_one::<usize>("items").context("missing --items")?,
                workers: *args.get_one::<usize>("workers").context("missing --workers")?,
                operations: *args.get_one::<usize>("operations").context("missing --ops")?,
            };
            tracing::info!(seed = sim.seed, items = sim.items, workers = sim.workers, "starting simulation");

            let report = run_simulator(sim, config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.generate_text());
            }
            std::process::exit(if report.passed() { 0 } else { 1 });
        }
        _ => unreachable!("subcommand_required"),
    }
    Ok(())
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing --{name}"))
}

fn verdict(granted: bool) -> &'static str {
    if granted {
        "ALLOW"
    } else {
        "DENY"
    }
}

/// Accepts a bare date (midnight UTC) or a full RFC 3339 timestamp
fn parse_timestamp(s: &str) -> anyhow::Result<Timestamp> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .context("midnight is always representable")?;
        return Ok(midnight.and_utc());
    }
    let parsed = chrono::DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD or RFC 3339"))?;
    Ok(parsed.with_timezone(&Utc))
}

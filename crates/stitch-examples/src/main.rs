use std::env;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod scenarios;

type AnyResult<T> = Result<T, String>;

const SCENARIOS: &[(&str, fn())] = &[
    ("gather_with_forking", scenarios::gather_with_forking::run),
    ("plain_stack", scenarios::plain_stack::run),
    ("taskgroup", scenarios::taskgroup::run),
    ("taskgroup_with_await", scenarios::taskgroup_with_await::run),
];

struct Args {
    list: bool,
    requested: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> AnyResult<()> {
    let args = parse_args()?;

    if args.list {
        for (name, _) in SCENARIOS {
            println!("{name}");
        }
        return Ok(());
    }

    let Some(requested) = args.requested else {
        print_help();
        return Err("No scenario name provided".to_owned());
    };

    let (name, scenario) = resolve_requested(&requested)?;
    info!(scenario = name, "running scenario");
    scenario();
    Ok(())
}

fn parse_args() -> AnyResult<Args> {
    let mut args = env::args().skip(1);
    let mut list = false;
    let mut requested: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--list" => {
                list = true;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ if arg.starts_with('-') => {
                return Err(format!("Unknown option '{arg}'"));
            }
            _ => {
                if requested.is_some() {
                    return Err("Too many arguments".to_owned());
                }
                requested = Some(arg);
            }
        }
    }

    Ok(Args { list, requested })
}

fn print_help() {
    eprintln!("Usage: stitch-examples [--list] [scenario-name]");
}

fn resolve_requested(requested: &str) -> AnyResult<(&'static str, fn())> {
    if let Some(exact) = SCENARIOS.iter().find(|(name, _)| *name == requested) {
        return Ok(*exact);
    }

    if let Some(closest) = SCENARIOS
        .iter()
        .find(|(name, _)| name.to_lowercase().contains(&requested.to_lowercase()))
    {
        eprintln!("Using closest scenario match '{}' for '{requested}'.", closest.0);
        return Ok(*closest);
    }

    eprintln!("Unknown scenario '{requested}'. Available scenarios:");
    for (name, _) in SCENARIOS {
        eprintln!("{name}");
    }
    Err("No matching scenario found".to_owned())
}

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::{self, Read, Write};
use std::path::Path;
use suite_composer::profile::{
    Resolution, PROFILE_DIR_OPTION, PROFILE_NAME_OPTION, PROFILE_OPTION,
};
use suite_composer::{Configuration, Pipeline, Profile, ResolvedProfile};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Command, ComposeArgs, ResolveArgs, RootArgs};

fn main() -> Result<()> {
    let args = RootArgs::parse();
    match args.command {
        Command::Compose(args) => {
            init_tracing(args.verbose);
            cmd_compose(args)
        }
        Command::Resolve(args) => {
            init_tracing(args.verbose);
            cmd_resolve(args)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn cmd_compose(args: ComposeArgs) -> Result<()> {
    let base = match &args.config {
        Some(path) => Configuration::load(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => Configuration::new(),
    };
    let config = base
        .with_overrides(&args.overrides)
        .context("apply --set overrides")?;
    let items = read_items(&args.items)?;

    let pipeline = Pipeline::from_config(&config).context("build stage pipeline")?;
    let composition = pipeline
        .compose(&config, items)
        .context("compose suite")?;

    let mut stdout = io::stdout().lock();
    if args.json {
        write_json(&mut stdout, &composition)?;
    } else {
        for item in &composition.items {
            writeln!(stdout, "{item}")?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct ResolveReport<'a> {
    profile: &'a str,
    scenarios: Vec<ResolveEntry<'a>>,
}

#[derive(Serialize)]
struct ResolveEntry<'a> {
    scenario: &'a str,
    schedule: &'static str,
    profile: &'a str,
}

fn cmd_resolve(args: ResolveArgs) -> Result<()> {
    let mut config = Configuration::new().with(PROFILE_OPTION, &args.profile);
    if let Some(dir) = &args.profile_dir {
        config = config.with(PROFILE_DIR_OPTION, dir.display());
    }
    if let Some(name) = &args.profile_name {
        config = config.with(PROFILE_NAME_OPTION, name);
    }
    let profile = match Profile::resolve(&config).context("resolve profile")? {
        Resolution::Resolved(profile) => profile,
        Resolution::Unresolved => anyhow::bail!("--profile must not be empty"),
    };

    let mut stdout = io::stdout().lock();
    if args.json {
        write_json(&mut stdout, &resolve_report(&profile))?;
    } else {
        for scenario in &profile.scenarios {
            writeln!(
                stdout,
                "{}\t{}\t{}",
                scenario.scenario,
                scenario.schedule.as_str(),
                scenario.profile
            )?;
        }
    }
    Ok(())
}

fn resolve_report(profile: &ResolvedProfile) -> ResolveReport<'_> {
    ResolveReport {
        profile: &profile.name,
        scenarios: profile
            .scenarios
            .iter()
            .map(|scenario| ResolveEntry {
                scenario: &scenario.scenario,
                schedule: scenario.schedule.as_str(),
                profile: &scenario.profile,
            })
            .collect(),
    }
}

fn read_items(path: &Path) -> Result<Vec<String>> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("read items from stdin")?;
        text
    } else {
        std::fs::read_to_string(path).with_context(|| format!("read items {}", path.display()))?
    };
    Ok(parse_items(&text))
}

fn parse_items(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("serialize JSON output")?;
    writeln!(out)?;
    Ok(())
}

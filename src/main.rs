use clap::Parser;
use colored::*;
use env_logger::{Builder, Env};
use eyre::{Context, Result};
use log::{LevelFilter, info};
use std::fs;
use std::path::{Path, PathBuf};

use macroloop::activity::{available_activities, build_activity};
use macroloop::config::{GlobalConfig, load_config, load_trainers};
use macroloop::domain::{RunSummary, Termination};
use macroloop::host::{Scenario, SimulatedHost};
use macroloop::runner::LoopRunner;

mod cli;

use cli::Cli;
use cli::commands::Commands;

fn setup_logging(config: &GlobalConfig) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("macroloop")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("macroloop.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    logger_builder(Env::default(), configured_level(config)?)
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// The `log-level` setting, if there is one.
fn configured_level(config: &GlobalConfig) -> Result<Option<LevelFilter>> {
    config
        .log_level
        .as_deref()
        .map(|level| level.parse().with_context(|| format!("Invalid log-level '{}'", level)))
        .transpose()
}

/// Logger filtered at `level`; directives in the environment take precedence.
fn logger_builder(env: Env, level: Option<LevelFilter>) -> Builder {
    let mut builder = Builder::new();
    builder.filter_level(level.unwrap_or(LevelFilter::Error));
    builder.parse_env(env);
    builder
}

fn run_application(cli: &Cli, config: &GlobalConfig) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Simulate {
            activity,
            scenario,
            max_iterations,
            json,
        } => handle_simulate_command(activity, scenario, *max_iterations, *json, config),
        Commands::List => handle_list_command(),
        Commands::Rules { activity } => handle_rules_command(activity, config),
        Commands::Config => handle_config_command(config),
    }
}

fn handle_simulate_command(
    activity: &str,
    scenario_path: &Path,
    max_iterations: Option<u64>,
    json: bool,
    config: &GlobalConfig,
) -> Result<()> {
    info!("Simulating {} with scenario {}", activity, scenario_path.display());
    let trainers = load_trainers().context("Failed to load trainers")?;
    let activity = build_activity(activity, config, &trainers)?;
    let scenario = Scenario::from_file(scenario_path)
        .with_context(|| format!("Failed to load scenario: {}", scenario_path.display()))?;

    let host = SimulatedHost::new(scenario).with_echo(!json);
    let mut runner = LoopRunner::new(host, activity, config);
    if max_iterations.is_some() {
        runner = runner.with_max_iterations(max_iterations);
    }

    let summary = runner.run()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, runner.host().elapsed().as_secs_f64());
    }

    if summary.is_fatal() {
        eyre::bail!("{} stopped: {}", summary.activity, summary.termination);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary, elapsed_secs: f64) {
    println!();
    println!("{} {}", "Run:".bold(), summary.run_id);
    println!(
        "  Started:      {}",
        summary.started_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S")
    );
    println!("  Game time:    {:.1}s", elapsed_secs);
    println!("  Iterations:   {}", summary.iterations);
    println!("  Remediations: {}", summary.remediations);
    for (outcome, count) in &summary.outcomes {
        println!("  {:<22} {}", outcome.to_string().cyan(), count);
    }
    let ending = summary.termination.to_string();
    match summary.termination {
        Termination::Fatal(_) => println!("  {} {}", "Ended:".red(), ending.red()),
        _ => println!("  {} {}", "Ended:".green(), ending),
    }
}

fn handle_list_command() -> Result<()> {
    let trainers = load_trainers().context("Failed to load trainers")?;
    println!("{}", "Activities:".green());
    for name in available_activities(&trainers) {
        match trainers.get(&name) {
            Some(trainer) => println!("  {:<16} {}", name, format!("trains {}", trainer.skill).dimmed()),
            None => println!("  {}", name),
        }
    }
    Ok(())
}

fn handle_rules_command(activity: &str, config: &GlobalConfig) -> Result<()> {
    let trainers = load_trainers().context("Failed to load trainers")?;
    let activity = build_activity(activity, config, &trainers)?;
    println!("{} {}", "Rules for".green(), activity.name().bold());
    for (i, rule) in activity.rules().iter().enumerate() {
        println!("  {:>2}. {} -> {}", i + 1, rule.signature, rule.outcome.to_string().cyan());
    }
    Ok(())
}

fn handle_config_command(config: &GlobalConfig) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("Failed to serialize configuration")?;
    print!("{}", yaml);
    Ok(())
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration; it carries the log level
    let config = load_config(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(&config).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log, Metadata};

    fn unset_env() -> Env<'static> {
        Env::new().filter("MACROLOOP_UNSET_LOG_FILTER")
    }

    fn enabled(logger: &env_logger::Logger, level: Level) -> bool {
        logger.enabled(&Metadata::builder().level(level).target("macroloop").build())
    }

    #[test]
    fn test_configured_level_reaches_logger() {
        let config = GlobalConfig {
            log_level: Some("debug".to_string()),
            ..Default::default()
        };
        let logger = logger_builder(unset_env(), configured_level(&config).unwrap()).build();
        assert_eq!(logger.filter(), LevelFilter::Debug);
        assert!(enabled(&logger, Level::Debug));
        assert!(!enabled(&logger, Level::Trace));
    }

    #[test]
    fn test_default_level_is_error() {
        let logger = logger_builder(unset_env(), configured_level(&GlobalConfig::default()).unwrap()).build();
        assert!(enabled(&logger, Level::Error));
        assert!(!enabled(&logger, Level::Warn));
    }

    #[test]
    fn test_invalid_log_level() {
        let config = GlobalConfig {
            log_level: Some("chatty".to_string()),
            ..Default::default()
        };
        assert!(configured_level(&config).is_err());
    }
}

use std::{
    path::PathBuf,
    process::ExitCode,
    time::{Duration, Instant},
};

use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use double_pendulum::{
    AdaptiveStepMethods, ConfigError, Derivation, PendulumError, Profile, RungeKuttaMethods,
    SimulationConfig,
};
use indicatif::{ProgressBar, ProgressStyle, style::TemplateError};
use thiserror::Error;
use tracing::Level;

mod report;

#[derive(Debug, Parser)]
#[command(version, about = "Double pendulum trajectories", long_about = None)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the named profiles
    Profiles,
    /// Print a profile as RON, ready to edit and pass to `run --config`
    Show { profile: Profile },
    /// Integrate a profile or a RON configuration and summarize the trajectory
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Named profile, `reference` when neither this nor --config is given
    #[arg(short, long, conflicts_with = "config")]
    profile: Option<Profile>,
    /// RON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    t_final: Option<f64>,
    /// Output grid spacing
    #[arg(long)]
    h: Option<f64>,
    #[arg(long)]
    atol: Option<f64>,
    #[arg(long)]
    rtol: Option<f64>,
    /// Linear damping coefficient b
    #[arg(short, long)]
    damping: Option<f64>,
    /// Runge-Kutta pair: bs32, rkf45 or dopri45
    #[arg(short, long)]
    method: Option<RungeKuttaMethods>,
    /// Step size control: basic or pid
    #[arg(long)]
    control: Option<AdaptiveStepMethods>,
    /// Acceleration evaluation: closed-form or force-balance
    #[arg(long)]
    derivation: Option<Derivation>,
    /// Print every N-th frame after the summary
    #[arg(short, long)]
    every: Option<usize>,
    /// Write the resolved configuration to this RON file
    #[arg(long)]
    save: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum CliErrors {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Pendulum(#[from] PendulumError),
    #[error("{0}")]
    Progress(#[from] TemplateError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Profiles => {
            report::profiles();
            Ok(())
        }
        Commands::Show { profile } => show(profile),
        Commands::Run(args) => run(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn show(profile: Profile) -> Result<(), CliErrors> {
    println!("{}", profile.config().to_ron()?);
    Ok(())
}

fn run(args: &RunArgs) -> Result<(), CliErrors> {
    let (label, config) = resolve(args)?;
    if let Some(path) = &args.save {
        config.save(path)?;
        success(&format!("configuration written to {}", path.display()));
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")?);
    spinner.set_message(format!("integrating {label}"));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let start = Instant::now();
    let trajectory = config.simulate();
    let elapsed = start.elapsed();
    spinner.finish_and_clear();

    let trajectory = trajectory?;
    success(&format!(
        "{label}: {} samples in {:.1} ms",
        trajectory.len(),
        elapsed.as_secs_f64() * 1e3
    ));
    report::summary(&config, &trajectory);
    if let Some(every) = args.every {
        report::table(&config, &trajectory, every.max(1));
    }
    Ok(())
}

/// Base configuration from --config or --profile, with the command line overrides applied.
fn resolve(args: &RunArgs) -> Result<(String, SimulationConfig), CliErrors> {
    let (label, mut config) = match (&args.config, args.profile) {
        (Some(path), _) => (path.display().to_string(), SimulationConfig::load(path)?),
        (None, profile) => {
            let profile = profile.unwrap_or(Profile::Reference);
            (profile.to_string(), profile.config())
        }
    };

    if let Some(t_final) = args.t_final {
        config.grid.t_final = t_final;
    }
    if let Some(h) = args.h {
        config.grid.h = h;
    }
    if let Some(atol) = args.atol {
        config.options.tolerances = config.options.tolerances.with_abs_tol(atol);
    }
    if let Some(rtol) = args.rtol {
        config.options.tolerances = config.options.tolerances.with_rel_tol(rtol);
    }
    if let Some(b) = args.damping {
        config.parameters.b = b;
    }
    if let Some(method) = args.method {
        config.options.method = method;
    }
    if let Some(control) = args.control {
        config.options.control = control;
    }
    if let Some(derivation) = args.derivation {
        config.derivation = derivation;
    }
    Ok((label, config))
}

fn success(s: &str) {
    println!("{}", s.green())
}

fn error(s: &str) {
    eprintln!("{}", s.red())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn run_args(args: &[&str]) -> RunArgs {
        let cli = Cli::try_parse_from(["pendulum", "run"].iter().chain(args)).unwrap();
        match cli.command {
            Commands::Run(args) => args,
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_defaults_to_reference() {
        let (label, config) = resolve(&run_args(&[])).unwrap();
        assert_eq!(label, "reference");
        assert_eq!(config.grid.t_final, 60.0);
        assert_eq!(config.parameters.b, 0.1);
    }

    #[test]
    fn test_overrides_apply() {
        let args = run_args(&[
            "--profile",
            "undamped",
            "--t-final",
            "2.5",
            "--h",
            "0.05",
            "--damping",
            "0.3",
            "--method",
            "rkf45",
            "--control",
            "pid",
            "--derivation",
            "force-balance",
            "--atol",
            "1e-7",
        ]);
        let (label, config) = resolve(&args).unwrap();
        assert_eq!(label, "undamped");
        assert_eq!(config.grid.t_final, 2.5);
        assert_eq!(config.grid.h, 0.05);
        assert_eq!(config.parameters.b, 0.3);
        assert_eq!(config.options.method, RungeKuttaMethods::Fehlberg45);
        assert!(matches!(config.options.control, AdaptiveStepMethods::PID(_)));
        assert_eq!(config.derivation, Derivation::ForceBalance);
        assert_eq!(config.options.tolerances.abs_tol(), 1e-7);
        assert_eq!(config.options.tolerances.rel_tol(), 1e-9);
    }

    #[test]
    fn test_profile_and_config_conflict() {
        assert!(
            Cli::try_parse_from(["pendulum", "run", "-p", "rest", "-c", "x.ron"]).is_err()
        );
        assert!(Cli::try_parse_from(["pendulum", "show", "triple"]).is_err());
        assert!(Cli::try_parse_from(["pendulum", "run", "--method", "rk4"]).is_err());
        assert!(Cli::try_parse_from(["pendulum", "run", "--control", "pi"]).is_err());
        assert!(Cli::try_parse_from(["pendulum", "-vv", "show", "small-angle"]).is_ok());
    }
}

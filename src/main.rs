//! CLI entry point for mksite

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mksite::config::ConfigMode;
use mksite::content::DateFallback;
use mksite::{BuildOptions, Mksite};

#[derive(Parser)]
#[command(name = "mksite")]
#[command(version)]
#[command(about = "Build a static site from Markdown posts and Jinja-style templates", long_about = None)]
struct Cli {
    /// Path to the config file
    config: PathBuf,

    /// Create a new config file and the posts/templates/static directories
    #[arg(short, long)]
    new: bool,

    /// Fail on a missing config file, a missing [settings] section or unknown settings
    #[arg(long)]
    strict: bool,

    /// Refuse posts without a date instead of dating them at build time
    #[arg(long)]
    require_dates: bool,

    /// Set the base directory (defaults to current directory)
    #[arg(short = 'C', long)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "mksite=debug,info"
    } else {
        "mksite=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<mksite::Error>() {
                Some(err) if err.is_validation() => println!("{}", err),
                _ => eprintln!("Error: {:?}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };

    if cli.new {
        let config_path = base_dir.join(&cli.config);
        mksite::commands::init::create_config(&config_path, &base_dir)
            .with_context(|| format!("Failed to create config {:?}", config_path))?;
        println!("Created {:?}", config_path);
        return Ok(());
    }

    let options = BuildOptions {
        config_mode: if cli.strict {
            ConfigMode::Strict
        } else {
            ConfigMode::Lenient
        },
        date_fallback: if cli.require_dates {
            DateFallback::Require
        } else {
            DateFallback::Now
        },
    };

    let site = Mksite::load(&base_dir, &cli.config, options)?;
    mksite::commands::generate::run(&site)?;
    println!("Generated successfully!");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from(["mksite", "--new", "config.ini"]).unwrap();
        assert!(cli.new);
        assert_eq!(cli.config, PathBuf::from("config.ini"));

        let cli = Cli::try_parse_from(["mksite", "-C", "/srv", "--strict", "--require-dates", "c.ini"])
            .unwrap();
        assert!(cli.strict && cli.require_dates && !cli.new);
        assert_eq!(cli.cwd, Some(PathBuf::from("/srv")));
    }

    #[test]
    fn test_cli_requires_config() {
        assert!(Cli::try_parse_from(["mksite"]).is_err());
    }

    #[test]
    fn test_validation_failure_is_reported_as_such() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "mksite",
            "-C",
            dir.path().to_str().unwrap(),
            "config.ini",
        ])
        .unwrap();

        let err = run(cli).unwrap_err();
        let err = err.downcast_ref::<mksite::Error>().unwrap();
        assert!(err.is_validation());
        assert!(err.to_string().ends_with("is not a directory or does not exist."));
    }
}

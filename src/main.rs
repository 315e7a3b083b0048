//! Subtree Trash Restore Tool
//!
//! Restores every trashed node under a given subtree root back to its
//! original position in the content tree, parents before children.
//! If the original top node no longer exists (e.g. it was deleted as an
//! additional location), create a replacement node manually and pass its id
//! as --replace-id.

// subtreerestore/src/main.rs
mod config;
mod errors;
mod restore;
mod store;
mod utils;
mod workflow;

use anyhow::{Context, Result};
use std::env;
use std::path::Path;
use std::process::ExitCode;

use config::AppConfig;
use errors::AppError;
use utils::setting::check_db_connection;

const USAGE: &str = "\
Usage: subtreerestore --node-id <id> [OPTIONS]

Options:
  -n, --node-id <id>       Subtree node ID to restore from trash (required)
  -r, --replace-id <id>    Existing node ID that will be renamed to node-id
  -s, --siteaccess <name>  Configuration context to use from config.json
";

/// Main entry point for the restore tool
#[tokio::main]
async fn main() -> ExitCode {
    match run_app().await {
        Ok(_) => {
            println!("✅ Operation completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_app() -> Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = env::args().skip(1).collect();
    let cli = match CliArgs::parse(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!();
            eprintln!("{}", USAGE);
            anyhow::bail!("Invalid command line arguments");
        }
    };

    let app_config = AppConfig::load(Path::new("config.json"), cli.siteaccess.as_deref())
        .context("Failed to load application configuration")?;

    // The blocking client drives its own runtime, so it gets a blocking
    // thread instead of a tokio worker.
    let database_url = app_config.database_url.clone();
    let reachable = tokio::task::spawn_blocking(move || check_db_connection(&database_url))
        .await
        .context("Connectivity check task failed")?;
    if !reachable {
        anyhow::bail!("Cannot proceed with restore, database is unreachable");
    }
    let pool = store::connect_pool(&app_config.database_url).await?;

    restore::run_restore_flow(&pool, &app_config, cli.node_id, cli.replace_id).await
}

/// Parsed command line flags.
#[derive(Debug, PartialEq, Eq)]
struct CliArgs {
    node_id: i64,
    replace_id: Option<i64>,
    siteaccess: Option<String>,
}

impl CliArgs {
    /// Parses `--flag value` and `--flag=value` forms, long and short.
    fn parse(args: &[String]) -> std::result::Result<Self, AppError> {
        let mut node_id = None;
        let mut replace_id = None;
        let mut siteaccess = None;

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let (flag, inline) = split_flag(arg);
            match flag {
                "-n" | "--node-id" => {
                    let value = value_for(flag, inline, &mut iter)?;
                    node_id = Some(parse_node_id(flag, &value)?);
                }
                "-r" | "--replace-id" => {
                    let value = value_for(flag, inline, &mut iter)?;
                    replace_id = Some(parse_node_id(flag, &value)?);
                }
                "-s" | "--siteaccess" => {
                    siteaccess = Some(value_for(flag, inline, &mut iter)?);
                }
                other => {
                    return Err(AppError::InvalidArguments(format!(
                        "Unknown option: {}",
                        other
                    )));
                }
            }
        }

        let node_id = node_id.ok_or_else(|| {
            AppError::InvalidArguments("The --node-id option is required".to_string())
        })?;

        Ok(CliArgs {
            node_id,
            replace_id,
            siteaccess,
        })
    }
}

fn split_flag(arg: &str) -> (&str, Option<&str>) {
    match arg.split_once('=') {
        Some((flag, value)) => (flag, Some(value)),
        None => (arg, None),
    }
}

fn value_for(
    flag: &str,
    inline: Option<&str>,
    iter: &mut std::slice::Iter<'_, String>,
) -> std::result::Result<String, AppError> {
    match inline {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        Some(_) => Err(AppError::InvalidArguments(format!(
            "Empty value for {}",
            flag
        ))),
        None => iter
            .next()
            .map(|value| value.to_string())
            .ok_or_else(|| AppError::InvalidArguments(format!("Missing value for {}", flag))),
    }
}

fn parse_node_id(flag: &str, value: &str) -> std::result::Result<i64, AppError> {
    value
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            AppError::InvalidArguments(format!("Invalid node id for {}: {}", flag, value))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_long_flags() -> anyhow::Result<()> {
        let cli = CliArgs::parse(&args(&["--node-id", "50", "--replace-id", "7"]))?;
        assert_eq!(
            cli,
            CliArgs {
                node_id: 50,
                replace_id: Some(7),
                siteaccess: None
            }
        );
        Ok(())
    }

    #[test]
    fn test_parse_short_flags_and_siteaccess() -> anyhow::Result<()> {
        let cli = CliArgs::parse(&args(&["-n", "50", "-s", "admin"]))?;
        assert_eq!(cli.node_id, 50);
        assert_eq!(cli.replace_id, None);
        assert_eq!(cli.siteaccess.as_deref(), Some("admin"));
        Ok(())
    }

    #[test]
    fn test_parse_equals_form() -> anyhow::Result<()> {
        let cli = CliArgs::parse(&args(&["--node-id=50", "--siteaccess=admin"]))?;
        assert_eq!(cli.node_id, 50);
        assert_eq!(cli.siteaccess.as_deref(), Some("admin"));
        Ok(())
    }

    #[test]
    fn test_missing_node_id_is_an_error() {
        assert!(CliArgs::parse(&args(&["--replace-id", "7"])).is_err());
        assert!(CliArgs::parse(&args(&[])).is_err());
    }

    #[test]
    fn test_non_numeric_and_non_positive_ids_are_errors() {
        assert!(CliArgs::parse(&args(&["--node-id", "abc"])).is_err());
        assert!(CliArgs::parse(&args(&["--node-id", "0"])).is_err());
        assert!(CliArgs::parse(&args(&["--node-id", "-5"])).is_err());
    }

    #[test]
    fn test_unknown_flag_and_missing_value_are_errors() {
        assert!(CliArgs::parse(&args(&["--node-id", "50", "--verbose"])).is_err());
        assert!(CliArgs::parse(&args(&["--node-id"])).is_err());
    }
}

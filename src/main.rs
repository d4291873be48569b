//! sonar-dadapush: quality gate notifications for DaDaPush
//!
//! A CLI tool that receives finished SonarQube analyses, resolves the
//! project specific channel configuration and pushes the quality gate result.

mod cli;
mod config;
mod domain;
mod service;

use std::process;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use config::ConfigService;
use domain::{ConfigResolver, ConfigStore};
use service::{DaDaPushClient, NotifyService};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigService::load(cli.config.as_deref())?;

    domain::logger::init(&config, cli.debug || config.debug, cli.quiet)?;

    match cli.command {
        Commands::Notify => {
            let client = DaDaPushClient::new(config.timeout())?;
            let mut service = NotifyService::new(client);
            let outcome = service.run(&config.notifier_settings())?;
            if !cli.quiet {
                eprintln!("{:?}", outcome);
            }
            process::exit(outcome.exit_code());
        }
        Commands::Resolve { project_key } => {
            let mut store = ConfigStore::new();
            store.refresh(&config.notifier_settings())?;
            match ConfigResolver::new(&store).resolve(&project_key) {
                Some(project) => println!(
                    "{} -> pattern '{}', channel token {}, failed quality gate only: {}",
                    project_key,
                    project.pattern(),
                    project.masked_token(),
                    project.qg_fail_only()
                ),
                None => {
                    println!("{} -> no configuration", project_key);
                    process::exit(1);
                }
            }
        }
        Commands::Init { path } => {
            let config_path = if let Some(p) = path {
                ConfigService::generate_at(&p)?;
                p
            } else {
                ConfigService::generate_default()?;
                ConfigService::default_path()
            };
            if !cli.quiet {
                eprintln!("Configuration file created at: {}", config_path.display());
            }
        }
        Commands::Check => {
            config::validate(&config)?;
            let settings = config.notifier_settings();
            let entries = config::validate_project_configs(&settings)?;
            for key in config::orphaned_entries(&settings)? {
                eprintln!("Warning: '{}' belongs to no listed project configuration", key);
            }
            if !cli.quiet {
                eprintln!(
                    "Configuration is valid ({} project configuration(s)).",
                    entries
                );
            }
        }
        Commands::Version => {
            println!("sonar-dadapush {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

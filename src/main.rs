mod cli;
mod config;
mod domain;
mod error;
mod github;
mod presentation;

use std::io;
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use cli::Cli;
use config::Config;
use domain::aggregate::IdentitySet;
use domain::pacing::FixedDelay;
use domain::traversal::Traversal;
use error::{ConfigError, Error};
use github::account::{AccountResolver, RestResolver};
use github::client::{http_client, GraphQlClient};
use presentation::output::LineWriter;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "ghidents=warn",
        1 => "ghidents=info",
        _ => "ghidents=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cfg: &Config) -> Result<()> {
    let started = Instant::now();
    let http = http_client(&cfg.token, cfg.request_timeout)?;

    let account = RestResolver::new(http.clone(), cfg.api_url.clone()).resolve(&cfg.handle)?;
    tracing::info!(handle = %account.handle, id = %account.opaque_id, "resolved account");

    let transport = GraphQlClient::new(http, cfg.graphql_url());
    let mut traversal = Traversal::new(transport, FixedDelay(cfg.page_delay));
    if let Some(deadline) = cfg.deadline_from(started) {
        traversal = traversal.with_deadline(deadline);
    }

    let mut out = LineWriter::new(io::stdout().lock(), cfg.json);
    let mut seen = IdentitySet::new();
    let stats = traversal
        .run(&account, cfg.policy, &mut seen, |line| out.write(line))
        .with_context(|| format!("walking contributions of {}", account.handle))?;

    tracing::info!(
        identities = seen.len(),
        pages = stats.repo_pages + stats.branch_pages + stats.commit_pages,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "done"
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = match Config::from_cli(cli) {
        Ok(cfg) => cfg,
        Err(ConfigError::MissingHandle) => {
            let _ = Cli::command().print_help();
            process::exit(0);
        }
        Err(e @ ConfigError::MissingToken) => {
            println!("{e}");
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(Error::from(e).exit_code());
        }
    };

    if let Err(e) = run(&cfg) {
        eprintln!("{e:#}");
        process::exit(e.downcast_ref::<Error>().map_or(1, Error::exit_code));
    }
}

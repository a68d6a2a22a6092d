pub mod api;
pub mod bracket;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod promotion;
pub mod report;
pub mod repository;
pub mod scheduling;
pub mod services;
pub mod standings;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use log::info;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::database::SqliteStore;
use crate::domain::{GroupId, Team, Tier};
use crate::errors::with_parse_context;
use crate::repository::MatchRecordStore;
use crate::scheduling::FixtureScheduler;
use crate::services::progression::ProgressionService;
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

fn open_service(config: AppConfig) -> Result<ProgressionService<SqliteStore>> {
    let store = SqliteStore::open(&config.store)?;
    Ok(ProgressionService::new(config, store))
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_init(reset: bool) -> Result<()> {
    let config = AppConfig::new();
    let store = SqliteStore::open(&config.store)?;
    if reset {
        store.reset()?;
    }

    info!("Database ready at {}", config.store.database_path);
    Ok(())
}

pub fn handle_fixture(roster: &Path, times_met: u32, output: Option<&Path>) -> Result<()> {
    let config = AppConfig::new();
    let raw = std::fs::read_to_string(roster)
        .with_context(|| format!("Failed to read roster {}", roster.display()))?;
    let teams: Vec<Team> = with_parse_context(serde_json::from_str(&raw), "roster")?;

    let rounds = FixtureScheduler::new(config.schedule).generate_round_robin(&teams, times_met)?;

    match output {
        Some(path) => {
            let json = with_parse_context(serde_json::to_string_pretty(&rounds), "rounds")?;
            std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} rounds to {}", rounds.len(), path.display());
        }
        None => print!("{}", report::render_rounds(&rounds)),
    }
    Ok(())
}

pub fn handle_standings(group: &str) -> Result<()> {
    let service = open_service(AppConfig::new())?;
    let id = GroupId::new(group);

    let table = service.standings(&id)?;
    let roster = service.store().load_group(&id)?;
    print!("{}", report::render_standings(&table, roster.as_ref()));
    Ok(())
}

pub fn handle_promote(groups: &[String], seed: bool) -> Result<()> {
    let service = open_service(AppConfig::new())?;
    let ids: Vec<GroupId> = groups.iter().map(|g| GroupId::new(g.as_str())).collect();

    let pools = service.resolve_promotion(&ids, &BTreeMap::new())?;
    print!("{}", report::render_pools(&pools));

    if seed {
        for bracket in service.seed_from_pools(&pools)? {
            print!("{}", report::render_bracket(&bracket));
        }
    }
    Ok(())
}

pub fn handle_bracket(tier: Tier) -> Result<()> {
    let service = open_service(AppConfig::new())?;
    let bracket = service.bracket(tier)?;
    print!("{}", report::render_bracket(&bracket));
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}

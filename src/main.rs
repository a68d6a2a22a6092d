use anyhow::Result;

use tournament_progression::cli::Command;
use tournament_progression::{
    handle_bracket, handle_completions, handle_fixture, handle_init, handle_promote, handle_serve,
    handle_standings, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Init { reset } => handle_init(*reset),
        Command::Fixture {
            roster,
            times_met,
            output,
        } => handle_fixture(roster, *times_met, output.as_deref()),
        Command::Standings { group } => handle_standings(group),
        Command::Promote { groups, seed } => handle_promote(groups, *seed),
        Command::Bracket { tier } => handle_bracket(*tier),
        Command::Completions { shell } => handle_completions(*shell),
    }
}

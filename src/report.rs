use std::fmt::Write as _;

use colored::Colorize;

use crate::bracket::{Bracket, BracketNode, Slot};
use crate::domain::{Defaulted, Group, MatchResult, MatchStatus, Round, Score, TeamId};
use crate::promotion::TierPools;
use crate::standings::Standings;

pub fn render_rounds(rounds: &[Round]) -> String {
    let mut out = String::new();
    for round in rounds {
        let _ = writeln!(out, "{}", format!("Round {}", round.number).bold());
        for fixture in &round.fixtures {
            let _ = writeln!(out, "  {:<12} vs  {}", fixture.home.as_str(), fixture.away);
        }
        if let Some(bye) = &round.bye {
            let _ = writeln!(out, "  {}", format!("bye: {}", bye).dimmed());
        }
    }
    out
}

/// Ranked table; team names come from `group` when given
pub fn render_standings(table: &Standings, group: Option<&Group>) -> String {
    let name_of = |team: &TeamId| {
        group
            .and_then(|g| g.teams.iter().find(|t| &t.id == team))
            .map(|t| t.name.clone())
            .unwrap_or_else(|| team.to_string())
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", format!("Group {}", table.group).bold());
    let _ = writeln!(
        out,
        "{}",
        format!(
            "{:>3}  {:<20} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}",
            "#", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"
        )
        .dimmed()
    );

    for row in &table.rows {
        let line = format!(
            "{:>3}  {:<20} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>+4} {:>4}",
            row.rank,
            name_of(&row.team),
            row.played,
            row.won,
            row.drawn,
            row.lost,
            row.goals_for,
            row.goals_against,
            row.goal_difference,
            row.points
        );
        let _ = writeln!(out, "{}", if row.rank == 1 { line.green() } else { line.normal() });
    }

    if !table.is_final() {
        let _ = writeln!(out, "{}", format!("{} results pending", table.pending).yellow());
    }
    out
}

pub fn render_pools(pools: &TierPools) -> String {
    let mut out = String::new();
    for (tier, teams) in pools {
        let names: Vec<&str> = teams.iter().map(|t| t.as_str()).collect();
        let listed = if names.is_empty() { "-".to_string() } else { names.join(", ") };
        let _ = writeln!(out, "{:<8} {}", format!("{}:", tier).bold(), listed);
    }
    out
}

pub fn render_bracket(bracket: &Bracket) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        format!("{} cup ({} rounds, {:?})", bracket.tier, bracket.rounds(), bracket.state).bold()
    );

    for round in 1..=bracket.rounds() {
        let _ = writeln!(out, "{}", round_label(round, bracket.rounds()).underline());
        for node in bracket.nodes.iter().filter(|n| n.round == round) {
            let _ = writeln!(out, "  {}", render_node(node));
        }
    }

    if let Some(champion) = bracket.champion() {
        let _ = writeln!(out, "{}", format!("Champion: {}", champion).green().bold());
    }
    out
}

fn round_label(round: u32, total: u32) -> String {
    match total - round {
        0 => "Final".to_string(),
        1 => "Semi-finals".to_string(),
        2 => "Quarter-finals".to_string(),
        _ => format!("Round {}", round),
    }
}

fn render_node(node: &BracketNode) -> String {
    let side = |slot: &Slot| match slot {
        Slot::Team(team) => team.to_string(),
        Slot::WinnerOf(source) => format!("winner of {}", source),
        Slot::Bye => "bye".to_string(),
    };
    let pairing = format!("{:<5} {} vs {}", node.id.to_string(), side(&node.slots[0]), side(&node.slots[1]));

    let outcome = node.result.as_ref().map(|r| render_outcome(node, r)).unwrap_or_default();

    match &node.winner {
        Some(winner) if outcome.is_empty() => format!("{}  -> {}", pairing, winner).dimmed().to_string(),
        Some(winner) => format!("{}  {}  -> {}", pairing, outcome, winner.as_str().green()),
        None => pairing,
    }
}

/// Scores read in the node's slot order, whichever side the result listed first
fn render_outcome(node: &BracketNode, result: &MatchResult) -> String {
    let flipped = node.slots[0].team() != Some(result.home());
    let in_slot_order = |score: Score| if flipped { score.reversed() } else { score };

    match result.status {
        MatchStatus::Completed { score, penalties: Some(shootout) } => {
            format!("{} ({} pens)", in_slot_order(score), in_slot_order(shootout))
        }
        MatchStatus::Completed { score, .. } => in_slot_order(score).to_string(),
        MatchStatus::Walkover { defaulted: Defaulted::Both } => "walkover, both defaulted".to_string(),
        MatchStatus::Walkover { defaulted: Defaulted::Home } => format!("walkover, {} defaulted", result.home()),
        MatchStatus::Walkover { defaulted: Defaulted::Away } => format!("walkover, {} defaulted", result.away()),
        MatchStatus::Scheduled => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Fixture, Team, Tier};
    use crate::scheduling::FixtureScheduler;
    use crate::standings::StandingsEngine;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_rounds_show_byes() {
        plain();
        let teams: Vec<Team> = ["A", "B", "C"].iter().map(|t| Team::new(*t, *t)).collect();
        let rounds = FixtureScheduler::new(Default::default()).generate_round_robin(&teams, 1).unwrap();

        let text = render_rounds(&rounds);
        assert!(text.contains("Round 3"));
        assert_eq!(text.matches("bye:").count(), 3);
    }

    #[test]
    fn test_standings_use_team_names() {
        plain();
        let group = Group::new(
            "G1",
            "Group 1",
            vec![Team::new("A", "Alpha"), Team::new("B", "Beta")],
            Default::default(),
        );
        let results = [
            MatchResult::completed(Fixture::new("A".into(), "B".into(), 1), Score::new(3, 1)),
            MatchResult::scheduled(Fixture::new("B".into(), "A".into(), 2)),
        ];
        let table = StandingsEngine::default().compute_standings(&group, &results).unwrap();

        let text = render_standings(&table, Some(&group));
        assert!(text.contains("Alpha"));
        assert!(text.contains("+2"));
        assert!(text.contains("1 results pending"));
    }

    #[test]
    fn test_bracket_labels_and_penalties() {
        plain();
        let teams: Vec<TeamId> = ["A", "B", "C", "D"].into_iter().map(TeamId::new).collect();
        let mut bracket = Bracket::seed(Tier::Gold, &teams).unwrap();
        let semi = MatchResult::completed(Fixture::new("A".into(), "D".into(), 1), Score::new(2, 2))
            .with_penalties(Score::new(4, 3));
        bracket.record_result(crate::bracket::NodeId(1), semi).unwrap();

        let text = render_bracket(&bracket);
        assert!(text.contains("Semi-finals"));
        assert!(text.contains("Final"));
        assert!(text.contains("2-2 (4-3 pens)  -> A"));
        assert!(text.contains("winner of #2"));
    }

    #[test]
    fn test_empty_pools_are_marked() {
        plain();
        let pools = TierPools::from([(Tier::Gold, vec![TeamId::new("A")]), (Tier::Bronze, Vec::new())]);
        let text = render_pools(&pools);
        assert!(text.contains("gold:"));
        assert!(text.contains("bronze:  -"));
    }

    #[test]
    fn test_reversed_result_reads_in_slot_order() {
        plain();
        let teams: Vec<TeamId> = ["A", "B", "C", "D"].into_iter().map(TeamId::new).collect();
        let mut bracket = Bracket::seed(Tier::Gold, &teams).unwrap();
        // Node 2 holds B vs C; the result lists C first
        let away_win = MatchResult::completed(Fixture::new("C".into(), "B".into(), 1), Score::new(0, 3))
            .with_penalties(Score::new(1, 2));
        bracket.record_result(crate::bracket::NodeId(2), away_win).unwrap();

        let text = render_bracket(&bracket);
        assert!(text.contains("B vs C  3-0 (2-1 pens)  -> B"), "{}", text);

        let walkover = MatchResult::walkover(Fixture::new("D".into(), "A".into(), 1), Defaulted::Home);
        bracket.record_result(crate::bracket::NodeId(1), walkover).unwrap();
        assert!(render_bracket(&bracket).contains("A vs D  walkover, D defaulted  -> A"));
    }
}

use std::collections::BTreeMap;

use crate::config::settings::ScoringSettings;
use crate::domain::{Defaulted, Group, MatchResult, MatchStatus, Score, StandingRow, TeamId};
use crate::errors::{EngineError, EngineResult};

/// One counted meeting, kept for head-to-head comparisons
#[derive(Debug, Clone)]
pub struct Meeting {
    pub home: TeamId,
    pub away: TeamId,
    pub score: Score,
    pub home_points: u32,
    pub away_points: u32,
}

/// Running totals for one group
pub struct Tally<'a> {
    scoring: &'a ScoringSettings,
    rows: BTreeMap<TeamId, StandingRow>,
    pub meetings: Vec<Meeting>,
    pub pending: usize,
}

impl<'a> Tally<'a> {
    pub fn new(group: &Group, scoring: &'a ScoringSettings) -> Self {
        let rows = group
            .teams
            .iter()
            .map(|t| (t.id.clone(), StandingRow::new(t.id.clone())))
            .collect();

        Self {
            scoring,
            rows,
            meetings: Vec::new(),
            pending: 0,
        }
    }

    pub fn apply(&mut self, group: &Group, result: &MatchResult) -> EngineResult<()> {
        check_participants(group, result)?;

        match result.status {
            MatchStatus::Scheduled => {
                self.pending += 1;
            }
            // Shootouts only settle knockout ties; a group draw stays a draw
            MatchStatus::Completed { score, .. } => {
                self.record_played(group, result.home(), result.away(), score)?;
            }
            MatchStatus::Walkover { defaulted: Defaulted::Both } => {
                self.record_double_walkover(result.home(), result.away());
            }
            MatchStatus::Walkover { .. } => {
                if let Some(score) = result.effective_score(self.scoring.walkover_goals) {
                    self.record_played(group, result.home(), result.away(), score)?;
                }
            }
        }

        Ok(())
    }

    pub fn into_rows(self) -> Vec<StandingRow> {
        self.rows.into_values().collect()
    }

    fn record_played(&mut self, group: &Group, home: &TeamId, away: &TeamId, score: Score) -> EngineResult<()> {
        let (home_points, away_points) = if score.home > score.away {
            (self.scoring.win_points, self.scoring.loss_points)
        } else if score.home < score.away {
            (self.scoring.loss_points, self.scoring.win_points)
        } else {
            (self.scoring.draw_points, self.scoring.draw_points)
        };

        self.credit(group, home, score.home, score.away, home_points)?;
        self.credit(group, away, score.away, score.home, away_points)?;

        self.meetings.push(Meeting {
            home: home.clone(),
            away: away.clone(),
            score,
            home_points,
            away_points,
        });
        Ok(())
    }

    fn record_double_walkover(&mut self, home: &TeamId, away: &TeamId) {
        for team in [home, away] {
            if let Some(row) = self.rows.get_mut(team) {
                row.played += 1;
                row.lost += 1;
            }
        }

        self.meetings.push(Meeting {
            home: home.clone(),
            away: away.clone(),
            score: Score::new(0, 0),
            home_points: 0,
            away_points: 0,
        });
    }

    fn credit(&mut self, group: &Group, team: &TeamId, scored: u32, conceded: u32, points: u32) -> EngineResult<()> {
        let Some(row) = self.rows.get_mut(team) else {
            return Ok(());
        };

        let overflow = || {
            EngineError::inconsistent(
                format!("group {}", group.id),
                format!("totals of team {} exceed the countable range", team),
            )
        };
        let goals_for = row.goals_for.checked_add(scored).ok_or_else(overflow)?;
        let goals_against = row.goals_against.checked_add(conceded).ok_or_else(overflow)?;
        let total_points = row.points.checked_add(points).ok_or_else(overflow)?;

        row.played += 1;
        row.goals_for = goals_for;
        row.goals_against = goals_against;
        row.goal_difference = i64::from(goals_for) - i64::from(goals_against);
        row.points = total_points;

        if scored > conceded {
            row.won += 1;
        } else if scored < conceded {
            row.lost += 1;
        } else {
            row.drawn += 1;
        }
        Ok(())
    }
}

fn check_participants(group: &Group, result: &MatchResult) -> EngineResult<()> {
    let context = format!("group {}", group.id);

    for team in [result.home(), result.away()] {
        if !group.contains(team) {
            return Err(EngineError::inconsistent(
                context,
                format!("result in round {} references unknown team {}", result.fixture.round, team),
            ));
        }
    }

    if result.home() == result.away() {
        return Err(EngineError::inconsistent(
            context,
            format!("team {} cannot play itself", result.home()),
        ));
    }

    Ok(())
}

use anyhow::{Result, bail};
use chrono::NaiveDateTime;

use crate::domain::{Defaulted, Fixture, GroupId, MatchResult, MatchStatus, Score, TeamId};

#[derive(Debug, Clone)]
pub struct GroupRow {
    pub id: String,
    pub name: String,
    /// Promotion rule as JSON
    pub rule: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct TeamRow {
    pub group_id: String,
    pub id: String,
    pub name: String,
    pub position: i64,
}

/// One fixture of a group and whatever has been recorded for it
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRow {
    pub group_id: String,
    pub round: i64,
    pub home: String,
    pub away: String,
    pub status: String,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    pub penalties_home: Option<i64>,
    pub penalties_away: Option<i64>,
    pub defaulted: Option<String>,
    pub venue: Option<String>,
    pub kickoff: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct BracketRow {
    pub tier: String,
    pub state: String,
    /// Whole bracket as JSON
    pub data: String,
    pub updated_at: Option<NaiveDateTime>,
}

impl MatchRow {
    pub fn from_result(group: &GroupId, result: &MatchResult) -> Self {
        let fixture = &result.fixture;
        let mut row = Self {
            group_id: group.as_str().to_string(),
            round: i64::from(fixture.round),
            home: fixture.home.as_str().to_string(),
            away: fixture.away.as_str().to_string(),
            status: result.status.as_str().to_string(),
            home_score: None,
            away_score: None,
            penalties_home: None,
            penalties_away: None,
            defaulted: None,
            venue: fixture.venue.clone(),
            kickoff: fixture.kickoff,
        };

        match result.status {
            MatchStatus::Scheduled => {}
            MatchStatus::Completed { score, penalties } => {
                row.home_score = Some(i64::from(score.home));
                row.away_score = Some(i64::from(score.away));
                row.penalties_home = penalties.map(|p| i64::from(p.home));
                row.penalties_away = penalties.map(|p| i64::from(p.away));
            }
            MatchStatus::Walkover { defaulted } => {
                row.defaulted = Some(defaulted.as_str().to_string());
            }
        }

        row
    }

    pub fn into_result(self) -> Result<MatchResult> {
        let status = match self.status.as_str() {
            "scheduled" => MatchStatus::Scheduled,
            "completed" => {
                let score = score_from(self.home_score, self.away_score)?
                    .ok_or_else(|| anyhow::anyhow!("Completed match {} vs {} has no score", self.home, self.away))?;
                let penalties = score_from(self.penalties_home, self.penalties_away)?;
                MatchStatus::Completed { score, penalties }
            }
            "walkover" => MatchStatus::Walkover {
                defaulted: parse_defaulted(self.defaulted.as_deref())?,
            },
            other => bail!("Unknown match status: {}", other),
        };

        let round = u32::try_from(self.round)?;
        let mut fixture = Fixture::new(TeamId::new(self.home), TeamId::new(self.away), round);
        fixture.venue = self.venue;
        fixture.kickoff = self.kickoff;

        Ok(MatchResult { fixture, status })
    }
}

fn score_from(home: Option<i64>, away: Option<i64>) -> Result<Option<Score>> {
    match (home, away) {
        (Some(home), Some(away)) => Ok(Some(Score::new(u32::try_from(home)?, u32::try_from(away)?))),
        (None, None) => Ok(None),
        _ => bail!("Score has only one side recorded"),
    }
}

fn parse_defaulted(value: Option<&str>) -> Result<Defaulted> {
    match value {
        Some("home") => Ok(Defaulted::Home),
        Some("away") => Ok(Defaulted::Away),
        Some("both") => Ok(Defaulted::Both),
        other => bail!("Invalid walkover side: {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_row_keeps_penalties() {
        let fixture = Fixture::new("A".into(), "B".into(), 4);
        let result = MatchResult::completed(fixture, Score::new(2, 2)).with_penalties(Score::new(4, 3));

        let row = MatchRow::from_result(&GroupId::new("G1"), &result);
        assert_eq!(row.status, "completed");
        assert_eq!(row.penalties_home, Some(4));
        assert_eq!(row.into_result().unwrap(), result);
    }

    #[test]
    fn test_walkover_row() {
        let result = MatchResult::walkover(Fixture::new("A".into(), "B".into(), 1), Defaulted::Both);
        let row = MatchRow::from_result(&GroupId::new("G1"), &result);

        assert_eq!(row.defaulted.as_deref(), Some("both"));
        assert!(row.home_score.is_none());
        assert_eq!(row.into_result().unwrap(), result);
    }

    #[test]
    fn test_corrupt_rows_are_rejected() {
        let result = MatchResult::completed(Fixture::new("A".into(), "B".into(), 1), Score::new(1, 0));
        let mut row = MatchRow::from_result(&GroupId::new("G1"), &result);

        row.away_score = None;
        assert!(row.clone().into_result().is_err());

        row.status = "postponed".to_string();
        assert!(row.into_result().is_err());
    }
}

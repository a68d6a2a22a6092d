use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque team identifier. Its ordering is the last-resort tie-break.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub String);

impl TeamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

impl Team {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: TeamId::new(id),
            name: name.into(),
        }
    }
}

/// Knockout cup a team can be promoted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Gold,
    Silver,
    Bronze,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Gold, Tier::Silver, Tier::Bronze];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Gold => "gold",
            Tier::Silver => "silver",
            Tier::Bronze => "bronze",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tier: {0}")]
pub struct UnknownTier(pub String);

impl FromStr for Tier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gold" | "oro" => Ok(Tier::Gold),
            "silver" | "plata" => Ok(Tier::Silver),
            "bronze" | "bronce" => Ok(Tier::Bronze),
            _ => Err(UnknownTier(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RoundKind {
    GroupStage,
    Friendly,
    Knockout { tier: Tier },
}

/// An unplayed pairing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub home: TeamId,
    pub away: TeamId,
    pub round: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kickoff: Option<NaiveDateTime>,
}

impl Fixture {
    pub fn new(home: TeamId, away: TeamId, round: u32) -> Self {
        Self {
            home,
            away,
            round,
            venue: None,
            kickoff: None,
        }
    }

    pub fn involves(&self, team: &TeamId) -> bool {
        &self.home == team || &self.away == team
    }

    /// Same pairing with home and away swapped
    pub fn reversed(&self) -> Self {
        Self {
            home: self.away.clone(),
            away: self.home.clone(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub number: u32,
    pub kind: RoundKind,
    pub fixtures: Vec<Fixture>,
    /// Team sitting this round out when the roster is odd
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bye: Option<TeamId>,
}

impl Round {
    pub fn teams(&self) -> impl Iterator<Item = &TeamId> {
        self.fixtures.iter().flat_map(|f| [&f.home, &f.away])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    pub fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }

    pub fn is_draw(&self) -> bool {
        self.home == self.away
    }

    /// Same scoreline read from the away side
    pub fn reversed(&self) -> Self {
        Self::new(self.away, self.home)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// Which side failed to show up for a walkover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Defaulted {
    Home,
    Away,
    Both,
}

impl Defaulted {
    pub fn as_str(&self) -> &'static str {
        match self {
            Defaulted::Home => "home",
            Defaulted::Away => "away",
            Defaulted::Both => "both",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MatchStatus {
    Scheduled,
    Completed {
        score: Score,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        penalties: Option<Score>,
    },
    Walkover {
        defaulted: Defaulted,
    },
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Completed { .. } => "completed",
            MatchStatus::Walkover { .. } => "walkover",
        }
    }
}

/// A fixture together with whatever has been recorded for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub fixture: Fixture,
    pub status: MatchStatus,
}

impl MatchResult {
    pub fn scheduled(fixture: Fixture) -> Self {
        Self {
            fixture,
            status: MatchStatus::Scheduled,
        }
    }

    pub fn completed(fixture: Fixture, score: Score) -> Self {
        Self {
            fixture,
            status: MatchStatus::Completed {
                score,
                penalties: None,
            },
        }
    }

    pub fn walkover(fixture: Fixture, defaulted: Defaulted) -> Self {
        Self {
            fixture,
            status: MatchStatus::Walkover { defaulted },
        }
    }

    /// Attach a shootout score. Has no effect on unplayed or walkover results.
    pub fn with_penalties(mut self, shootout: Score) -> Self {
        if let MatchStatus::Completed { penalties, .. } = &mut self.status {
            *penalties = Some(shootout);
        }
        self
    }

    /// Same result recorded from the other side: teams, scores and the defaulted side swap
    pub fn reversed(&self) -> Self {
        let status = match self.status {
            MatchStatus::Scheduled => MatchStatus::Scheduled,
            MatchStatus::Completed { score, penalties } => MatchStatus::Completed {
                score: score.reversed(),
                penalties: penalties.map(|p| p.reversed()),
            },
            MatchStatus::Walkover { defaulted } => MatchStatus::Walkover {
                defaulted: match defaulted {
                    Defaulted::Home => Defaulted::Away,
                    Defaulted::Away => Defaulted::Home,
                    Defaulted::Both => Defaulted::Both,
                },
            },
        };

        Self {
            fixture: self.fixture.reversed(),
            status,
        }
    }

    pub fn home(&self) -> &TeamId {
        &self.fixture.home
    }

    pub fn away(&self) -> &TeamId {
        &self.fixture.away
    }

    pub fn is_counted(&self) -> bool {
        !matches!(self.status, MatchStatus::Scheduled)
    }

    pub fn penalties(&self) -> Option<Score> {
        match self.status {
            MatchStatus::Completed { penalties, .. } => penalties,
            _ => None,
        }
    }

    /// Scoreline used for goal tallies; walkovers award `walkover_goals` to the side that showed up
    pub fn effective_score(&self, walkover_goals: u32) -> Option<Score> {
        match self.status {
            MatchStatus::Scheduled => None,
            MatchStatus::Completed { score, .. } => Some(score),
            MatchStatus::Walkover { defaulted } => Some(match defaulted {
                Defaulted::Home => Score::new(0, walkover_goals),
                Defaulted::Away => Score::new(walkover_goals, 0),
                Defaulted::Both => Score::new(0, 0),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub team: TeamId,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
    pub rank: usize,
}

impl StandingRow {
    pub fn new(team: TeamId) -> Self {
        Self {
            team,
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
            rank: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionBand {
    pub count: usize,
    pub tier: Tier,
}

/// Rank bands of a group, e.g. ranks 1-2 to Gold and 3-4 to Silver
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PromotionRule {
    pub bands: Vec<PromotionBand>,
}

impl PromotionRule {
    pub fn new(bands: impl IntoIterator<Item = (usize, Tier)>) -> Self {
        Self {
            bands: bands
                .into_iter()
                .map(|(count, tier)| PromotionBand { count, tier })
                .collect(),
        }
    }

    pub fn total(&self) -> usize {
        self.bands.iter().map(|b| b.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub teams: Vec<Team>,
    #[serde(default)]
    pub rule: PromotionRule,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>, teams: Vec<Team>, rule: PromotionRule) -> Self {
        Self {
            id: GroupId::new(id),
            name: name.into(),
            teams,
            rule,
        }
    }

    pub fn contains(&self, team: &TeamId) -> bool {
        self.teams.iter().any(|t| &t.id == team)
    }

    pub fn team_ids(&self) -> Vec<TeamId> {
        self.teams.iter().map(|t| t.id.clone()).collect()
    }

    pub fn size(&self) -> usize {
        self.teams.len()
    }
}

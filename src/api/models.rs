use serde::{Deserialize, Serialize};

use crate::bracket::{Bracket, NodeId};
use crate::domain::{GroupId, MatchResult, PromotionBand, Round, StandingRow, Team, TeamId, Tier};
use crate::promotion::TierPools;

fn one() -> u32 {
    1
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFixtureRequest {
    pub teams: Vec<Team>,
    #[serde(default = "one")]
    pub times_met: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    #[serde(default = "one")]
    pub times_met: u32,
}

#[derive(Serialize)]
pub struct RoundsResponse {
    pub rounds: Vec<Round>,
}

#[derive(Deserialize)]
pub struct StandingsQuery {
    pub group: GroupId,
}

/// Table returned after a result is recorded
#[derive(Serialize)]
pub struct StandingsUpdate {
    pub rows: Vec<StandingRow>,
    pub pending: usize,
}

#[derive(Deserialize)]
pub struct RuleOverride {
    pub group: GroupId,
    pub bands: Vec<PromotionBand>,
}

#[derive(Deserialize)]
pub struct PromotionRequest {
    pub groups: Vec<GroupId>,
    #[serde(default)]
    pub rules: Vec<RuleOverride>,
}

#[derive(Serialize)]
pub struct PromotionResponse {
    pub tiers: TierPools,
}

#[derive(Deserialize)]
pub struct SeedRequest {
    pub tier: Tier,
    pub teams: Vec<TeamId>,
}

#[derive(Deserialize)]
pub struct BracketResultRequest {
    pub tier: Tier,
    pub node: NodeId,
    pub result: MatchResult,
}

#[derive(Deserialize)]
pub struct ResetRequest {
    pub tier: Tier,
    pub node: NodeId,
}

#[derive(Serialize)]
pub struct BracketResponse {
    pub bracket: Bracket,
}

#[derive(Serialize)]
pub struct ResetResponse {
    pub bracket: Bracket,
    pub invalidated: Vec<NodeId>,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

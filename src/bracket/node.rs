use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{MatchResult, TeamId, Tier};

/// Index of a node in its bracket's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Slot {
    Team(TeamId),
    /// Filled once the referenced node resolves
    WinnerOf(NodeId),
    Bye,
}

impl Slot {
    pub fn team(&self) -> Option<&TeamId> {
        match self {
            Slot::Team(team) => Some(team),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketNode {
    pub id: NodeId,
    pub tier: Tier,
    /// 1 for the first round; the final carries the highest number
    pub round: u32,
    pub slots: [Slot; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<MatchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<TeamId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loser: Option<TeamId>,
}

impl BracketNode {
    pub fn is_resolved(&self) -> bool {
        self.winner.is_some()
    }

    pub fn is_bye(&self) -> bool {
        self.slots.iter().any(|s| matches!(s, Slot::Bye))
    }

    /// Both competitors, once known
    pub fn teams(&self) -> Option<(&TeamId, &TeamId)> {
        match (&self.slots[0], &self.slots[1]) {
            (Slot::Team(a), Slot::Team(b)) => Some((a, b)),
            _ => None,
        }
    }

    pub fn is_playable(&self) -> bool {
        !self.is_resolved() && self.teams().is_some()
    }

    pub(super) fn clear(&mut self) {
        self.result = None;
        self.winner = None;
        self.loser = None;
    }
}

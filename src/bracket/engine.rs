use log::debug;
use serde::{Deserialize, Serialize};

use crate::domain::{self, Defaulted, Fixture, MatchResult, MatchStatus, Round, RoundKind, TeamId, Tier};
use crate::errors::{EngineError, EngineResult};

use super::node::{BracketNode, NodeId, Slot};
use super::seeding::seed_order;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BracketState {
    Seeded,
    InProgress,
    Completed,
}

/// Single-elimination tree for one tier.
///
/// Nodes live in heap order: node 0 is the final and the children of node `i`
/// are `2i + 1` and `2i + 2`. Nodes are never removed, only resolved or reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bracket {
    pub tier: Tier,
    /// Number of first-round lines, always a power of two
    pub size: usize,
    pub state: BracketState,
    pub nodes: Vec<BracketNode>,
}

impl Bracket {
    /// Builds the tree for `teams`, taken as seeds 1..n in the given order.
    ///
    /// Seeds beyond n are byes; their opponents advance immediately.
    pub fn seed(tier: Tier, teams: &[TeamId]) -> EngineResult<Self> {
        domain::validate_roster(teams)?;

        let size = teams.len().next_power_of_two();
        let rounds = size.trailing_zeros();
        let first_leaf = size / 2 - 1;

        let mut nodes: Vec<BracketNode> = (0..size - 1)
            .map(|idx| BracketNode {
                id: NodeId(idx),
                tier,
                round: rounds - depth(idx),
                slots: [Slot::WinnerOf(NodeId(2 * idx + 1)), Slot::WinnerOf(NodeId(2 * idx + 2))],
                result: None,
                winner: None,
                loser: None,
            })
            .collect();

        let line = |seed: usize| match teams.get(seed - 1) {
            Some(team) => Slot::Team(team.clone()),
            None => Slot::Bye,
        };

        for (offset, pair) in seed_order(size).chunks(2).enumerate() {
            nodes[first_leaf + offset].slots = [line(pair[0]), line(pair[1])];
        }

        let mut bracket = Self {
            tier,
            size,
            state: BracketState::Seeded,
            nodes,
        };
        bracket.advance_byes();

        debug!(
            "Seeded {} bracket: {} teams, {} lines, {} rounds",
            tier,
            teams.len(),
            size,
            rounds
        );

        Ok(bracket)
    }

    pub fn node(&self, id: NodeId) -> Option<&BracketNode> {
        self.nodes.get(id.0)
    }

    pub fn root(&self) -> &BracketNode {
        &self.nodes[0]
    }

    pub fn rounds(&self) -> u32 {
        self.size.trailing_zeros()
    }

    /// Number of match nodes, byes included
    pub fn match_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn champion(&self) -> Option<&TeamId> {
        match self.state {
            BracketState::Completed => self.root().winner.as_ref(),
            _ => None,
        }
    }

    /// Nodes whose two teams are known and which still need a result
    pub fn playable_nodes(&self) -> Vec<NodeId> {
        self.nodes.iter().filter(|n| n.is_playable()).map(|n| n.id).collect()
    }

    /// Playable fixtures of one bracket round, numbered with `round`
    pub fn round_fixtures(&self, round: u32) -> Round {
        let fixtures = self
            .nodes
            .iter()
            .filter(|n| n.round == round)
            .filter_map(|n| if n.is_playable() { n.teams() } else { None })
            .map(|(home, away)| Fixture::new(home.clone(), away.clone(), round))
            .collect();

        Round {
            number: round,
            kind: RoundKind::Knockout { tier: self.tier },
            fixtures,
            bye: None,
        }
    }

    /// Resolves `node` with `result` and moves the winner up the tree.
    ///
    /// Recording the same result twice is a no-op. A different result for a
    /// resolved node is refused; use [`Bracket::reset`] first.
    pub fn record_result(&mut self, node: NodeId, result: MatchResult) -> EngineResult<&BracketNode> {
        let current = self.node(node).ok_or(EngineError::UnknownNode { node })?;

        if current.is_resolved() {
            if current.result.as_ref() == Some(&result) {
                return Ok(&self.nodes[node.0]);
            }
            return Err(EngineError::ResultAlreadyRecorded { node });
        }

        let Some((first, second)) = current.teams() else {
            return Err(EngineError::not_ready(node, "both slots need a confirmed team"));
        };

        let same_pairing = (result.home() == first && result.away() == second)
            || (result.home() == second && result.away() == first);
        if !same_pairing {
            return Err(EngineError::inconsistent(
                format!("{} bracket node {}", self.tier, node),
                format!(
                    "result is for {} vs {} but the node holds {} vs {}",
                    result.home(),
                    result.away(),
                    first,
                    second
                ),
            ));
        }

        let (winner, loser) = decide(node, &result)?;
        debug!("{} bracket node {}: {} beat {}", self.tier, node, winner, loser);

        let entry = &mut self.nodes[node.0];
        entry.result = Some(result);
        entry.winner = Some(winner.clone());
        entry.loser = Some(loser);

        self.propagate(node, winner);
        self.refresh_state();

        Ok(&self.nodes[node.0])
    }

    /// Clears the result of `node` and of every later node its winner reached.
    ///
    /// Returns the ids of all cleared nodes, `node` first.
    pub fn reset(&mut self, node: NodeId) -> EngineResult<Vec<NodeId>> {
        let current = self.node(node).ok_or(EngineError::UnknownNode { node })?;

        if current.is_bye() {
            return Err(EngineError::not_ready(node, "byes are resolved at seeding and cannot be reset"));
        }
        if !current.is_resolved() {
            return Ok(Vec::new());
        }

        let mut invalidated = vec![node];
        self.nodes[node.0].clear();

        let mut child = node.0;
        while let Some((parent, slot)) = parent_of(child) {
            self.nodes[parent].slots[slot] = Slot::WinnerOf(NodeId(child));

            if !self.nodes[parent].is_resolved() {
                break;
            }
            self.nodes[parent].clear();
            invalidated.push(NodeId(parent));
            child = parent;
        }

        debug!("{} bracket reset from node {}: {} nodes cleared", self.tier, node, invalidated.len());
        self.refresh_state();

        Ok(invalidated)
    }

    fn advance_byes(&mut self) {
        let first_leaf = self.size / 2 - 1;
        for idx in first_leaf..self.nodes.len() {
            let advancing = match &self.nodes[idx].slots {
                [Slot::Team(team), Slot::Bye] | [Slot::Bye, Slot::Team(team)] => team.clone(),
                _ => continue,
            };

            self.nodes[idx].winner = Some(advancing.clone());
            self.propagate(NodeId(idx), advancing);
        }
    }

    fn propagate(&mut self, node: NodeId, winner: TeamId) {
        if let Some((parent, slot)) = parent_of(node.0) {
            self.nodes[parent].slots[slot] = Slot::Team(winner);
        }
    }

    fn refresh_state(&mut self) {
        self.state = if self.root().is_resolved() {
            BracketState::Completed
        } else if self.nodes.iter().any(|n| n.result.is_some()) {
            BracketState::InProgress
        } else {
            BracketState::Seeded
        };
    }
}

/// Winner and loser of a knockout result; level scores need a decisive shootout
fn decide(node: NodeId, result: &MatchResult) -> EngineResult<(TeamId, TeamId)> {
    let home = result.home().clone();
    let away = result.away().clone();

    match result.status {
        MatchStatus::Scheduled => Err(EngineError::not_ready(node, "the match has not been played")),
        MatchStatus::Completed { score, penalties } => {
            let decisive = if score.is_draw() {
                match penalties {
                    Some(shootout) if !shootout.is_draw() => shootout,
                    _ => return Err(EngineError::MissingTiebreak { node }),
                }
            } else {
                score
            };

            if decisive.home > decisive.away {
                Ok((home, away))
            } else {
                Ok((away, home))
            }
        }
        MatchStatus::Walkover { defaulted: Defaulted::Home } => Ok((away, home)),
        MatchStatus::Walkover { defaulted: Defaulted::Away } => Ok((home, away)),
        MatchStatus::Walkover { defaulted: Defaulted::Both } => Err(EngineError::inconsistent(
            format!("bracket node {}", node),
            "a double walkover leaves nobody to advance",
        )),
    }
}

fn depth(idx: usize) -> u32 {
    (idx + 1).ilog2()
}

/// Parent index and the slot this child feeds
fn parent_of(idx: usize) -> Option<(usize, usize)> {
    if idx == 0 {
        None
    } else {
        Some(((idx - 1) / 2, (idx - 1) % 2))
    }
}

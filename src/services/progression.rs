use std::collections::BTreeMap;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::bracket::{Bracket, NodeId};
use crate::config::settings::AppConfig;
use crate::domain::{self, Group, GroupId, MatchResult, PromotionRule, Round, Team, TeamId, Tier};
use crate::errors::{EngineError, EngineResult, NotFound};
use crate::promotion::{self, TierPools};
use crate::repository::{BracketStore, MatchRecordStore};
use crate::scheduling::FixtureScheduler;
use crate::standings::{Standings, StandingsEngine};

/// Drives the engine against an injected store.
///
/// Loads explicit inputs, calls the pure engine functions and persists what
/// they return. Standings are recomputed from stored results on every call.
pub struct ProgressionService<S> {
    config: AppConfig,
    store: S,
    scheduler: FixtureScheduler,
    standings: StandingsEngine,
}

impl<S> ProgressionService<S>
where
    S: MatchRecordStore + BracketStore,
{
    pub fn new(config: AppConfig, store: S) -> Self {
        Self {
            scheduler: FixtureScheduler::new(config.schedule),
            standings: StandingsEngine::new(config.scoring),
            config,
            store,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn generate_fixture(&self, teams: &[Team], times_met: u32) -> Result<Vec<Round>> {
        let rounds = self.scheduler.generate_round_robin(teams, times_met)?;
        info!(
            "Generated {} rounds for {} teams (times met: {})",
            rounds.len(),
            teams.len(),
            times_met
        );
        Ok(rounds)
    }

    /// Generates the group's schedule and stores every fixture as scheduled.
    ///
    /// A group is scheduled once; stored results are never overwritten.
    pub fn schedule_group(&self, id: &GroupId, times_met: u32) -> Result<Vec<Round>> {
        let group = self.require_group(id)?;
        let stored = self.stored_results(&group)?;
        if !stored.is_empty() {
            return Err(EngineError::inconsistent(
                format!("group {}", group.id),
                format!("already scheduled with {} fixtures", stored.len()),
            )
            .into());
        }
        let rounds = self.generate_fixture(&group.teams, times_met)?;

        for fixture in rounds.iter().flat_map(|round| &round.fixtures) {
            self.store
                .save_result(&group.id, &MatchResult::scheduled(fixture.clone()))
                .with_context(|| format!("Failed to store fixtures of group {}", group.id))?;
        }

        info!("Stored schedule for group {}: {} rounds", group.id, rounds.len());
        Ok(rounds)
    }

    pub fn register_group(&self, group: Group) -> Result<Group> {
        domain::validate_roster(group.teams.iter().map(|t| &t.id))?;
        self.store
            .save_group(&group)
            .with_context(|| format!("Failed to register group {}", group.id))?;

        info!("Registered group {} with {} teams", group.id, group.size());
        Ok(group)
    }

    pub fn list_groups(&self) -> Result<Vec<Group>> {
        self.store.list_groups().context("Failed to list groups")
    }

    /// Stores a group result and returns the recomputed table.
    ///
    /// The result must settle one of the group's stored fixtures: same round,
    /// same pair, either side listed first. A result given the other way round
    /// is flipped to the stored orientation so it replaces that fixture.
    /// Nothing is written when the result is rejected.
    pub fn record_match(&self, id: &GroupId, result: MatchResult) -> Result<Standings> {
        let group = self.require_group(id)?;
        self.standings.compute_standings(&group, std::slice::from_ref(&result))?;
        let result = settle_fixture(&group.id, &self.stored_results(&group)?, result)?;

        self.store
            .save_result(&group.id, &result)
            .with_context(|| format!("Failed to record result in group {}", group.id))?;
        debug!(
            "Recorded {} vs {} in group {}: {}",
            result.home(),
            result.away(),
            group.id,
            result.status.as_str()
        );

        self.compute(&group)
    }

    pub fn standings(&self, id: &GroupId) -> Result<Standings> {
        let group = self.require_group(id)?;
        self.compute(&group)
    }

    /// Promotes the finished groups of one phase into tier pools.
    ///
    /// Each group uses its stored rule unless `overrides` names it. Every tier
    /// appears in the output, empty when nobody qualified for it.
    pub fn resolve_promotion(
        &self,
        ids: &[GroupId],
        overrides: &BTreeMap<GroupId, PromotionRule>,
    ) -> Result<TierPools> {
        let groups = ids
            .iter()
            .map(|id| self.require_group(id))
            .collect::<Result<Vec<_>>>()?;
        domain::validate_phase(&groups)?;

        let mut tables = BTreeMap::new();
        let mut rules = BTreeMap::new();
        for group in &groups {
            tables.insert(group.id.clone(), self.compute(group)?);
            let rule = overrides.get(&group.id).unwrap_or(&group.rule);
            rules.insert(group.id.clone(), rule.clone());
        }
        if let Some(stray) = overrides.keys().find(|id| !tables.contains_key(*id)) {
            warn!("Ignoring promotion rule for group {} outside this phase", stray);
        }

        let mut pools = promotion::resolve_promotion(&tables, &rules)?;
        for tier in Tier::ALL {
            pools.entry(tier).or_default();
        }

        info!(
            "Promotion resolved for {} groups: {}",
            groups.len(),
            pools
                .iter()
                .map(|(tier, teams)| format!("{} {}", tier, teams.len()))
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(pools)
    }

    /// Seeds and stores a fresh bracket, replacing any previous one for the tier
    pub fn seed_bracket(&self, tier: Tier, teams: &[TeamId]) -> Result<Bracket> {
        let bracket = Bracket::seed(tier, teams)?;
        self.store
            .save_bracket(&bracket)
            .with_context(|| format!("Failed to store {} bracket", tier))?;

        info!(
            "Seeded {} bracket with {} teams over {} rounds",
            tier,
            teams.len(),
            bracket.rounds()
        );
        Ok(bracket)
    }

    /// Seeds one bracket per tier pool; pools too small for a bracket are skipped
    pub fn seed_from_pools(&self, pools: &TierPools) -> Result<Vec<Bracket>> {
        let mut seeded = Vec::new();
        for (tier, teams) in pools {
            if teams.len() < 2 {
                warn!("Not seeding {} bracket: {} teams qualified", tier, teams.len());
                continue;
            }
            seeded.push(self.seed_bracket(*tier, teams)?);
        }
        Ok(seeded)
    }

    pub fn record_bracket_result(&self, tier: Tier, node: NodeId, result: MatchResult) -> Result<Bracket> {
        let (bracket, winner) = self
            .store
            .update_bracket(tier, |bracket| {
                let resolved = bracket.record_result(node, result)?;
                Ok(resolved.winner.clone())
            })
            .with_context(|| format!("Failed to record result for {} bracket node {}", tier, node))?;

        if let Some(winner) = winner {
            info!("{} bracket node {} won by {}", tier, node, winner);
        }
        if let Some(champion) = bracket.champion() {
            info!("{} bracket completed, champion {}", tier, champion);
        }
        Ok(bracket)
    }

    pub fn reset_bracket_node(&self, tier: Tier, node: NodeId) -> Result<(Bracket, Vec<NodeId>)> {
        let (bracket, invalidated) = self
            .store
            .update_bracket(tier, |bracket| bracket.reset(node))
            .with_context(|| format!("Failed to reset {} bracket node {}", tier, node))?;

        info!("{} bracket node {} reset, {} nodes invalidated", tier, node, invalidated.len());
        Ok((bracket, invalidated))
    }

    pub fn bracket(&self, tier: Tier) -> Result<Bracket> {
        self.store
            .load_bracket(tier)
            .with_context(|| format!("Failed to load {} bracket", tier))?
            .ok_or_else(|| NotFound::new("bracket", tier).into())
    }

    fn require_group(&self, id: &GroupId) -> Result<Group> {
        self.store
            .load_group(id)
            .with_context(|| format!("Failed to load group {}", id))?
            .ok_or_else(|| NotFound::new("group", id).into())
    }

    fn stored_results(&self, group: &Group) -> Result<Vec<MatchResult>> {
        self.store
            .results_for_group(&group.id)
            .with_context(|| format!("Failed to load results of group {}", group.id))
    }

    fn compute(&self, group: &Group) -> Result<Standings> {
        let results = self.stored_results(group)?;
        Ok(self.standings.compute_standings(group, &results)?)
    }
}

/// Lines `result` up with the stored fixture it settles
fn settle_fixture(group: &GroupId, stored: &[MatchResult], result: MatchResult) -> EngineResult<MatchResult> {
    let incoming = &result.fixture;
    for existing in stored.iter().map(|r| &r.fixture) {
        if existing.round != incoming.round {
            continue;
        }
        if existing.home == incoming.home && existing.away == incoming.away {
            return Ok(result);
        }
        if existing.home == incoming.away && existing.away == incoming.home {
            return Ok(result.reversed());
        }
    }

    Err(EngineError::inconsistent(
        format!("group {}", group),
        format!(
            "no fixture {} vs {} in round {}",
            incoming.home, incoming.away, incoming.round
        ),
    ))
}

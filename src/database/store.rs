use anyhow::{Context, Result};
use log::debug;
use rusqlite::TransactionBehavior;

use crate::bracket::Bracket;
use crate::config::StoreSettings;
use crate::domain::{Group, GroupId, MatchResult, Tier};
use crate::errors::{EngineResult, NotFound};
use crate::repository::{BracketStore, MatchRecordStore};

use super::connection::{DbPool, create_memory_pool, create_pool, get_connection};
use super::{brackets, groups, matches, setup};

/// SQLite-backed implementation of both store traits
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Opens the configured database file, creating missing tables
    pub fn open(settings: &StoreSettings) -> Result<Self> {
        let pool = create_pool(&settings.database_path)?;
        let store = Self::new(pool);
        store.ensure_schema()?;

        debug!("Opened store at {}", settings.database_path);
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let store = Self::new(create_memory_pool()?);
        store.ensure_schema()?;
        Ok(store)
    }

    pub fn ensure_schema(&self) -> Result<()> {
        let conn = get_connection(&self.pool)?;
        setup::ensure_schema(&conn)
    }

    pub fn reset(&self) -> Result<()> {
        let conn = get_connection(&self.pool)?;
        setup::reset_database(&conn)
    }
}

impl MatchRecordStore for SqliteStore {
    fn save_group(&self, group: &Group) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction().context("Failed to start transaction")?;

        groups::upsert_group(&tx, group)?;
        tx.commit().context("Failed to commit group")?;

        debug!("Stored group {} with {} teams", group.id, group.size());
        Ok(())
    }

    fn load_group(&self, id: &GroupId) -> Result<Option<Group>> {
        let conn = get_connection(&self.pool)?;
        groups::find_group(&conn, id)
    }

    fn list_groups(&self) -> Result<Vec<Group>> {
        let conn = get_connection(&self.pool)?;
        groups::list_groups(&conn)
    }

    fn save_result(&self, group: &GroupId, result: &MatchResult) -> Result<()> {
        let conn = get_connection(&self.pool)?;
        matches::upsert_match(&conn, group, result)
    }

    fn results_for_group(&self, group: &GroupId) -> Result<Vec<MatchResult>> {
        let conn = get_connection(&self.pool)?;
        matches::list_for_group(&conn, group)
    }
}

impl BracketStore for SqliteStore {
    fn load_bracket(&self, tier: Tier) -> Result<Option<Bracket>> {
        let conn = get_connection(&self.pool)?;
        brackets::find_bracket(&conn, tier)
    }

    fn save_bracket(&self, bracket: &Bracket) -> Result<()> {
        let conn = get_connection(&self.pool)?;
        brackets::upsert_bracket(&conn, bracket)
    }

    fn update_bracket<T, F>(&self, tier: Tier, update: F) -> Result<(Bracket, T)>
    where
        F: FnOnce(&mut Bracket) -> EngineResult<T>,
    {
        let mut conn = get_connection(&self.pool)?;
        // Take the write lock before reading so concurrent updates queue up
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("Failed to start bracket transaction")?;

        let mut bracket = brackets::find_bracket(&tx, tier)?.ok_or_else(|| NotFound::new("bracket", tier))?;
        let output = update(&mut bracket)?;

        brackets::upsert_bracket(&tx, &bracket)?;
        tx.commit().context("Failed to commit bracket update")?;

        Ok((bracket, output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::{BracketState, NodeId};
    use crate::domain::{Defaulted, Fixture, PromotionRule, Score, Team, TeamId};
    use crate::errors::EngineError;

    fn sample_group() -> Group {
        Group::new(
            "G1",
            "Group 1",
            vec![
                Team::new("B", "Beta"),
                Team::new("A", "Alpha"),
                Team::new("C", "Gamma"),
            ],
            PromotionRule::new([(1, Tier::Gold), (2, Tier::Silver)]),
        )
    }

    #[test]
    fn test_group_round_trip_keeps_roster_order() {
        let store = SqliteStore::in_memory().unwrap();
        let group = sample_group();

        store.save_group(&group).unwrap();
        assert_eq!(store.load_group(&group.id).unwrap(), Some(group.clone()));

        let mut renamed = group.clone();
        renamed.name = "Group One".to_string();
        renamed.teams.pop();
        store.save_group(&renamed).unwrap();

        assert_eq!(store.list_groups().unwrap(), vec![renamed]);
        assert_eq!(store.load_group(&GroupId::new("missing")).unwrap(), None);
    }

    #[test]
    fn test_results_upsert_per_fixture() {
        let store = SqliteStore::in_memory().unwrap();
        let group = sample_group();
        store.save_group(&group).unwrap();

        let mut fixture = Fixture::new("A".into(), "B".into(), 1);
        fixture.venue = Some("North Field".to_string());
        store.save_result(&group.id, &MatchResult::scheduled(fixture.clone())).unwrap();
        store
            .save_result(&group.id, &MatchResult::walkover(Fixture::new("C".into(), "A".into(), 2), Defaulted::Away))
            .unwrap();

        let played = MatchResult::completed(fixture, Score::new(2, 2)).with_penalties(Score::new(4, 3));
        store.save_result(&group.id, &played).unwrap();

        let results = store.results_for_group(&group.id).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], played);
        assert_eq!(results[1].status, crate::domain::MatchStatus::Walkover { defaulted: Defaulted::Away });
    }

    #[test]
    fn test_bracket_update_commits_or_rolls_back() {
        let store = SqliteStore::in_memory().unwrap();
        let teams = vec![TeamId::new("A"), TeamId::new("B"), TeamId::new("C"), TeamId::new("D")];
        store.save_bracket(&Bracket::seed(Tier::Gold, &teams).unwrap()).unwrap();

        let result = MatchResult::completed(Fixture::new("A".into(), "D".into(), 1), Score::new(1, 0));
        let (bracket, winner) = store
            .update_bracket(Tier::Gold, |b| Ok(b.record_result(NodeId(1), result)?.winner.clone()))
            .unwrap();
        assert_eq!(winner, Some(TeamId::new("A")));
        assert_eq!(bracket.state, BracketState::InProgress);

        let err = store
            .update_bracket(Tier::Gold, |b| b.record_result(NodeId(0), MatchResult::scheduled(Fixture::new("A".into(), "B".into(), 2))).map(|_| ()))
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<EngineError>(), Some(EngineError::NodeNotReady { .. })));

        assert_eq!(store.load_bracket(Tier::Gold).unwrap(), Some(bracket));
        assert!(store.load_bracket(Tier::Silver).unwrap().is_none());
    }

    #[test]
    fn test_update_of_missing_bracket() {
        let store = SqliteStore::in_memory().unwrap();
        let err = store.update_bracket(Tier::Bronze, |b| b.reset(NodeId(0))).unwrap_err();
        assert!(err.downcast_ref::<NotFound>().is_some());
    }
}

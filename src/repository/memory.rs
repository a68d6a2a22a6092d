use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Result, anyhow};

use crate::bracket::Bracket;
use crate::domain::{Group, GroupId, MatchResult, Tier};
use crate::errors::{EngineResult, NotFound};

use super::{BracketStore, MatchRecordStore};

/// Store kept entirely in process memory, used by tests and one-shot CLI runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    groups: Mutex<BTreeMap<GroupId, Group>>,
    results: Mutex<BTreeMap<GroupId, Vec<MatchResult>>>,
    brackets: Mutex<BTreeMap<Tier, Bracket>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex.lock().map_err(|_| anyhow!("Memory store lock poisoned"))
}

fn same_fixture(a: &MatchResult, b: &MatchResult) -> bool {
    a.fixture.round == b.fixture.round && a.home() == b.home() && a.away() == b.away()
}

impl MatchRecordStore for MemoryStore {
    fn save_group(&self, group: &Group) -> Result<()> {
        lock(&self.groups)?.insert(group.id.clone(), group.clone());
        Ok(())
    }

    fn load_group(&self, id: &GroupId) -> Result<Option<Group>> {
        Ok(lock(&self.groups)?.get(id).cloned())
    }

    fn list_groups(&self) -> Result<Vec<Group>> {
        Ok(lock(&self.groups)?.values().cloned().collect())
    }

    fn save_result(&self, group: &GroupId, result: &MatchResult) -> Result<()> {
        let mut results = lock(&self.results)?;
        let stored = results.entry(group.clone()).or_default();

        match stored.iter_mut().find(|existing| same_fixture(existing, result)) {
            Some(existing) => *existing = result.clone(),
            None => stored.push(result.clone()),
        }
        Ok(())
    }

    fn results_for_group(&self, group: &GroupId) -> Result<Vec<MatchResult>> {
        Ok(lock(&self.results)?.get(group).cloned().unwrap_or_default())
    }
}

impl BracketStore for MemoryStore {
    fn load_bracket(&self, tier: Tier) -> Result<Option<Bracket>> {
        Ok(lock(&self.brackets)?.get(&tier).cloned())
    }

    fn save_bracket(&self, bracket: &Bracket) -> Result<()> {
        lock(&self.brackets)?.insert(bracket.tier, bracket.clone());
        Ok(())
    }

    fn update_bracket<T, F>(&self, tier: Tier, update: F) -> Result<(Bracket, T)>
    where
        F: FnOnce(&mut Bracket) -> EngineResult<T>,
    {
        let mut brackets = lock(&self.brackets)?;
        let stored = brackets
            .get(&tier)
            .ok_or_else(|| NotFound::new("bracket", tier))?;

        let mut working = stored.clone();
        let output = update(&mut working)?;
        brackets.insert(tier, working.clone());

        Ok((working, output))
    }
}

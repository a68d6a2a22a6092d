mod memory;

use anyhow::Result;

use crate::bracket::Bracket;
use crate::domain::{Group, GroupId, MatchResult, Tier};
use crate::errors::EngineResult;

pub use memory::MemoryStore;

/// Source of groups and recorded match results.
///
/// The engine never touches a store; services load explicit inputs through
/// this trait and hand them to the pure engine functions.
pub trait MatchRecordStore {
    fn save_group(&self, group: &Group) -> Result<()>;

    fn load_group(&self, id: &GroupId) -> Result<Option<Group>>;

    fn list_groups(&self) -> Result<Vec<Group>>;

    /// Stores `result`, replacing any earlier record of the same fixture
    fn save_result(&self, group: &GroupId, result: &MatchResult) -> Result<()>;

    fn results_for_group(&self, group: &GroupId) -> Result<Vec<MatchResult>>;
}

/// Persisted bracket state, one bracket per tier
pub trait BracketStore {
    fn load_bracket(&self, tier: Tier) -> Result<Option<Bracket>>;

    fn save_bracket(&self, bracket: &Bracket) -> Result<()>;

    /// Read-modify-write of one bracket, serialized against other writers.
    ///
    /// Nothing is written when `update` fails; its error is returned inside
    /// the `anyhow::Error` so callers can still downcast it.
    fn update_bracket<T, F>(&self, tier: Tier, update: F) -> Result<(Bracket, T)>
    where
        F: FnOnce(&mut Bracket) -> EngineResult<T>;
}

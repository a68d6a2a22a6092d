mod table;
mod tiebreak;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::settings::ScoringSettings;
use crate::domain::{self, Group, GroupId, MatchResult, StandingRow};
use crate::errors::EngineResult;

use table::Tally;

/// Ranked table of one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standings {
    pub group: GroupId,
    pub rows: Vec<StandingRow>,
    /// Results still scheduled when the table was computed
    pub pending: usize,
}

impl Standings {
    pub fn is_final(&self) -> bool {
        self.pending == 0
    }
}

/// Folds match results into ranked group tables
#[derive(Debug, Clone, Default)]
pub struct StandingsEngine {
    scoring: ScoringSettings,
}

impl StandingsEngine {
    pub fn new(scoring: ScoringSettings) -> Self {
        Self { scoring }
    }

    pub fn compute_standings(&self, group: &Group, results: &[MatchResult]) -> EngineResult<Standings> {
        domain::validate_roster(group.teams.iter().map(|t| &t.id))?;

        let mut tally = Tally::new(group, &self.scoring);
        for result in results {
            tally.apply(group, result)?;
        }

        let pending = tally.pending;
        let meetings = std::mem::take(&mut tally.meetings);
        let mut rows = tally.into_rows();
        tiebreak::rank_rows(&mut rows, &meetings);

        debug!(
            "Standings for group {}: {} rows from {} counted results, {} pending",
            group.id,
            rows.len(),
            meetings.len(),
            pending
        );

        Ok(Standings {
            group: group.id.clone(),
            rows,
            pending,
        })
    }
}

use std::collections::HashSet;

use crate::errors::{EngineError, EngineResult};

use super::models::{Group, TeamId};

/// A roster needs at least two distinct teams
pub fn validate_roster<'a>(teams: impl IntoIterator<Item = &'a TeamId>) -> EngineResult<()> {
    let mut seen = HashSet::new();
    for team in teams {
        if !seen.insert(team) {
            return Err(EngineError::invalid_roster(format!("team {} appears more than once", team)));
        }
    }

    if seen.len() < 2 {
        return Err(EngineError::invalid_roster(format!(
            "at least two teams are required, got {}",
            seen.len()
        )));
    }

    Ok(())
}

/// All groups of one phase must be the same size and must not share teams
pub fn validate_phase(groups: &[Group]) -> EngineResult<()> {
    let Some(first) = groups.first() else {
        return Err(EngineError::invalid_roster("a phase needs at least one group"));
    };

    let mut owner: HashSet<&TeamId> = HashSet::new();
    for group in groups {
        if group.size() != first.size() {
            return Err(EngineError::invalid_roster(format!(
                "group {} has {} teams but group {} has {}",
                group.id,
                group.size(),
                first.id,
                first.size()
            )));
        }

        validate_roster(group.teams.iter().map(|t| &t.id))?;

        for team in &group.teams {
            if !owner.insert(&team.id) {
                return Err(EngineError::invalid_roster(format!(
                    "team {} belongs to more than one group",
                    team.id
                )));
            }
        }
    }

    Ok(())
}

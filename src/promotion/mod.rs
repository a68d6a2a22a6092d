use std::collections::{BTreeMap, HashSet};

use log::debug;

use crate::domain::{GroupId, PromotionRule, TeamId, Tier};
use crate::errors::{EngineError, EngineResult};
use crate::standings::Standings;

/// Teams promoted into each tier, group by group in ascending group id order
pub type TierPools = BTreeMap<Tier, Vec<TeamId>>;

/// Maps final group tables to knockout tiers.
///
/// Each group's rows are sliced in rank order by its rule's bands. Only decides
/// who qualifies where; seeding order belongs to the bracket.
pub fn resolve_promotion(
    standings: &BTreeMap<GroupId, Standings>,
    rules: &BTreeMap<GroupId, PromotionRule>,
) -> EngineResult<TierPools> {
    if let Some(orphan) = rules.keys().find(|group| !standings.contains_key(*group)) {
        return Err(EngineError::rule_mismatch(orphan, "rule given for a group without standings"));
    }

    let mut pools = TierPools::new();
    for (group, table) in standings {
        let rule = rules
            .get(group)
            .ok_or_else(|| EngineError::rule_mismatch(group, "no promotion rule configured"))?;

        validate_rule(group, table, rule)?;

        let mut ranked: Vec<_> = table.rows.iter().collect();
        ranked.sort_by_key(|row| row.rank);

        let mut cursor = ranked.into_iter();
        for band in &rule.bands {
            let pool = pools.entry(band.tier).or_default();
            pool.extend(cursor.by_ref().take(band.count).map(|row| row.team.clone()));
        }

        debug!("Resolved promotion for group {} over {} bands", group, rule.bands.len());
    }

    Ok(pools)
}

fn validate_rule(group: &GroupId, table: &Standings, rule: &PromotionRule) -> EngineResult<()> {
    if !table.is_final() {
        return Err(EngineError::rule_mismatch(
            group,
            format!("{} results are still pending", table.pending),
        ));
    }

    if rule.total() != table.rows.len() {
        return Err(EngineError::rule_mismatch(
            group,
            format!(
                "rule places {} teams but the group has {}",
                rule.total(),
                table.rows.len()
            ),
        ));
    }

    let mut tiers = HashSet::new();
    for band in &rule.bands {
        if !tiers.insert(band.tier) {
            return Err(EngineError::rule_mismatch(
                group,
                format!("tier {} appears in more than one band", band.tier),
            ));
        }
    }

    Ok(())
}

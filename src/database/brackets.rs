use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use crate::bracket::Bracket;
use crate::domain::Tier;
use crate::errors::{with_parse_context, with_store_context};

use super::models::BracketRow;

pub fn find_bracket(conn: &Connection, tier: Tier) -> Result<Option<Bracket>> {
    let sql = "SELECT tier, state, data, updated_at FROM brackets WHERE tier = ?1";

    let row = conn
        .query_row(sql, params![tier.as_str()], parse_bracket_row)
        .optional()
        .context("Failed to query bracket by tier")?;

    match row {
        Some(row) => {
            let bracket: Bracket = with_parse_context(serde_json::from_str(&row.data), "bracket")?;
            Ok(Some(bracket))
        }
        None => Ok(None),
    }
}

/// Stores the whole bracket, replacing the previous state of its tier
pub fn upsert_bracket(conn: &Connection, bracket: &Bracket) -> Result<()> {
    let data = with_parse_context(serde_json::to_string(bracket), "bracket")?;
    let state = with_parse_context(serde_json::to_value(bracket.state), "bracket state")?;
    let state = state.as_str().unwrap_or_default().to_string();

    let sql = "INSERT INTO brackets (tier, state, data) VALUES (?1, ?2, ?3)
               ON CONFLICT(tier) DO UPDATE SET
                   state = excluded.state,
                   data = excluded.data,
                   updated_at = CURRENT_TIMESTAMP";

    let outcome = conn.execute(sql, params![bracket.tier.as_str(), state, data]);
    with_store_context(outcome, "upsert bracket", bracket.tier.as_str()).map(|_| ())
}

fn parse_bracket_row(row: &rusqlite::Row) -> rusqlite::Result<BracketRow> {
    Ok(BracketRow {
        tier: row.get(0)?,
        state: row.get(1)?,
        data: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

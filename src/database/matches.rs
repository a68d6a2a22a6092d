use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use crate::domain::{GroupId, MatchResult};
use crate::errors::with_store_context;

use super::models::MatchRow;

/// Records a result; a fixture already stored under the same
/// (group, round, home, away) key is overwritten
pub fn upsert_match(conn: &Connection, group: &GroupId, result: &MatchResult) -> Result<()> {
    let row = MatchRow::from_result(group, result);
    let sql = "INSERT INTO matches (group_id, round, home, away, status, home_score, away_score,
                                    penalties_home, penalties_away, defaulted, venue, kickoff)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
               ON CONFLICT(group_id, round, home, away) DO UPDATE SET
                   status = excluded.status,
                   home_score = excluded.home_score,
                   away_score = excluded.away_score,
                   penalties_home = excluded.penalties_home,
                   penalties_away = excluded.penalties_away,
                   defaulted = excluded.defaulted,
                   venue = excluded.venue,
                   kickoff = excluded.kickoff,
                   updated_at = CURRENT_TIMESTAMP";

    let outcome = conn.execute(
        sql,
        params![
            row.group_id,
            row.round,
            row.home,
            row.away,
            row.status,
            row.home_score,
            row.away_score,
            row.penalties_home,
            row.penalties_away,
            row.defaulted,
            row.venue,
            row.kickoff,
        ],
    );

    with_store_context(outcome, "upsert match", group.as_str()).map(|_| ())
}

/// Every stored result of a group in round order
pub fn list_for_group(conn: &Connection, group: &GroupId) -> Result<Vec<MatchResult>> {
    let sql = "SELECT group_id, round, home, away, status, home_score, away_score,
                      penalties_home, penalties_away, defaulted, venue, kickoff
               FROM matches WHERE group_id = ?1 ORDER BY round, id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![group.as_str()], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>();
    let rows = with_store_context(rows, "list matches", group.as_str())?;

    rows.into_iter()
        .map(|row| {
            let key = format!("{} round {} {} vs {}", row.group_id, row.round, row.home, row.away);
            row.into_result().with_context(|| format!("Failed to read match {}", key))
        })
        .collect()
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<MatchRow> {
    Ok(MatchRow {
        group_id: row.get(0)?,
        round: row.get(1)?,
        home: row.get(2)?,
        away: row.get(3)?,
        status: row.get(4)?,
        home_score: row.get(5)?,
        away_score: row.get(6)?,
        penalties_home: row.get(7)?,
        penalties_away: row.get(8)?,
        defaulted: row.get(9)?,
        venue: row.get(10)?,
        kickoff: row.get(11)?,
    })
}

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use crate::domain::{Group, GroupId, PromotionRule, Team};
use crate::errors::{with_parse_context, with_store_context};

use super::models::{GroupRow, TeamRow};

/// Inserts or replaces a group together with its roster
pub fn upsert_group(conn: &Connection, group: &Group) -> Result<()> {
    let rule = with_parse_context(serde_json::to_string(&group.rule), "promotion rule")?;
    let key = group.id.as_str();

    let sql = "INSERT INTO groups (id, name, rule) VALUES (?1, ?2, ?3)
               ON CONFLICT(id) DO UPDATE SET name = excluded.name, rule = excluded.rule";
    with_store_context(conn.execute(sql, params![key, group.name, rule]), "upsert group", key)?;

    with_store_context(
        conn.execute("DELETE FROM teams WHERE group_id = ?1", params![key]),
        "clear roster",
        key,
    )?;

    let mut stmt = conn.prepare("INSERT INTO teams (group_id, id, name, position) VALUES (?1, ?2, ?3, ?4)")?;
    for (position, team) in group.teams.iter().enumerate() {
        with_store_context(
            stmt.execute(params![key, team.id.as_str(), team.name, position as i64]),
            "insert team",
            team.id.as_str(),
        )?;
    }

    Ok(())
}

pub fn find_group(conn: &Connection, id: &GroupId) -> Result<Option<Group>> {
    let sql = "SELECT id, name, rule, created_at FROM groups WHERE id = ?1";

    let row = conn
        .query_row(sql, params![id.as_str()], parse_group_row)
        .optional()
        .context("Failed to query group by id")?;

    match row {
        Some(row) => Ok(Some(assemble_group(conn, row)?)),
        None => Ok(None),
    }
}

pub fn list_groups(conn: &Connection) -> Result<Vec<Group>> {
    let sql = "SELECT id, name, rule, created_at FROM groups ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_group_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list groups")?;

    rows.into_iter().map(|row| assemble_group(conn, row)).collect()
}

fn assemble_group(conn: &Connection, row: GroupRow) -> Result<Group> {
    let rule: PromotionRule = with_parse_context(serde_json::from_str(&row.rule), "promotion rule")?;
    let teams = list_teams(conn, &row.id)?
        .into_iter()
        .map(|team| Team::new(team.id, team.name))
        .collect();

    Ok(Group::new(row.id, row.name, teams, rule))
}

fn list_teams(conn: &Connection, group_id: &str) -> Result<Vec<TeamRow>> {
    let sql = "SELECT group_id, id, name, position FROM teams WHERE group_id = ?1 ORDER BY position";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![group_id], parse_team_row)?
        .collect::<rusqlite::Result<Vec<_>>>();

    with_store_context(rows, "list teams", group_id)
}

fn parse_group_row(row: &rusqlite::Row) -> rusqlite::Result<GroupRow> {
    Ok(GroupRow {
        id: row.get(0)?,
        name: row.get(1)?,
        rule: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn parse_team_row(row: &rusqlite::Row) -> rusqlite::Result<TeamRow> {
    Ok(TeamRow {
        group_id: row.get(0)?,
        id: row.get(1)?,
        name: row.get(2)?,
        position: row.get(3)?,
    })
}

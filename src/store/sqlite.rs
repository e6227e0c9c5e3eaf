// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{columns, decode_rows, ContributionLedger, FinanceStore, Record, RecordStore};
use crate::db;
use crate::errors::RemoteError;
use crate::models::{Goal, GoalContribution, NewContribution, OwnerId};
use crate::money::coerce;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};
use std::path::Path;

/// Local SQLite backing. Column names are the serde field names.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Result<Self, RemoteError> {
        db::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open(path: &Path) -> Result<Self, RemoteError> {
        Ok(Self {
            conn: db::open_or_init(path)?,
        })
    }

    pub fn in_memory() -> Result<Self, RemoteError> {
        Ok(Self {
            conn: db::open_in_memory()?,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn order_clause<R: Record>() -> String {
    R::ORDER_BY
        .iter()
        .map(|(col, desc)| format!("{} {}", col, if *desc { "DESC" } else { "ASC" }))
        .collect::<Vec<_>>()
        .join(", ")
}

fn cell_to_json(cell: ValueRef<'_>) -> Value {
    match cell {
        ValueRef::Null | ValueRef::Blob(_) => Value::Null,
        ValueRef::Integer(i) => Value::Number(i.into()),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
    }
}

fn sql_decimal(v: &SqlValue) -> Decimal {
    coerce(&cell_to_json(ValueRef::from(v)))
}

fn json_to_sql(v: &Value) -> SqlValue {
    match v {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or(0.0)),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn list_rows<R: Record>(conn: &Connection, owner: &OwnerId) -> Result<Vec<R>, RemoteError> {
    let sql = format!(
        "SELECT * FROM {} WHERE user_id=?1 ORDER BY {}",
        R::TABLE,
        order_clause::<R>()
    );
    let mut stmt = conn.prepare(&sql)?;
    let names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
    let mut rows = stmt.query(params![owner.as_str()])?;
    let mut raw = Vec::new();
    while let Some(r) = rows.next()? {
        let mut obj = Map::new();
        for (i, name) in names.iter().enumerate() {
            obj.insert(name.clone(), cell_to_json(r.get_ref(i)?));
        }
        raw.push(Value::Object(obj));
    }
    decode_rows(raw)
}

fn insert_row(
    conn: &Connection,
    table: &'static str,
    owner: &OwnerId,
    mut cols: Map<String, Value>,
) -> Result<i64, RemoteError> {
    cols.insert("user_id".into(), Value::String(owner.to_string()));
    let names: Vec<&str> = cols.keys().map(|k| k.as_str()).collect();
    let marks = vec!["?"; names.len()].join(",");
    let sql = format!(
        "INSERT INTO {}({}) VALUES ({})",
        table,
        names.join(","),
        marks
    );
    let args: Vec<SqlValue> = cols.values().map(json_to_sql).collect();
    conn.execute(&sql, params_from_iter(args.iter()))?;
    Ok(conn.last_insert_rowid())
}

fn update_row(
    conn: &Connection,
    table: &'static str,
    owner: &OwnerId,
    id: i64,
    cols: Map<String, Value>,
) -> Result<(), RemoteError> {
    let changed = if cols.is_empty() {
        conn.query_row(
            &format!("SELECT COUNT(*) FROM {} WHERE id=?1 AND user_id=?2", table),
            params![id, owner.as_str()],
            |r| r.get::<_, i64>(0),
        )?
    } else {
        let sets: Vec<String> = cols.keys().map(|k| format!("{}=?", k)).collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id=? AND user_id=?",
            table,
            sets.join(", ")
        );
        let mut args: Vec<SqlValue> = cols.values().map(json_to_sql).collect();
        args.push(SqlValue::Integer(id));
        args.push(SqlValue::Text(owner.to_string()));
        conn.execute(&sql, params_from_iter(args.iter()))? as i64
    };
    if changed == 0 {
        return Err(RemoteError::NotFound { table, id });
    }
    Ok(())
}

fn delete_row(
    conn: &Connection,
    table: &'static str,
    owner: &OwnerId,
    id: i64,
) -> Result<(), RemoteError> {
    let n = conn.execute(
        &format!("DELETE FROM {} WHERE id=?1 AND user_id=?2", table),
        params![id, owner.as_str()],
    )?;
    if n == 0 {
        return Err(RemoteError::NotFound { table, id });
    }
    Ok(())
}

fn goal_accumulated(
    conn: &Connection,
    owner: &OwnerId,
    goal_id: i64,
) -> Result<Option<Decimal>, RemoteError> {
    let raw: Option<SqlValue> = conn
        .query_row(
            "SELECT accumulated_value FROM goals WHERE id=?1 AND user_id=?2",
            params![goal_id, owner.as_str()],
            |r| r.get(0),
        )
        .optional()?;
    Ok(raw.map(|v| sql_decimal(&v)))
}

fn set_goal_accumulated(
    conn: &Connection,
    owner: &OwnerId,
    goal_id: i64,
    value: Decimal,
) -> Result<(), RemoteError> {
    conn.execute(
        "UPDATE goals SET accumulated_value=?1 WHERE id=?2 AND user_id=?3",
        params![value.to_string(), goal_id, owner.as_str()],
    )?;
    Ok(())
}

impl<R: Record> RecordStore<R> for SqliteStore {
    fn list(&self, owner: &OwnerId) -> Result<Vec<R>, RemoteError> {
        list_rows(&self.conn, owner)
    }

    fn insert(&mut self, owner: &OwnerId, draft: &R::Draft) -> Result<i64, RemoteError> {
        let id = insert_row(&self.conn, R::TABLE, owner, columns(R::TABLE, draft)?)?;
        tracing::debug!(table = R::TABLE, id, "sqlite insert");
        Ok(id)
    }

    fn update(&mut self, owner: &OwnerId, id: i64, patch: &R::Patch) -> Result<(), RemoteError> {
        update_row(&self.conn, R::TABLE, owner, id, columns(R::TABLE, patch)?)
    }

    fn delete(&mut self, owner: &OwnerId, id: i64) -> Result<(), RemoteError> {
        delete_row(&self.conn, R::TABLE, owner, id)
    }
}

impl ContributionLedger for SqliteStore {
    fn add_contribution(
        &mut self,
        owner: &OwnerId,
        draft: &NewContribution,
    ) -> Result<i64, RemoteError> {
        let tx = self.conn.transaction()?;
        let current = goal_accumulated(&tx, owner, draft.goal_id)?.ok_or(RemoteError::NotFound {
            table: Goal::TABLE,
            id: draft.goal_id,
        })?;
        let id = insert_row(
            &tx,
            GoalContribution::TABLE,
            owner,
            columns(GoalContribution::TABLE, draft)?,
        )?;
        set_goal_accumulated(&tx, owner, draft.goal_id, current + draft.value)?;
        tx.commit()?;
        Ok(id)
    }

    fn remove_contribution(&mut self, owner: &OwnerId, id: i64) -> Result<(), RemoteError> {
        let tx = self.conn.transaction()?;
        let found: Option<(i64, SqlValue)> = tx
            .query_row(
                "SELECT goal_id, value FROM goal_contributions WHERE id=?1 AND user_id=?2",
                params![id, owner.as_str()],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?;
        let (goal_id, raw_value) = found.ok_or(RemoteError::NotFound {
            table: GoalContribution::TABLE,
            id,
        })?;
        delete_row(&tx, GoalContribution::TABLE, owner, id)?;
        if let Some(current) = goal_accumulated(&tx, owner, goal_id)? {
            let next = (current - sql_decimal(&raw_value)).max(Decimal::ZERO);
            set_goal_accumulated(&tx, owner, goal_id, next)?;
        }
        tx.commit()?;
        Ok(())
    }
}

impl FinanceStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

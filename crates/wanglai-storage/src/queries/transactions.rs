// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transaction queries and recurring-entry generation.

use std::str::FromStr;

use chrono::NaiveDate;
use wanglai_core::{DateRange, RecordId, TransactionRecord, TransactionType, WanglaiError};

use crate::database::{Database, map_tr_err};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Insert a transaction owned by `user_id`, returning its row id.
///
/// Only the first ten characters of `datetime` are stored so range queries
/// can compare plain `YYYY-MM-DD` strings.
pub async fn insert_transaction(
    db: &Database,
    user_id: &str,
    record: &TransactionRecord,
) -> Result<i64, WanglaiError> {
    let user_id = user_id.to_string();
    let category = record.category.clone();
    let amount = record.amount;
    let memo = record.memo.clone();
    let kind = record.transaction_type.to_string();
    let is_fixed = record.is_fixed;
    let datetime: String = record.datetime.chars().take(10).collect();

    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.execute(
                "INSERT INTO transactions (user_id, category, amount, memo, type, is_fixed, datetime)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![user_id, category, amount, memo, kind, is_fixed, datetime],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// All of the user's transactions dated within `range`, oldest first.
pub async fn query_transactions(
    db: &Database,
    user_id: &str,
    range: DateRange,
) -> Result<Vec<TransactionRecord>, WanglaiError> {
    let user_id = user_id.to_string();
    let start = range.start.format(DATE_FORMAT).to_string();
    let end = range.end.format(DATE_FORMAT).to_string();

    db.connection()
        .call(move |conn| -> Result<Vec<TransactionRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, category, amount, memo, type, is_fixed, datetime
                 FROM transactions
                 WHERE user_id = ?1 AND datetime >= ?2 AND datetime <= ?3
                 ORDER BY datetime ASC, id ASC",
            )?;
            let rows = stmt.query_map(rusqlite::params![user_id, start, end], row_to_record)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

fn row_to_record(row: &rusqlite::Row<'_>) -> Result<TransactionRecord, rusqlite::Error> {
    let kind: String = row.get(5)?;
    Ok(TransactionRecord {
        record_id: RecordId::Number(row.get(0)?),
        user_id: Some(row.get(1)?),
        category: row.get(2)?,
        amount: row.get(3)?,
        memo: row.get(4)?,
        // The CHECK constraint keeps this to the two known spellings.
        transaction_type: TransactionType::from_str(&kind).unwrap_or_default(),
        is_fixed: row.get(6)?,
        datetime: row.get(7)?,
        ..Default::default()
    })
}

/// Copy each fixed transaction template onto `date`.
///
/// A template is the latest fixed row per `(user_id, category, type, memo)`.
/// Templates that already have a row on `date` are skipped, so running twice
/// for the same day inserts nothing the second time.
pub async fn generate_daily_recurring(db: &Database, date: NaiveDate) -> Result<usize, WanglaiError> {
    let date = date.format(DATE_FORMAT).to_string();

    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            let tx = conn.transaction()?;
            let inserted = tx.execute(
                "INSERT INTO transactions (user_id, category, amount, memo, type, is_fixed, datetime)
                 SELECT t.user_id, t.category, t.amount, t.memo, t.type, 1, ?1
                 FROM transactions t
                 WHERE t.is_fixed = 1
                   AND t.datetime < ?1
                   AND t.id = (
                       SELECT latest.id FROM transactions latest
                       WHERE latest.is_fixed = 1
                         AND latest.user_id = t.user_id
                         AND latest.category = t.category
                         AND latest.type = t.type
                         AND latest.memo = t.memo
                       ORDER BY latest.datetime DESC, latest.id DESC
                       LIMIT 1
                   )
                   AND NOT EXISTS (
                       SELECT 1 FROM transactions same_day
                       WHERE same_day.user_id = t.user_id
                         AND same_day.category = t.category
                         AND same_day.type = t.type
                         AND same_day.memo = t.memo
                         AND same_day.datetime = ?1
                   )",
                rusqlite::params![date],
            )?;
            tx.commit()?;
            Ok(inserted)
        })
        .await
        .map_err(map_tr_err)
}

// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Category queries: system defaults, per-user hides, and user additions.

use wanglai_core::{CategoryLists, TransactionType, WanglaiError};

use crate::database::{Database, map_tr_err};

/// Add a category. `None` as owner makes it a system category.
pub async fn insert_category(
    db: &Database,
    user_id: Option<&str>,
    name: &str,
    kind: TransactionType,
) -> Result<(), WanglaiError> {
    let user_id = user_id.map(str::to_string);
    let name = name.to_string();
    let kind = kind.to_string();

    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT OR IGNORE INTO categories (user_id, name, type) VALUES (?1, ?2, ?3)",
                rusqlite::params![user_id, name, kind],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Hide a system category from one user's lists.
pub async fn hide_system_category(
    db: &Database,
    user_id: &str,
    name: &str,
) -> Result<(), WanglaiError> {
    let user_id = user_id.to_string();
    let name = name.to_string();

    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT OR IGNORE INTO category_deletions (user_id, category_name) VALUES (?1, ?2)",
                rusqlite::params![user_id, name],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// System categories not hidden by the user, then the user's own, each
/// name listed once per type.
pub async fn query_categories(db: &Database, user_id: &str) -> Result<CategoryLists, WanglaiError> {
    let user_id = user_id.to_string();

    let rows = db
        .connection()
        .call(move |conn| -> Result<Vec<(String, String)>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT c.name, c.type FROM categories c
                 WHERE c.is_deleted = 0
                   AND (c.user_id = ?1 OR (c.user_id IS NULL AND NOT EXISTS (
                       SELECT 1 FROM category_deletions d
                       WHERE d.user_id = ?1 AND d.category_name = c.name
                   )))
                 ORDER BY c.user_id IS NOT NULL, c.id",
            )?;
            let rows = stmt.query_map(rusqlite::params![user_id], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)?;

    let mut lists = CategoryLists::default();
    for (name, kind) in rows {
        let bucket = if kind == "income" {
            &mut lists.income
        } else {
            &mut lists.expense
        };
        if !bucket.contains(&name) {
            bucket.push(name);
        }
    }
    Ok(lists)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn system_categories_are_seeded() {
        let db = Database::open_in_memory().await.unwrap();
        let lists = query_categories(&db, "U1").await.unwrap();
        assert_eq!(lists.expense.first().map(String::as_str), Some("餐飲"));
        assert!(lists.income.contains(&"薪資".to_string()));
        assert!(lists.expense.contains(&"其他".to_string()));
        assert!(lists.income.contains(&"其他".to_string()));
    }

    #[tokio::test]
    async fn hides_and_user_additions_merge_without_duplicates() {
        let db = Database::open_in_memory().await.unwrap();
        hide_system_category(&db, "U1", "教育").await.unwrap();
        insert_category(&db, Some("U1"), "寵物", TransactionType::Expense).await.unwrap();
        insert_category(&db, Some("U1"), "餐飲", TransactionType::Expense).await.unwrap();
        insert_category(&db, Some("U2"), "旅遊", TransactionType::Expense).await.unwrap();

        let lists = query_categories(&db, "U1").await.unwrap();
        assert!(!lists.expense.contains(&"教育".to_string()));
        assert_eq!(lists.expense.last().map(String::as_str), Some("寵物"));
        assert_eq!(lists.expense.iter().filter(|n| *n == "餐飲").count(), 1);
        assert!(!lists.expense.contains(&"旅遊".to_string()));

        let other = query_categories(&db, "U2").await.unwrap();
        assert!(other.expense.contains(&"教育".to_string()));
    }
}

// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ledger connection: PRAGMA setup, migrations, and shutdown.
//!
//! Every statement runs on tokio-rusqlite's single background thread, so
//! writes are serialized without any locking here.

use std::path::Path;

use tracing::debug;
use wanglai_core::WanglaiError;

use crate::migrations::run_migrations;

pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> WanglaiError {
    WanglaiError::Storage {
        source: Box::new(e),
    }
}

pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path` and migrates it.
    pub async fn open(path: &str) -> Result<Self, WanglaiError> {
        if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| WanglaiError::Storage {
                source: Box::new(e),
            })?;
        }
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| WanglaiError::Storage {
                source: Box::new(e),
            })?;
        Self::prepare(conn, true).await
    }

    /// A migrated, private in-memory database.
    pub async fn open_in_memory() -> Result<Self, WanglaiError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| WanglaiError::Storage {
                source: Box::new(e),
            })?;
        Self::prepare(conn, false).await
    }

    async fn prepare(conn: tokio_rusqlite::Connection, wal: bool) -> Result<Self, WanglaiError> {
        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            if wal {
                let mode: String =
                    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
                debug!(%mode, "journal mode set");
                conn.pragma_update(None, "synchronous", "NORMAL")?;
            }
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.pragma_update(None, "busy_timeout", 5000)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| Ok::<_, rusqlite::Error>(run_migrations(conn)))
            .await
            .map_err(map_tr_err)??;

        Ok(Self { conn })
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Flushes the WAL into the main database file.
    pub async fn checkpoint(&self) -> Result<(), WanglaiError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    pub async fn close(self) -> Result<(), WanglaiError> {
        self.checkpoint().await?;
        self.conn.close().await.map_err(|e| WanglaiError::Storage {
            source: Box::new(e),
        })
    }
}

// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite ledger for the Wanglai bookkeeping bot.
//!
//! WAL-mode SQLite with embedded refinery migrations, a single background
//! connection via `tokio-rusqlite`, and typed queries for transactions,
//! categories, and daily recurring entries.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;

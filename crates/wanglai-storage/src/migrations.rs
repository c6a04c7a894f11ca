// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ledger schema migrations, embedded at build time.

use wanglai_core::WanglaiError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Applies every pending migration; refinery records progress in
/// `refinery_schema_history`.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), WanglaiError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(|e| WanglaiError::Storage {
            source: Box::new(e),
        })?;
    for migration in report.applied_migrations() {
        tracing::debug!(name = migration.name(), version = migration.version(), "migration applied");
    }
    Ok(())
}

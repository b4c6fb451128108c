//! Ordered schema scripts for the Bitácora database.
//!
//! | version | script | adds |
//! |---|---|---|
//! | 1 | `0001_init.sql` | `projects`, `sessions` |
//! | 2 | `0002_agenda_and_share_tokens.sql` | `next_sessions`, `client_tokens` |
//!
//! Versions are contiguous from 1. An upgrade runs every pending script in one
//! transaction and stamps `PRAGMA user_version` after each.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "init",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "agenda_and_share_tokens",
        sql: include_str!("0002_agenda_and_share_tokens.sql"),
    },
];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` up to `latest_version()`.
///
/// Returns how many scripts ran; zero for an up-to-date database.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is ahead of this build.
/// - `Migration` naming the script that failed; nothing is applied.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    let db_version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let latest_supported = latest_version();
    if db_version > latest_supported {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        });
    }

    let pending = pending(db_version);
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for migration in pending {
        tx.execute_batch(migration.sql)
            .and_then(|()| {
                tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))
            })
            .map_err(|source| DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            })?;
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    Ok(pending.len())
}

fn pending(db_version: u32) -> &'static [Migration] {
    let applied = MIGRATIONS
        .iter()
        .take_while(|migration| migration.version <= db_version)
        .count();
    &MIGRATIONS[applied..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_are_contiguous_from_one() {
        for (index, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(migration.version as usize, index + 1);
        }
    }

    #[test]
    fn pending_skips_applied_versions() {
        assert_eq!(pending(0).len(), MIGRATIONS.len());
        assert_eq!(pending(1)[0].version, 2);
        assert!(pending(latest_version()).is_empty());
    }

    #[test]
    fn second_run_applies_nothing() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(apply_migrations(&mut conn).unwrap(), MIGRATIONS.len());
        assert_eq!(apply_migrations(&mut conn).unwrap(), 0);
    }
}

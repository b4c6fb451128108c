//! Client share token persistence.
//!
//! # Invariants
//! - `find_valid_token` only returns tokens for which
//!   `ClientToken::is_valid_at` holds at the given instant.

use crate::model::project::ClientToken;
use crate::repo::{bool_to_int, ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

pub trait ClientTokenRepository {
    fn insert_token(&self, token: &ClientToken) -> RepoResult<()>;
    fn find_valid_token(&self, token: &str, now_ms: i64) -> RepoResult<Option<ClientToken>>;
    fn deactivate_token(&self, token: &str) -> RepoResult<()>;
}

pub struct SqliteClientTokenRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteClientTokenRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ClientTokenRepository for SqliteClientTokenRepository<'_> {
    fn insert_token(&self, token: &ClientToken) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO client_tokens (token, project_uuid, client_name, active, expires_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                token.token.as_str(),
                token.project_id.to_string(),
                token.client_name.as_str(),
                bool_to_int(token.active),
                token.expires_at,
                token.created_at,
            ],
        )?;
        Ok(())
    }

    fn find_valid_token(&self, token: &str, now_ms: i64) -> RepoResult<Option<ClientToken>> {
        let row = self
            .conn
            .query_row(
                "SELECT token, project_uuid, client_name, active, expires_at, created_at
                 FROM client_tokens
                 WHERE token = ?1;",
                [token.trim()],
                |row| {
                    Ok((
                        row.get::<_, String>("token")?,
                        row.get::<_, String>("project_uuid")?,
                        row.get::<_, String>("client_name")?,
                        row.get::<_, i64>("active")?,
                        row.get::<_, i64>("expires_at")?,
                        row.get::<_, i64>("created_at")?,
                    ))
                },
            )
            .optional()?;

        let Some((token, project_text, client_name, active, expires_at, created_at)) = row else {
            return Ok(None);
        };
        let client_token = ClientToken {
            token,
            project_id: parse_uuid(&project_text, "client_tokens.project_uuid")?,
            client_name,
            active: active == 1,
            expires_at,
            created_at,
        };
        Ok(client_token
            .is_valid_at(now_ms)
            .then_some(client_token))
    }

    fn deactivate_token(&self, token: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE client_tokens SET active = 0 WHERE token = ?1;",
            [token.trim()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound("client token".to_string()));
        }
        Ok(())
    }
}

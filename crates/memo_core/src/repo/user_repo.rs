//! User repository contract and SQLite implementation.

use crate::model::user::{NewUser, Role, User, UserId};
use crate::repo::{ensure_schema, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

const USER_COLUMNS: &[&str] = &["id", "username", "nickname", "role", "created_ts"];

pub trait UserRepository {
    /// Persists one user and returns the stored record.
    fn create_user(&self, user: &NewUser) -> RepoResult<User>;
    /// Gets one user by id.
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
}

/// SQLite-backed user store.
#[derive(Clone, Copy)]
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn, &[("user", USER_COLUMNS)])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &NewUser) -> RepoResult<User> {
        self.conn.execute(
            "INSERT INTO user (username, nickname, role) VALUES (?1, ?2, ?3);",
            params![
                user.username.as_str(),
                user.nickname.as_str(),
                user.role.as_str()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_user(id)?
            .ok_or_else(|| RepoError::InvalidData(format!("user {id} missing after insert")))
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, username, nickname, role, created_ts
                 FROM user
                 WHERE id = ?1;",
                [id],
                |row| {
                    Ok((
                        row.get::<_, UserId>("id")?,
                        row.get::<_, String>("username")?,
                        row.get::<_, String>("nickname")?,
                        row.get::<_, String>("role")?,
                        row.get::<_, i64>("created_ts")?,
                    ))
                },
            )
            .optional()?;

        let Some((id, username, nickname, role_text, created_ts)) = row else {
            return Ok(None);
        };
        let role = Role::parse(&role_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid role `{role_text}` in user.role"))
        })?;

        Ok(Some(User {
            id,
            username,
            nickname,
            role,
            created_ts,
        }))
    }
}

//! Memo/relation repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide memo persistence and point lookups.
//! - Own memo relation writes and relation queries.
//! - Offer a single-transaction write for a memo plus its relation.
//!
//! # Invariants
//! - `create_memo_with_relation` never leaves a memo without its relation.
//! - Relation listing follows storage insertion order (rowid ascending).
//! - Hard-deleting a memo leaves its relation rows in place.

use crate::model::memo::{Memo, MemoId, NewMemo, Visibility};
use crate::model::relation::{MemoRelation, MemoRelationType};
use crate::repo::{ensure_schema, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const MEMO_COLUMNS: &[&str] = &[
    "id",
    "uid",
    "creator_id",
    "created_ts",
    "updated_ts",
    "content",
    "visibility",
    "parent_id",
];
const RELATION_COLUMNS: &[&str] = &["memo_id", "related_memo_id", "type"];

const MEMO_SELECT_SQL: &str = "SELECT
    id,
    uid,
    creator_id,
    created_ts,
    updated_ts,
    content,
    visibility,
    parent_id
FROM memo";

/// Point-lookup filter for memos. Set fields are combined with `AND`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindMemo {
    pub id: Option<MemoId>,
    pub uid: Option<String>,
}

impl FindMemo {
    pub fn by_id(id: MemoId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_uid(uid: impl Into<String>) -> Self {
        Self {
            uid: Some(uid.into()),
            ..Self::default()
        }
    }
}

/// Relation query filter. Set fields are combined with `AND`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindMemoRelation {
    pub memo_id: Option<MemoId>,
    pub related_memo_id: Option<MemoId>,
    pub kind: Option<MemoRelationType>,
}

/// Repository interface over memos and memo relations.
pub trait MemoRepository {
    /// Persists one memo and returns the stored record.
    fn create_memo(&self, memo: &NewMemo) -> RepoResult<Memo>;
    /// Persists one memo and a `kind` relation to `related_memo_id` atomically.
    fn create_memo_with_relation(
        &self,
        memo: &NewMemo,
        related_memo_id: MemoId,
        kind: MemoRelationType,
    ) -> RepoResult<Memo>;
    /// Gets one memo matching `find`.
    fn get_memo(&self, find: &FindMemo) -> RepoResult<Option<Memo>>;
    /// Hard-deletes one memo row. Relation rows are not touched.
    fn delete_memo(&self, id: MemoId) -> RepoResult<()>;
    /// Inserts a relation, or keeps the existing identical one.
    fn upsert_memo_relation(&self, relation: &MemoRelation) -> RepoResult<MemoRelation>;
    /// Lists relations matching `find` in storage insertion order.
    fn list_memo_relations(&self, find: &FindMemoRelation) -> RepoResult<Vec<MemoRelation>>;
}

/// SQLite-backed memo store.
#[derive(Clone, Copy)]
pub struct SqliteMemoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemoRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(
            conn,
            &[("memo", MEMO_COLUMNS), ("memo_relation", RELATION_COLUMNS)],
        )?;
        Ok(Self { conn })
    }
}

impl MemoRepository for SqliteMemoRepository<'_> {
    fn create_memo(&self, memo: &NewMemo) -> RepoResult<Memo> {
        memo.validate()?;
        let id = insert_memo(self.conn, memo)?;
        load_memo(self.conn, &FindMemo::by_id(id))?
            .ok_or_else(|| RepoError::InvalidData(format!("memo {id} missing after insert")))
    }

    fn create_memo_with_relation(
        &self,
        memo: &NewMemo,
        related_memo_id: MemoId,
        kind: MemoRelationType,
    ) -> RepoResult<Memo> {
        memo.validate()?;

        // Dropping `tx` on any early return rolls both writes back.
        let tx = self.conn.unchecked_transaction()?;
        let id = insert_memo(&tx, memo)?;
        upsert_relation(
            &tx,
            &MemoRelation {
                memo_id: id,
                related_memo_id,
                kind,
            },
        )?;
        let created = load_memo(&tx, &FindMemo::by_id(id))?
            .ok_or_else(|| RepoError::InvalidData(format!("memo {id} missing after insert")))?;
        tx.commit()?;

        Ok(created)
    }

    fn get_memo(&self, find: &FindMemo) -> RepoResult<Option<Memo>> {
        load_memo(self.conn, find)
    }

    fn delete_memo(&self, id: MemoId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM memo WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "memo", id });
        }
        Ok(())
    }

    fn upsert_memo_relation(&self, relation: &MemoRelation) -> RepoResult<MemoRelation> {
        upsert_relation(self.conn, relation)?;
        Ok(*relation)
    }

    fn list_memo_relations(&self, find: &FindMemoRelation) -> RepoResult<Vec<MemoRelation>> {
        let mut sql = String::from(
            "SELECT memo_id, related_memo_id, type
             FROM memo_relation
             WHERE 1 = 1",
        );
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(memo_id) = find.memo_id {
            sql.push_str(" AND memo_id = ?");
            bind_values.push(Value::Integer(memo_id));
        }
        if let Some(related_memo_id) = find.related_memo_id {
            sql.push_str(" AND related_memo_id = ?");
            bind_values.push(Value::Integer(related_memo_id));
        }
        if let Some(kind) = find.kind {
            sql.push_str(" AND type = ?");
            bind_values.push(Value::Text(kind.as_str().to_string()));
        }
        sql.push_str(" ORDER BY rowid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut relations = Vec::new();
        while let Some(row) = rows.next()? {
            let type_text: String = row.get("type")?;
            let kind = MemoRelationType::parse(&type_text).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid relation type `{type_text}` in memo_relation.type"
                ))
            })?;
            relations.push(MemoRelation {
                memo_id: row.get("memo_id")?,
                related_memo_id: row.get("related_memo_id")?,
                kind,
            });
        }

        Ok(relations)
    }
}

fn insert_memo(conn: &Connection, memo: &NewMemo) -> RepoResult<MemoId> {
    conn.execute(
        "INSERT INTO memo (
            uid,
            creator_id,
            content,
            visibility,
            parent_id
        ) VALUES (?1, ?2, ?3, ?4, ?5);",
        params![
            memo.uid.as_str(),
            memo.creator_id,
            memo.content.as_str(),
            memo.visibility.as_str(),
            memo.parent_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn upsert_relation(conn: &Connection, relation: &MemoRelation) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO memo_relation (memo_id, related_memo_id, type)
         VALUES (?1, ?2, ?3)
         ON CONFLICT (memo_id, related_memo_id, type) DO NOTHING;",
        params![
            relation.memo_id,
            relation.related_memo_id,
            relation.kind.as_str(),
        ],
    )?;
    Ok(())
}

fn load_memo(conn: &Connection, find: &FindMemo) -> RepoResult<Option<Memo>> {
    let mut sql = format!("{MEMO_SELECT_SQL} WHERE 1 = 1");
    let mut bind_values: Vec<Value> = Vec::new();

    if let Some(id) = find.id {
        sql.push_str(" AND id = ?");
        bind_values.push(Value::Integer(id));
    }
    if let Some(uid) = find.uid.as_ref() {
        sql.push_str(" AND uid = ?");
        bind_values.push(Value::Text(uid.clone()));
    }
    sql.push_str(" LIMIT 1");

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(bind_values))?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_memo_row(row)?)),
        None => Ok(None),
    }
}

fn parse_memo_row(row: &Row<'_>) -> RepoResult<Memo> {
    let visibility_text: String = row.get("visibility")?;
    let visibility = Visibility::parse(&visibility_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid visibility `{visibility_text}` in memo.visibility"
        ))
    })?;

    Ok(Memo {
        id: row.get("id")?,
        uid: row.get("uid")?,
        creator_id: row.get("creator_id")?,
        created_ts: row.get("created_ts")?,
        updated_ts: row.get("updated_ts")?,
        content: row.get("content")?,
        visibility,
        parent_id: row.get("parent_id")?,
    })
}

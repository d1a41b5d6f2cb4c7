//! Memo and comment use-case service.
//!
//! # Responsibility
//! - Create top-level memos and comments on existing memos.
//! - List the comments attached to a parent memo.
//! - Derive plain-text snippets from markdown content.
//!
//! # Invariants
//! - Comments are always `Visibility::Private` and carry `parent_id`.
//! - A comment and its `comment` relation are persisted in one transaction.
//! - Comment listing keeps the relation query order and skips relations whose
//!   comment memo no longer exists.
//! - Log events carry ids only, never memo content.

use crate::model::memo::{Memo, MemoId, NewMemo, Visibility};
use crate::model::relation::MemoRelationType;
use crate::model::user::User;
use crate::repo::memo_repo::{FindMemo, FindMemoRelation, MemoRepository};
use crate::repo::{RepoError, RepoResult};
use log::{error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const SNIPPET_MAX_CHARS: usize = 64;

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)]+)\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\*_`#>~\-\[\]\(\)!]+"#).expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Service error for memo use-cases.
#[derive(Debug)]
pub enum MemoServiceError {
    /// Memo addressed by uid does not exist.
    MemoNotFound(String),
    /// Relations were listed but one comment memo could not be read.
    CommentLookup { memo_id: MemoId, source: RepoError },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for MemoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemoNotFound(uid) => write!(f, "memo not found: {uid}"),
            Self::CommentLookup { memo_id, source } => {
                write!(f, "comment memo {memo_id}: {source}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MemoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::CommentLookup { source, .. } => Some(source),
            Self::MemoNotFound(_) => None,
        }
    }
}

impl From<RepoError> for MemoServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Memo service facade over repository implementations.
pub struct MemoService<R: MemoRepository> {
    repo: R,
}

impl<R: MemoRepository> MemoService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one top-level memo owned by `creator`.
    pub fn create_memo(
        &self,
        creator: &User,
        content: impl Into<String>,
        visibility: Visibility,
    ) -> RepoResult<Memo> {
        let mut memo = NewMemo::new(creator.id, content);
        memo.visibility = visibility;
        let created = self.repo.create_memo(&memo)?;
        info!(
            "event=memo_create module=service status=ok memo_id={} creator_id={}",
            created.id, created.creator_id
        );
        Ok(created)
    }

    /// Gets one memo by its external uid.
    pub fn get_memo_by_uid(&self, uid: &str) -> RepoResult<Option<Memo>> {
        self.repo.get_memo(&FindMemo::by_uid(uid))
    }

    /// Gets one memo by its internal id.
    pub fn get_memo_by_id(&self, id: MemoId) -> RepoResult<Option<Memo>> {
        self.repo.get_memo(&FindMemo::by_id(id))
    }

    /// Gets one memo by uid, reporting absence as an error.
    pub fn require_memo(&self, uid: &str) -> Result<Memo, MemoServiceError> {
        self.get_memo_by_uid(uid)?
            .ok_or_else(|| MemoServiceError::MemoNotFound(uid.to_string()))
    }

    /// Creates a private comment on `parent` authored by `creator`.
    ///
    /// Content is stored as given. The comment memo and its `comment`
    /// relation are written together; on failure neither is kept.
    pub fn create_comment(
        &self,
        parent: &Memo,
        creator: &User,
        content: impl Into<String>,
    ) -> RepoResult<Memo> {
        let comment = NewMemo::comment(creator.id, content, parent.id);
        match self
            .repo
            .create_memo_with_relation(&comment, parent.id, MemoRelationType::Comment)
        {
            Ok(created) => {
                info!(
                    "event=comment_create module=service status=ok memo_id={} parent_id={} creator_id={}",
                    created.id, parent.id, creator.id
                );
                Ok(created)
            }
            Err(err) => {
                error!(
                    "event=comment_create module=service status=error parent_id={} creator_id={} error={}",
                    parent.id, creator.id, err
                );
                Err(err)
            }
        }
    }

    /// Lists comments attached to `parent` in relation query order.
    ///
    /// Relations whose comment memo is gone are skipped. A failed relation
    /// query is `Repo`; a failed comment read is `CommentLookup`.
    pub fn list_comments(&self, parent: &Memo) -> Result<Vec<Memo>, MemoServiceError> {
        let relations = self.repo.list_memo_relations(&FindMemoRelation {
            related_memo_id: Some(parent.id),
            kind: Some(MemoRelationType::Comment),
            ..FindMemoRelation::default()
        })?;

        let mut comments = Vec::with_capacity(relations.len());
        for relation in relations {
            let found = self.get_memo_by_id(relation.memo_id).map_err(|source| {
                MemoServiceError::CommentLookup {
                    memo_id: relation.memo_id,
                    source,
                }
            })?;
            match found {
                Some(comment) => comments.push(comment),
                None => warn!(
                    "event=comment_list module=service status=skip reason=dangling_relation parent_id={} memo_id={}",
                    parent.id, relation.memo_id
                ),
            }
        }
        Ok(comments)
    }

    /// Hard-deletes one memo. Relation rows pointing at it are kept.
    pub fn delete_memo(&self, id: MemoId) -> RepoResult<()> {
        self.repo.delete_memo(id)?;
        info!("event=memo_delete module=service status=ok memo_id={id}");
        Ok(())
    }
}

/// Derives a plain-text snippet from markdown content.
///
/// Images are dropped, links keep their label, markdown symbols are removed,
/// whitespace is collapsed and the result is capped at 64 chars.
pub fn derive_snippet(content: &str) -> String {
    let without_images = MARKDOWN_IMAGE_RE.replace_all(content, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_links, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    normalized.trim().chars().take(SNIPPET_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::derive_snippet;

    #[test]
    fn snippet_drops_images_and_keeps_link_labels() {
        let snippet = derive_snippet("see ![cover](a.png) [docs](https://example.com)");
        assert_eq!(snippet, "see docs");
    }

    #[test]
    fn snippet_strips_markdown_symbols_and_limits_length() {
        let source = format!("# title\n\n**bold** `code` {}", "x".repeat(200));
        let snippet = derive_snippet(&source);
        assert!(!snippet.contains('#'));
        assert!(!snippet.contains('*'));
        assert!(snippet.starts_with("title bold code"));
        assert_eq!(snippet.chars().count(), 64);
    }

    #[test]
    fn snippet_of_blank_content_is_empty() {
        assert_eq!(derive_snippet("  \n\t "), "");
    }
}

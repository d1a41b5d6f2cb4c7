//! Memo domain model.
//!
//! # Responsibility
//! - Define the persisted memo record and its write shape.
//! - Own the uid format shared by storage and resource names.
//!
//! # Invariants
//! - `uid` is stable and never reused for another memo.
//! - `uid` matches `UID_PATTERN` before it reaches storage.
//! - `parent_id` is set only for comments.

use crate::model::user::UserId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Store-assigned numeric identifier of a memo.
pub type MemoId = i64;

/// Accepted shape of an externally visible memo uid.
pub const UID_PATTERN: &str = r"^[a-zA-Z0-9]([a-zA-Z0-9-]{0,30}[a-zA-Z0-9])?$";

static UID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(UID_PATTERN).expect("valid uid regex"));

/// Returns whether `value` is an acceptable memo uid.
pub fn is_valid_uid(value: &str) -> bool {
    UID_RE.is_match(value)
}

/// Generates a fresh globally unique memo uid.
pub fn generate_uid() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Who can read a memo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Creator only. Comments are always private.
    #[default]
    Private,
    /// Any signed-in user.
    Protected,
    /// Anyone.
    Public,
}

impl Visibility {
    /// Storage/text form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Protected => "protected",
            Self::Public => "public",
        }
    }

    /// Parses the storage/text form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "private" => Some(Self::Private),
            "protected" => Some(Self::Protected),
            "public" => Some(Self::Public),
            _ => None,
        }
    }
}

/// Persisted memo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    pub id: MemoId,
    pub uid: String,
    pub creator_id: UserId,
    /// Unix epoch seconds.
    pub created_ts: i64,
    /// Unix epoch seconds.
    pub updated_ts: i64,
    pub content: String,
    pub visibility: Visibility,
    /// Internal id of the parent memo when this memo is a comment.
    pub parent_id: Option<MemoId>,
}

impl Memo {
    /// Returns whether this memo is attached to a parent as a comment.
    pub fn is_comment(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Write shape for a memo that has not been persisted yet.
///
/// Storage assigns `id` and both timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMemo {
    pub uid: String,
    pub creator_id: UserId,
    pub content: String,
    pub visibility: Visibility,
    pub parent_id: Option<MemoId>,
}

impl NewMemo {
    /// Creates a private top-level memo with a freshly generated uid.
    pub fn new(creator_id: UserId, content: impl Into<String>) -> Self {
        Self {
            uid: generate_uid(),
            creator_id,
            content: content.into(),
            visibility: Visibility::Private,
            parent_id: None,
        }
    }

    /// Creates a comment on `parent_id`.
    ///
    /// Visibility is forced to private regardless of the parent.
    pub fn comment(creator_id: UserId, content: impl Into<String>, parent_id: MemoId) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::new(creator_id, content)
        }
    }

    /// Validates fields that storage cannot check on its own.
    pub fn validate(&self) -> Result<(), MemoValidationError> {
        if !is_valid_uid(&self.uid) {
            return Err(MemoValidationError::InvalidUid(self.uid.clone()));
        }
        Ok(())
    }
}

/// Validation failure for memo writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoValidationError {
    InvalidUid(String),
}

impl Display for MemoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUid(uid) => write!(f, "invalid memo uid: `{uid}`"),
        }
    }
}

impl Error for MemoValidationError {}

#[cfg(test)]
mod tests {
    use super::{generate_uid, is_valid_uid, NewMemo, Visibility};

    #[test]
    fn generated_uids_are_valid_and_distinct() {
        let first = generate_uid();
        let second = generate_uid();
        assert!(is_valid_uid(&first));
        assert!(is_valid_uid(&second));
        assert_ne!(first, second);
    }

    #[test]
    fn uid_pattern_rejects_edge_dashes_and_slashes() {
        assert!(is_valid_uid("p1"));
        assert!(is_valid_uid("a-b"));
        assert!(!is_valid_uid(""));
        assert!(!is_valid_uid("-p1"));
        assert!(!is_valid_uid("p1-"));
        assert!(!is_valid_uid("p/1"));
        assert!(!is_valid_uid(&"a".repeat(33)));
    }

    #[test]
    fn comment_is_private_with_parent_link() {
        let comment = NewMemo::comment(7, "hi", 42);
        assert_eq!(comment.visibility, Visibility::Private);
        assert_eq!(comment.parent_id, Some(42));
        assert_eq!(comment.creator_id, 7);
        assert!(comment.validate().is_ok());
    }

    #[test]
    fn validate_rejects_malformed_uid() {
        let mut memo = NewMemo::new(1, "body");
        memo.uid = "bad uid".to_string();
        assert!(memo.validate().is_err());
    }
}

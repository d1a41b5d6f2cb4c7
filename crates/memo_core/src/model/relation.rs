//! Memo relation model.
//!
//! A relation is a typed edge `memo_id -> related_memo_id`. For comments the
//! source is the comment and the related side is the parent.

use crate::model::memo::MemoId;
use serde::{Deserialize, Serialize};

/// Relation kinds known by storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoRelationType {
    /// Source memo links to the related memo.
    Reference,
    /// Source memo is a comment on the related memo.
    Comment,
}

impl MemoRelationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Comment => "comment",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "reference" => Some(Self::Reference),
            "comment" => Some(Self::Comment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoRelation {
    pub memo_id: MemoId,
    pub related_memo_id: MemoId,
    #[serde(rename = "type")]
    pub kind: MemoRelationType,
}

impl MemoRelation {
    /// Relation marking `comment_id` as a comment on `parent_id`.
    pub fn comment(comment_id: MemoId, parent_id: MemoId) -> Self {
        Self {
            memo_id: comment_id,
            related_memo_id: parent_id,
            kind: MemoRelationType::Comment,
        }
    }
}

//! Wire messages of the v1 surface.
//!
//! JSON field names are camelCase and enum values SCREAMING_SNAKE_CASE,
//! matching the protobuf JSON mapping the clients expect.

use memo_core::Visibility as StoreVisibility;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    Private,
    Protected,
    Public,
}

impl From<StoreVisibility> for Visibility {
    fn from(value: StoreVisibility) -> Self {
        match value {
            StoreVisibility::Private => Self::Private,
            StoreVisibility::Protected => Self::Protected,
            StoreVisibility::Public => Self::Public,
        }
    }
}

impl From<Visibility> for StoreVisibility {
    fn from(value: Visibility) -> Self {
        match value {
            Visibility::Private => Self::Private,
            Visibility::Protected => Self::Protected,
            Visibility::Public => Self::Public,
        }
    }
}

/// Memo as seen by clients. Comments use the same message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memo {
    /// `memos/{uid}`.
    pub name: String,
    pub uid: String,
    /// `users/{id}`.
    pub creator: String,
    /// Unix epoch seconds.
    pub create_time: i64,
    /// Unix epoch seconds.
    pub update_time: i64,
    pub content: String,
    pub snippet: String,
    pub visibility: Visibility,
    /// `memos/{uid}` of the parent when this memo is a comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// Client-supplied memo fields on create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoDraft {
    #[serde(default)]
    pub content: String,
    /// Ignored for comments, which are always private.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

impl MemoDraft {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            visibility: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMemoRequest {
    pub memo: MemoDraft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetMemoRequest {
    /// `memos/{uid}`.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMemoCommentRequest {
    /// `memos/{uid}` of the memo being commented on.
    pub parent: String,
    pub comment: MemoDraft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMemoCommentsRequest {
    /// `memos/{uid}` of the memo whose comments are listed.
    pub parent: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMemoCommentsResponse {
    /// Always present; empty when the parent has no comments.
    pub comments: Vec<Memo>,
}

#[cfg(test)]
mod tests {
    use super::{CreateMemoCommentRequest, ListMemoCommentsResponse, Memo, Visibility};

    #[test]
    fn memo_serializes_with_camel_case_fields_and_screaming_enums() {
        let memo = Memo {
            name: "memos/c1".to_string(),
            uid: "c1".to_string(),
            creator: "users/1".to_string(),
            create_time: 10,
            update_time: 11,
            content: "hello".to_string(),
            snippet: "hello".to_string(),
            visibility: Visibility::Private,
            parent: Some("memos/p1".to_string()),
        };
        let json = serde_json::to_value(&memo).unwrap();
        assert_eq!(json["createTime"], 10);
        assert_eq!(json["visibility"], "PRIVATE");
        assert_eq!(json["parent"], "memos/p1");
    }

    #[test]
    fn top_level_memo_omits_parent() {
        let memo = Memo {
            name: "memos/p1".to_string(),
            uid: "p1".to_string(),
            creator: "users/1".to_string(),
            create_time: 0,
            update_time: 0,
            content: String::new(),
            snippet: String::new(),
            visibility: Visibility::Public,
            parent: None,
        };
        let json = serde_json::to_value(&memo).unwrap();
        assert!(json.get("parent").is_none());
    }

    #[test]
    fn create_comment_request_parses_minimal_body() {
        let request: CreateMemoCommentRequest =
            serde_json::from_str(r#"{"parent":"memos/p1","comment":{"content":"hi"}}"#).unwrap();
        assert_eq!(request.parent, "memos/p1");
        assert_eq!(request.comment.content, "hi");
        assert_eq!(request.comment.visibility, None);
    }

    #[test]
    fn empty_list_response_still_carries_comments_field() {
        let json = serde_json::to_string(&ListMemoCommentsResponse::default()).unwrap();
        assert_eq!(json, r#"{"comments":[]}"#);
    }
}

//! Resource-name parsing and formatting.
//!
//! Names have the shape `{collection}/{id}`: `memos/{uid}` and `users/{id}`.

use memo_core::model::memo::is_valid_uid;
use memo_core::UserId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const MEMO_NAME_PREFIX: &str = "memos";
pub const USER_NAME_PREFIX: &str = "users";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceNameError {
    /// Name is not `{prefix}/{id}`.
    InvalidFormat { name: String, prefix: &'static str },
    /// Identifier segment does not match the expected shape.
    InvalidId(String),
}

impl Display for ResourceNameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormat { name, prefix } => {
                write!(f, "invalid resource name `{name}`; expected `{prefix}/{{id}}`")
            }
            Self::InvalidId(id) => write!(f, "invalid resource id `{id}`"),
        }
    }
}

impl Error for ResourceNameError {}

/// Extracts the memo uid from `memos/{uid}`.
pub fn extract_memo_uid_from_name(name: &str) -> Result<String, ResourceNameError> {
    let uid = name_id_segment(name, MEMO_NAME_PREFIX)?;
    if !is_valid_uid(uid) {
        return Err(ResourceNameError::InvalidId(uid.to_string()));
    }
    Ok(uid.to_string())
}

/// Extracts the numeric user id from `users/{id}`.
pub fn extract_user_id_from_name(name: &str) -> Result<UserId, ResourceNameError> {
    let segment = name_id_segment(name, USER_NAME_PREFIX)?;
    segment
        .parse::<UserId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ResourceNameError::InvalidId(segment.to_string()))
}

pub fn memo_name(uid: &str) -> String {
    format!("{MEMO_NAME_PREFIX}/{uid}")
}

pub fn user_name(id: UserId) -> String {
    format!("{USER_NAME_PREFIX}/{id}")
}

fn name_id_segment<'a>(name: &'a str, prefix: &'static str) -> Result<&'a str, ResourceNameError> {
    let invalid = || ResourceNameError::InvalidFormat {
        name: name.to_string(),
        prefix,
    };
    match name.split_once('/') {
        Some((head, id)) if head == prefix && !id.is_empty() && !id.contains('/') => Ok(id),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        extract_memo_uid_from_name, extract_user_id_from_name, memo_name, user_name,
        ResourceNameError,
    };

    #[test]
    fn memo_names_roundtrip() {
        assert_eq!(extract_memo_uid_from_name("memos/p1").unwrap(), "p1");
        assert_eq!(memo_name("p1"), "memos/p1");
    }

    #[test]
    fn memo_name_rejects_wrong_shapes() {
        for name in ["", "memos", "memos/", "users/p1", "memos/p1/comments", "p1", "/p1"] {
            assert!(
                matches!(
                    extract_memo_uid_from_name(name),
                    Err(ResourceNameError::InvalidFormat { .. })
                ),
                "{name} should be rejected as malformed"
            );
        }
    }

    #[test]
    fn memo_name_rejects_bad_uid() {
        assert_eq!(
            extract_memo_uid_from_name("memos/-p1"),
            Err(ResourceNameError::InvalidId("-p1".to_string()))
        );
        assert!(extract_memo_uid_from_name("memos/with space").is_err());
    }

    #[test]
    fn user_names_parse_positive_ids_only() {
        assert_eq!(extract_user_id_from_name("users/42").unwrap(), 42);
        assert_eq!(user_name(42), "users/42");
        assert!(extract_user_id_from_name("users/0").is_err());
        assert!(extract_user_id_from_name("users/abc").is_err());
        assert!(extract_user_id_from_name("memos/42").is_err());
    }
}

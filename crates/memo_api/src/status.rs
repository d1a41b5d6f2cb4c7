//! RPC status codes returned by v1 handlers.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Status codes used by the v1 surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    /// Request arguments have the wrong shape.
    InvalidArgument,
    /// A referenced entity does not exist.
    NotFound,
    /// A collaborator (store, identity) failed.
    Internal,
}

impl Code {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::NotFound => "NOT_FOUND",
            Self::Internal => "INTERNAL",
        }
    }
}

/// Failed RPC outcome: a code plus a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub code: Code,
    pub message: String,
}

impl Status {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(Code::InvalidArgument, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Code::NotFound, message)
    }

    /// Internal failure; `err` text is appended after `context`.
    pub fn internal(context: &str, err: impl Display) -> Self {
        Self::new(Code::Internal, format!("{context}: {err}"))
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl Error for Status {}

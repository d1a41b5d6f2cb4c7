//! Core domain logic for the memo service.
//! This crate is the single source of truth for memo and comment invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::memo::{Memo, MemoId, MemoValidationError, NewMemo, Visibility};
pub use model::relation::{MemoRelation, MemoRelationType};
pub use model::user::{NewUser, Role, User, UserId};
pub use repo::memo_repo::{FindMemo, FindMemoRelation, MemoRepository, SqliteMemoRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::memo_service::{derive_snippet, MemoService, MemoServiceError};

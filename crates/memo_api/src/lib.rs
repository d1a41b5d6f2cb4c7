//! v1 RPC surface for the memo service.
//!
//! # Responsibility
//! - Translate wire requests into core use-cases and back.
//! - Map core/collaborator failures onto status codes.
//!
//! # Invariants
//! - Handlers exit on the first error; no partial results are returned.
//! - Only `memos/{uid}` names reach the store; malformed names never do.

pub mod identity;
pub mod message;
pub mod resource_name;
pub mod service;
pub mod status;

pub use identity::{IdentityError, IdentityResolver, RequestContext, StoreIdentityResolver};
pub use message::{
    CreateMemoCommentRequest, CreateMemoRequest, GetMemoRequest, ListMemoCommentsRequest,
    ListMemoCommentsResponse, Memo, MemoDraft, Visibility,
};
pub use resource_name::{
    extract_memo_uid_from_name, extract_user_id_from_name, memo_name, user_name,
    ResourceNameError,
};
pub use service::ApiV1Service;
pub use status::{Code, Status};

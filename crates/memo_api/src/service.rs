//! v1 handlers for memos and memo comments.
//!
//! # Responsibility
//! - Parse resource names, resolve the caller and drive `MemoService`.
//! - Convert store memos into wire memos.
//!
//! # Invariants
//! - Unparseable names fail with `InvalidArgument` before any store access.
//! - A missing parent fails with `NotFound`; every other collaborator failure
//!   is `Internal` with the underlying message forwarded.
//! - Comments are created private with a parent link, memo and relation in
//!   one store transaction.

use crate::identity::{IdentityResolver, RequestContext};
use crate::message::{
    CreateMemoCommentRequest, CreateMemoRequest, GetMemoRequest, ListMemoCommentsRequest,
    ListMemoCommentsResponse, Memo,
};
use crate::resource_name::{extract_memo_uid_from_name, memo_name, user_name};
use crate::status::Status;
use log::{debug, warn};
use memo_core::{derive_snippet, MemoRepository, MemoService, MemoServiceError};

/// Memo service facade exposed to the RPC transport.
pub struct ApiV1Service<R: MemoRepository, I: IdentityResolver> {
    memos: MemoService<R>,
    identity: I,
}

impl<R: MemoRepository, I: IdentityResolver> ApiV1Service<R, I> {
    pub fn new(repo: R, identity: I) -> Self {
        Self {
            memos: MemoService::new(repo),
            identity,
        }
    }

    /// Creates a top-level memo owned by the caller.
    pub fn create_memo(
        &self,
        ctx: &RequestContext,
        request: CreateMemoRequest,
    ) -> Result<Memo, Status> {
        let user = self
            .identity
            .current_user(ctx)
            .map_err(|err| Status::internal("failed to get current user", err))?;
        let visibility: memo_core::Visibility =
            request.memo.visibility.map(Into::into).unwrap_or_default();
        let memo = self
            .memos
            .create_memo(&user, request.memo.content, visibility)
            .map_err(|err| Status::internal("failed to create memo", err))?;
        self.convert_memo_from_store(&memo)
            .map_err(|err| Status::internal("failed to convert memo", err))
    }

    /// Gets one memo by `memos/{uid}`.
    pub fn get_memo(&self, request: GetMemoRequest) -> Result<Memo, Status> {
        let memo = self.find_memo_by_name(&request.name, "memo")?;
        self.convert_memo_from_store(&memo)
            .map_err(|err| Status::internal("failed to convert memo", err))
    }

    /// Creates a comment on the memo named by `request.parent`.
    pub fn create_memo_comment(
        &self,
        ctx: &RequestContext,
        request: CreateMemoCommentRequest,
    ) -> Result<Memo, Status> {
        let parent = self.find_memo_by_name(&request.parent, "parent memo")?;
        let user = self
            .identity
            .current_user(ctx)
            .map_err(|err| Status::internal("failed to get current user", err))?;

        let comment = self
            .memos
            .create_comment(&parent, &user, request.comment.content)
            .map_err(|err| Status::internal("failed to create comment", err))?;

        self.convert_memo_from_store(&comment)
            .map_err(|err| Status::internal("failed to convert comment", err))
    }

    /// Lists the comments of the memo named by `request.parent`.
    pub fn list_memo_comments(
        &self,
        request: ListMemoCommentsRequest,
    ) -> Result<ListMemoCommentsResponse, Status> {
        let parent = self.find_memo_by_name(&request.parent, "parent memo")?;
        let stored = self.memos.list_comments(&parent).map_err(|err| match err {
            MemoServiceError::CommentLookup { source, .. } => {
                Status::internal("failed to get comment memo", source)
            }
            other => Status::internal("failed to list memo comments", other),
        })?;

        let comments = stored
            .iter()
            .map(|comment| {
                self.convert_memo_from_store(comment)
                    .map_err(|err| Status::internal("failed to convert comment memo", err))
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            "event=comment_list module=api status=ok parent_id={} count={}",
            parent.id,
            comments.len()
        );
        Ok(ListMemoCommentsResponse { comments })
    }

    fn find_memo_by_name(&self, name: &str, label: &str) -> Result<memo_core::Memo, Status> {
        let uid = extract_memo_uid_from_name(name)
            .map_err(|err| Status::invalid_argument(format!("invalid {label} name: {err}")))?;
        self.memos.require_memo(&uid).map_err(|err| match err {
            MemoServiceError::MemoNotFound(_) => Status::not_found(format!("{label} not found")),
            MemoServiceError::Repo(err) => Status::internal(&format!("failed to get {label}"), err),
            MemoServiceError::CommentLookup { source, .. } => {
                Status::internal(&format!("failed to get {label}"), source)
            }
        })
    }

    fn convert_memo_from_store(
        &self,
        memo: &memo_core::Memo,
    ) -> Result<Memo, memo_core::RepoError> {
        let parent = match memo.parent_id {
            Some(parent_id) => match self.memos.get_memo_by_id(parent_id)? {
                Some(parent) => Some(memo_name(&parent.uid)),
                None => {
                    warn!(
                        "event=memo_convert module=api status=skip reason=parent_missing memo_id={} parent_id={}",
                        memo.id, parent_id
                    );
                    None
                }
            },
            None => None,
        };

        Ok(Memo {
            name: memo_name(&memo.uid),
            uid: memo.uid.clone(),
            creator: user_name(memo.creator_id),
            create_time: memo.created_ts,
            update_time: memo.updated_ts,
            content: memo.content.clone(),
            snippet: derive_snippet(&memo.content),
            visibility: memo.visibility.into(),
            parent,
        })
    }
}

//! Current-caller resolution.
//!
//! The transport authenticates the request and records the caller id in a
//! `RequestContext`; handlers turn it into a `User` through an
//! `IdentityResolver`.

use memo_core::{RepoError, User, UserId, UserRepository};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Request-scoped data set by the transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Authenticated caller, if any.
    pub user_id: Option<UserId>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }
}

#[derive(Debug)]
pub enum IdentityError {
    /// No caller recorded on the request.
    Unauthenticated,
    /// Caller id does not resolve to a stored user.
    UserNotFound(UserId),
    Repo(RepoError),
}

impl Display for IdentityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "request is not authenticated"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for IdentityError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for IdentityError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Resolves the authenticated caller of the current request.
pub trait IdentityResolver {
    fn current_user(&self, ctx: &RequestContext) -> Result<User, IdentityError>;
}

/// Resolver backed by the user store.
pub struct StoreIdentityResolver<U: UserRepository> {
    users: U,
}

impl<U: UserRepository> StoreIdentityResolver<U> {
    pub fn new(users: U) -> Self {
        Self { users }
    }
}

impl<U: UserRepository> IdentityResolver for StoreIdentityResolver<U> {
    fn current_user(&self, ctx: &RequestContext) -> Result<User, IdentityError> {
        let user_id = ctx.user_id.ok_or(IdentityError::Unauthenticated)?;
        self.users
            .get_user(user_id)?
            .ok_or(IdentityError::UserNotFound(user_id))
    }
}

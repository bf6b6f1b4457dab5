//! Explicit per-request caller identity.

use crate::auth::UserId;

/// Identity of the caller for one unit of work.
///
/// Built by the HTTP layer from a verified access token and passed into every
/// operation that needs to know who is acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: UserId,
}

impl RequestContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

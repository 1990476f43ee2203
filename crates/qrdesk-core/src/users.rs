// ── User list ──
//
// Holds the last successfully loaded collection. A fetch is issued the
// first time the list is observed and again every time the session's
// refresh flag changes value.

use qrdesk_api::{User, UsersPayload};
use tracing::{debug, error, warn};

use crate::error::CoreError;
use crate::request::Request;

#[derive(Debug, Clone, Default)]
pub struct UserList {
    users: Vec<User>,
    observed_flag: Option<bool>,
    epoch: u64,
    loading: bool,
}

impl UserList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Issue a fetch if `refresh_flag` differs from the last one seen.
    pub(crate) fn observe(&mut self, refresh_flag: bool) -> Option<Request> {
        if self.observed_flag == Some(refresh_flag) {
            return None;
        }
        self.observed_flag = Some(refresh_flag);
        self.epoch += 1;
        self.loading = true;
        Some(Request::FetchUsers { epoch: self.epoch })
    }

    /// Apply a fetch result. Results from superseded fetches are dropped.
    pub(crate) fn apply(&mut self, epoch: u64, result: Result<UsersPayload, CoreError>) {
        if epoch != self.epoch {
            debug!(epoch, current = self.epoch, "dropping stale user list");
            return;
        }
        self.loading = false;
        match result {
            Ok(payload) => self.users = normalize(payload),
            Err(e) => error!(error = %e, "Error fetching users"),
        }
    }
}

/// Collapse the accepted list shapes into a plain vector.
pub fn normalize(payload: UsersPayload) -> Vec<User> {
    match payload {
        UsersPayload::Bare(users) | UsersPayload::Wrapped { users } => users,
        UsersPayload::Unrecognized(raw) => {
            warn!(body = %raw, "Unexpected data format");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use qrdesk_api::EntityId;

    use super::*;

    fn payload(names: &[&str]) -> UsersPayload {
        UsersPayload::Bare(
            names
                .iter()
                .zip(1..)
                .map(|(name, id)| User {
                    id: EntityId::Numeric(id),
                    username: (*name).into(),
                })
                .collect(),
        )
    }

    fn epoch_of(request: Option<Request>) -> u64 {
        match request {
            Some(Request::FetchUsers { epoch }) => epoch,
            other => panic!("expected FetchUsers, got {other:?}"),
        }
    }

    #[test]
    fn first_observe_fetches_then_waits_for_toggle() {
        let mut list = UserList::new();
        assert!(list.observe(false).is_some());
        assert!(list.is_loading());
        assert!(list.observe(false).is_none());
        assert!(list.observe(true).is_some());
    }

    #[test]
    fn unrecognized_shape_yields_empty() {
        let raw = serde_json::json!({ "foo": [] });
        assert!(normalize(UsersPayload::Unrecognized(raw)).is_empty());
    }

    #[test]
    fn failure_keeps_previous_users() {
        let mut list = UserList::new();
        let epoch = epoch_of(list.observe(false));
        list.apply(epoch, Ok(payload(&["alice"])));

        let epoch = epoch_of(list.observe(true));
        list.apply(
            epoch,
            Err(CoreError::ConnectionFailed {
                url: "http://localhost:8080".into(),
                reason: "refused".into(),
            }),
        );

        assert_eq!(list.users().len(), 1);
        assert!(!list.is_loading());
    }

    #[test]
    fn stale_result_is_dropped() {
        let mut list = UserList::new();
        let old = epoch_of(list.observe(false));
        let new = epoch_of(list.observe(true));

        list.apply(new, Ok(payload(&["bob"])));
        list.apply(old, Ok(payload(&["alice", "carol"])));

        assert_eq!(list.users().len(), 1);
        assert_eq!(list.users()[0].username, "bob");
    }
}

use axum::http::HeaderMap;
use uuid::Uuid;

/// Header installed by the upstream authentication proxy once a request is
/// authenticated.
pub const AUTH_USER_HEADER: &str = "x-authenticated-user";

/// Who is making this request. Authentication itself happens upstream; the
/// server only ever asks for the current identity, so the lookup is an
/// injected capability and tests can pin it to a fixed user.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self, headers: &HeaderMap) -> Option<Uuid>;
}

/// Production provider: trusts the authenticated-user header from the
/// upstream proxy. Absent or malformed header means "not signed in".
pub struct HeaderIdentity;

impl IdentityProvider for HeaderIdentity {
    fn current_user(&self, headers: &HeaderMap) -> Option<Uuid> {
        headers
            .get(AUTH_USER_HEADER)?
            .to_str()
            .ok()?
            .parse::<Uuid>()
            .ok()
    }
}

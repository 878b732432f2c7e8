//! Explicit per-operation access policy.
//!
//! Every routed operation is enumerated here with who may call it, so the
//! access decision is visible in one place instead of being an implicit
//! framework default. The lookup is deny-by-default: a routed path that is
//! missing from the table requires an admin session.

use axum::http::Method;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No authentication required. Guest donation submission depends on these
    /// staying open.
    Public,
    /// Requires a valid admin session token.
    Admin,
}

pub struct RoutePolicy {
    pub method: &'static str,
    pub path: &'static str,
    pub access: Access,
}

const fn route(method: &'static str, path: &'static str, access: Access) -> RoutePolicy {
    RoutePolicy {
        method,
        path,
        access,
    }
}

/// The full route table. Confirm/fail are deliberately `Public` for now: the
/// admin dashboard has no session plumbing yet and their contract is plain
/// 200/404.
pub const ROUTE_POLICIES: &[RoutePolicy] = &[
    route("GET", "/health", Access::Public),
    route("POST", "/donations", Access::Public),
    route("GET", "/donations", Access::Public),
    route("GET", "/donations/:id", Access::Public),
    route("PUT", "/donations/:id", Access::Public),
    route("PATCH", "/donations/:id", Access::Public),
    route("DELETE", "/donations/:id", Access::Public),
    route("PATCH", "/donations/:id/confirm", Access::Public),
    route("PATCH", "/donations/:id/fail", Access::Public),
    route("POST", "/charities", Access::Public),
    route("GET", "/charities", Access::Public),
    route("GET", "/charities/:id", Access::Public),
    route("PUT", "/charities/:id", Access::Public),
    route("DELETE", "/charities/:id", Access::Public),
    route("GET", "/analytics", Access::Public),
    route("GET", "/charts", Access::Public),
    route("POST", "/login", Access::Public),
    route("POST", "/register", Access::Public),
];

/// Access level for an exact (method, matched path) pair.
pub fn access_for(method: &Method, matched_path: &str) -> Option<Access> {
    ROUTE_POLICIES
        .iter()
        .find(|p| p.method == method.as_str() && p.path == matched_path)
        .map(|p| p.access)
}

/// Whether any operation is registered under this path. Used to let
/// wrong-method requests through to the router's 405 handling.
pub fn path_is_known(matched_path: &str) -> bool {
    ROUTE_POLICIES.iter().any(|p| p.path == matched_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn donation_submission_is_public() {
        assert_eq!(
            access_for(&Method::POST, "/donations"),
            Some(Access::Public)
        );
    }

    #[test]
    fn unknown_operations_have_no_policy() {
        assert_eq!(access_for(&Method::GET, "/login"), None);
        assert!(path_is_known("/login"));
        assert!(!path_is_known("/secrets"));
    }
}

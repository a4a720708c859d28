//! Route protection for gated views.

/// View routes that require an authenticated session.
pub const PROTECTED_ROUTES: &[&str] = &[
    "/dashboard",
    "/upload",
    "/results",
    "/history",
    "/profile",
    "/settings",
];

/// Returns true if `path` is a protected route or lies beneath one.
///
/// Query strings and fragments are ignored; `/results/42` is protected
/// because `/results` is, while `/resultsx` is not.
#[must_use]
pub fn is_protected_route(path: &str) -> bool {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');

    PROTECTED_ROUTES.iter().any(|route| {
        path.strip_prefix(route)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

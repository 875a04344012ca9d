//! Role-based credential selection.
//!
//! Admin-scoped requests prefer the admin credential and fall back to the
//! user credential; everything else prefers the user credential and falls
//! back to the admin one. The fallback lets either token authorize
//! endpoints the server accepts both for, while admin endpoints always
//! get the admin token when one exists. The server stays the authority on
//! whether a cross-role token is actually honored.

/// Whether a request target contains an admin-scoped path segment.
///
/// Query string and fragment are ignored.
pub fn is_admin_scoped(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.split('/').any(|segment| segment == "admin")
}

/// Pick the credential to attach to a request, if any.
pub fn select_token<'a>(
    url: &str,
    user_token: Option<&'a str>,
    admin_token: Option<&'a str>,
) -> Option<&'a str> {
    if is_admin_scoped(url) {
        admin_token.or(user_token)
    } else {
        user_token.or(admin_token)
    }
}

//! Role names embedded in access tokens.
//!
//! Accounts carry a single `is_admin` flag; these are its token encodings.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Map the `is_admin` flag to the role name placed in token claims.
pub fn role_for(is_admin: bool) -> &'static str {
    if is_admin {
        ROLE_ADMIN
    } else {
        ROLE_USER
    }
}

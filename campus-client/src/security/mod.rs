//! Credential policy for outgoing requests.

pub mod selector;

pub use selector::{is_admin_scoped, select_token};

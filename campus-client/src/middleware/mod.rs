//! Outgoing-request boundary: bearer attachment and uniform failure
//! classification.

pub mod authorize;

pub use authorize::{attach_bearer, classify_response, classify_transport};

use thiserror::Error;

/// Failures surfaced at the request-authorization boundary.
///
/// Classification happens once, when a request fails; the resulting value
/// is both reported through the [`Notifier`](crate::notify::Notifier) and
/// returned to the caller, so calling code keeps full control over
/// recovery. Malformed tokens are not an error anywhere in this crate:
/// they are treated as absent credentials.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("cannot connect to server")]
    Network(#[source] reqwest::Error),

    #[error("{message}")]
    Unauthorized { admin: bool, message: String },

    #[error("server error ({status}), please try again later")]
    Server { status: u16 },

    #[error("{message}")]
    Validation { status: u16, message: String },

    #[error("unexpected response from server: {0}")]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    /// HTTP status carried by this error, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Server { status } | ApiError::Validation { status, .. } => Some(*status),
            ApiError::Network(_) => None,
            ApiError::Http(err) => err.status().map(|s| s.as_u16()),
        }
    }

    /// Whether this is the 401 classification.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

// Campus Client SDK Library

pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod notify;
pub mod routing;
pub mod security;
pub mod services;
pub mod session;
pub mod telemetry;

pub use client::ApiClient;
pub use config::Config;
pub use error::{ApiError, Result};
pub use notify::{Notifier, TracingNotifier};
pub use routing::{
    AdminRouteGuard, GuardOutcome, Navigator, NoopNavigator, RedirectTarget, RouteAccessRequest,
    UserRouteGuard,
};
pub use session::{FileTokenStorage, MemoryTokenStorage, Role, SessionStore, TokenStorage};

// Re-export commonly used types
pub use models::{AdminLoginResponse, Book, Course, LoginResponse, ManagedUser};

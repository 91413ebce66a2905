//! services/client/src/view/guard.rs
//!
//! The route guard: protected commands only run for an authenticated session.

use study_assistant_core::StudyStore;

use crate::view::command::Command;

/// Where anonymous users are sent.
pub const LOGIN_ROUTE: &str = "login <email> <password>";

/// The outcome of checking a command against the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// The user must sign in first.
    RedirectToLogin,
}

/// Grants public commands unconditionally and everything else only when the
/// store holds an authenticated session.
pub async fn require_auth(store: &StudyStore, command: &Command) -> Access {
    if command.is_public() || store.is_authenticated().await {
        Access::Granted
    } else {
        Access::RedirectToLogin
    }
}

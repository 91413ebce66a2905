//! services/client/src/adapters/auth.rs
//!
//! The placeholder `SessionAuthenticator`. It accepts any credentials and never
//! contacts the backend; a real implementation can replace it without touching
//! the store.

use async_trait::async_trait;
use study_assistant_core::{
    domain::User,
    ports::{ApiResult, SessionAuthenticator},
};
use tracing::warn;

/// Signs in any non-empty email/password pair.
#[derive(Clone, Copy, Debug, Default)]
pub struct StubAuthenticator;

#[async_trait]
impl SessionAuthenticator for StubAuthenticator {
    async fn authenticate(&self, email: &str, _password: &str) -> ApiResult<User> {
        warn!("Stub authenticator accepted {} without checking credentials", email);
        Ok(User {
            email: email.to_string(),
            display_name: display_name_for(email),
        })
    }
}

/// The local part of the address, or the whole input when there is none.
fn display_name_for(email: &str) -> String {
    match email.split_once('@') {
        Some((local, _)) if !local.is_empty() => local.to_string(),
        _ => email.to_string(),
    }
}

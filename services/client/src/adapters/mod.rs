pub mod auth;
pub mod http;

pub use auth::StubAuthenticator;
pub use http::HttpStudyApi;

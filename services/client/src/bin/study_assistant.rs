//! services/client/src/bin/study_assistant.rs

use client_lib::{
    adapters::{HttpStudyApi, StubAuthenticator},
    config::Config,
    error::ClientError,
    view::Shell,
};
use std::sync::Arc;
use study_assistant_core::StudyStore;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Backend at {}", config.base_url);

    // --- 2. Initialize Adapters ---
    let api = Arc::new(HttpStudyApi::new(config.base_url.clone())?);
    let authenticator = Arc::new(StubAuthenticator);

    // --- 3. Build the Store Once and Hand It to the View ---
    let store = Arc::new(StudyStore::new(api, authenticator));
    let mut shell = Shell::new(store, tokio::io::stdout());

    // --- 4. Run the Shell ---
    shell.run(BufReader::new(tokio::io::stdin())).await
}

//! API server binary
//!
//! Environment:
//!   PORT               - listen port (default 8080)
//!   GEMINI_API_KEY     - narrative generation key; unset means every
//!                        report renders its literal fallback
//!   PROFILE_STORE_URL  - hosted profile store; unset falls back to the
//!   PROFILE_STORE_KEY    in-process demo directory

use std::sync::Arc;
use tracing::{info, warn};

use transparency_dashboard::api::{start_server, ApiState};
use transparency_dashboard::audit::ActionLog;
use transparency_dashboard::auth::{AuthProvider, ProfileStore, SessionRegistry, StaticDirectory};
use transparency_dashboard::narrative::NarrativeService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    info!("Starting Transparency Dashboard API");

    let provider: Arc<dyn AuthProvider> = match ProfileStore::from_env() {
        Some(store) => {
            info!("Auth provider: hosted profile store");
            Arc::new(store)
        }
        None => {
            info!("Auth provider: in-process demo directory");
            Arc::new(StaticDirectory::demo())
        }
    };

    let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
    let narrative = NarrativeService::new(api_key);
    if !narrative.is_configured() {
        warn!("GEMINI_API_KEY not set; narrative reports will use fallbacks");
    }

    let state = ApiState {
        sessions: Arc::new(SessionRegistry::new(provider)),
        narrative: Arc::new(narrative),
        audit: Arc::new(ActionLog::new()),
    };

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    start_server(state, port).await
}

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Result;
use orario_sync_core::{ProviderConfig, providers::unibo::UniboProvider};
use tokio::net::TcpListener;

use crate::handlers::{AppState, create_app};

/// Settings read from the environment
pub struct ServerConfig {
    pub port: u16,
    pub provider: ProviderConfig,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let mut provider = ProviderConfig::default();
        if let Some(timeout) = env::var("ORARIO_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            provider.timeout = Some(timeout);
        }
        if let Ok(url) = env::var("ORARIO_DEPARTMENTS_URL") {
            provider.departments_url = url;
        }
        if let Ok(url) = env::var("ORARIO_COURSES_URL") {
            provider.courses_url = url;
        }

        // PORT defaults to 3000
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(3000);

        Self { port, provider }
    }
}

pub async fn start_server(config: ServerConfig) -> Result<()> {
    let provider = UniboProvider::new(config.provider)?;
    let app = create_app(AppState {
        provider: Arc::new(provider),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    tracing::info!("Orario Sync server starting on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}

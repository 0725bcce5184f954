//! Axum HTTP-Server fuer Pforte

use std::net::SocketAddr;

use anyhow::Result;
use axum::http::{HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::rest::{app, PforteState};

/// Axum HTTP-Server
pub struct RestServer {
    bind_addr: SocketAddr,
    /// Erlaubte CORS-Origins. Leer = alle Origins erlaubt.
    cors_origins: Vec<String>,
}

impl RestServer {
    pub fn neu(bind_addr: SocketAddr, cors_origins: Vec<String>) -> Self {
        Self {
            bind_addr,
            cors_origins,
        }
    }

    fn cors(&self) -> CorsLayer {
        if self.cors_origins.is_empty() {
            return CorsLayer::permissive();
        }

        let origins: Vec<HeaderValue> = self
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(tower_http::cors::Any)
    }

    /// Bedient Anfragen bis Ctrl-C
    pub async fn starten(self, state: PforteState) -> Result<()> {
        let router = app(state)
            .layer(TraceLayer::new_for_http())
            .layer(self.cors());

        let listener = tokio::net::TcpListener::bind(self.bind_addr).await?;
        tracing::info!(addr = %self.bind_addr, "HTTP-Server gestartet");

        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(fehler = %e, "Shutdown-Signal nicht verfuegbar");
                }
                tracing::info!("Shutdown-Signal empfangen");
            })
            .await?;
        Ok(())
    }
}

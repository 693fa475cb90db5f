pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Shared state для встраивающего приложения
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub session: Arc<session::MemorySessionStore>,
    pub unauthorized: session::UnauthorizedSignal,
    pub api: client::CinemaApiClient,
}

impl AppState {
    pub fn new(config: config::Config) -> Arc<Self> {
        let session = Arc::new(session::MemorySessionStore::new());
        let unauthorized = session::UnauthorizedSignal::new();
        let store: Arc<dyn session::SessionStore> = session.clone();
        let api = client::CinemaApiClient::from_config(&config.api, store, unauthorized.clone());

        Arc::new(Self {
            config,
            session,
            unauthorized,
            api,
        })
    }
}

/// Инициализация логирования. Вызывается встраивающим приложением один
/// раз на процесс.
pub fn init_tracing(config: &config::Config) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

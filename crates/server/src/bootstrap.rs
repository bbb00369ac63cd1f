use std::sync::Arc;

use axum::Router;
use speakmark_core::config::{AppConfig, ConfigError, LoadOptions};
use speakmark_core::{Catalog, CatalogError, IntentDispatcher};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::health;
use crate::webhook::{self, Diagnostics, WebhookState};

pub struct Application {
    pub config: AppConfig,
    pub catalog: Arc<Catalog>,
    pub dispatcher: Arc<IntentDispatcher>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("example catalog failed to build: {0}")]
    Catalog(#[from] CatalogError),
}

impl Application {
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics { log_payloads: self.config.logging.debug_payloads }
    }

    pub fn router(&self) -> Router {
        let state = WebhookState::new(
            self.dispatcher.clone(),
            self.config.webhook.topic_parameter.as_str(),
            self.diagnostics(),
        );

        webhook::router(&self.config.webhook.path, state)
            .merge(health::router(self.catalog.clone()))
            .layer(TraceLayer::new_for_http())
    }
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let catalog = Arc::new(Catalog::standard()?);
    info!(
        event_name = "system.bootstrap.catalog_built",
        correlation_id = "bootstrap",
        topics = catalog.len(),
        "example catalog rendered"
    );

    let dispatcher = Arc::new(IntentDispatcher::new(catalog.clone()));

    Ok(Application { config, catalog, dispatcher })
}

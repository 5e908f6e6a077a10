//! Shared application state.
//!
//! `CoreState` is built once at startup and wrapped in `Arc` so every
//! request handler and background task reads the same store, AI client,
//! notifier and configuration.

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::db::{self, DatabaseError, Store};
use crate::llm::{GeminiClient, LlmClient, LlmError};
use crate::notify::Notifier;

pub struct CoreState {
    pub store: Arc<Store>,
    pub notifier: Notifier,
    pub config: AppConfig,
    /// `None` when no AI key is configured.
    llm: Option<Arc<dyn LlmClient>>,
}

impl CoreState {
    pub fn new(
        store: Arc<Store>,
        llm: Option<Arc<dyn LlmClient>>,
        notifier: Notifier,
        config: AppConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            config,
            llm,
        }
    }

    /// Open the configured store and build the AI client, if a key is set.
    pub fn from_config(config: AppConfig, notifier: Notifier) -> Result<Self, CoreError> {
        let conn = if config.database.is_memory() {
            db::open_memory_database()?
        } else {
            let path = config.database.file_path();
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .map_err(|e| CoreError::Storage(format!("{}: {e}", parent.display())))?;
            }
            tracing::info!(path = %path.display(), "Opening store");
            db::open_database(&path)?
        };

        let llm: Option<Arc<dyn LlmClient>> = match config.ai.api_key() {
            Some(key) => {
                let client = GeminiClient::new(
                    &config.ai.base_url,
                    key,
                    &config.ai.model,
                    config.ai.timeout_secs,
                )?;
                tracing::info!(model = %config.ai.model, "AI triage enabled");
                Some(Arc::new(client))
            }
            None => {
                tracing::warn!("No AI API key configured, triage runs offline only");
                None
            }
        };

        Ok(Self::new(Arc::new(Store::new(conn)), llm, notifier, config))
    }

    pub fn llm(&self) -> Option<&dyn LlmClient> {
        self.llm.as_deref()
    }

    pub fn ai_timeout(&self) -> Duration {
        Duration::from_secs(self.config.ai.timeout_secs)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("AI client error: {0}")]
    Llm(#[from] LlmError),
    #[error("Storage error: {0}")]
    Storage(String),
}

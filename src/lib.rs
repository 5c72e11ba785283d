//! Prompt Relay
//!
//! A stateless HTTP service that forwards a prompt to one hosted LLM
//! provider (Gemini, Claude, Mistral or Groq) and returns the generated text.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod provider;

pub use error::{AppError, Result};

use std::sync::Arc;

use provider::ProviderRegistry;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Arc<config::Settings>,
    pub providers: Arc<ProviderRegistry>,
}

impl AppState {
    /// Build the provider registry from settings
    pub fn from_settings(settings: config::Settings) -> Result<Self> {
        let providers = ProviderRegistry::from_settings(&settings)?;

        Ok(Self {
            settings: Arc::new(settings),
            providers: Arc::new(providers),
        })
    }
}

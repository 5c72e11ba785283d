//! Provider module - LLM provider trait, dialects and registry

pub mod claude;
pub mod gemini;
pub mod openai_compat;
pub mod registry;
pub mod relay;
pub mod traits;

pub use registry::{create_provider, ProviderRegistry};
pub use relay::RelayProvider;
pub use traits::{
    Completion, Dialect, KeyStatus, LlmProvider, PromptRequest, ProviderStatus,
};

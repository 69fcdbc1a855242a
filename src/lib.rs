//! Gemma Stub - simulated on-device Gemma 3n service
//!
//! This crate exposes the API of an on-device inference engine (initialize,
//! generate, stream, chat) backed by canned responses and timed delays, so
//! applications can be built and tested without model weights.

use std::fmt;

// Public modules
pub mod chat;
pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod platform;
pub mod processing;
pub mod service;
pub mod types;
pub mod utils;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-exports for public API
pub use chat::format_chat_prompt;
pub use config::{GenerationOptions, ModelConfig, ModelConfigOverrides, ModelSize, ServiceConfig};
pub use error::{Result, ServiceError};
pub use platform::{resolve_platform, Platform};
pub use processing::ResponseStream;
pub use service::{Gemma3nService, MultimodalProcessor, ServiceBuilder, TextGenerator};
pub use types::{ChatMessage, Role, ServiceInfo, ServiceState};

/// Build an owned, unloaded service with caller values merged over the defaults
pub fn create_service(overrides: ModelConfigOverrides) -> Result<Gemma3nService> {
    Gemma3nService::new(overrides)
}

impl fmt::Display for ServiceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model: Gemma 3n {}", self.model_size)?;
        writeln!(f, "State: {}", self.state)?;
        if let Some(platform) = self.platform {
            writeln!(f, "Platform: {}", platform.display_name())?;
        }
        writeln!(
            f,
            "Sampling: max_tokens={} temperature={} top_k={} quantized={}",
            self.config.max_tokens, self.config.temperature, self.config.top_k, self.config.quantized
        )
    }
}

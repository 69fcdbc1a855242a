//! Service module providing the public interface to the simulated model

mod builder;
mod service;

pub use builder::ServiceBuilder;
pub use service::Gemma3nService;

use crate::{
    config::GenerationOptions,
    error::Result,
    processing::ResponseStream,
    types::ChatMessage,
};

/// Text generation capabilities
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a complete response for a prompt
    async fn generate(&self, prompt: &str, options: Option<GenerationOptions>) -> Result<String>;

    /// Stream growing prefixes of a response
    fn generate_stream(&self, prompt: &str, options: Option<GenerationOptions>) -> ResponseStream;

    /// Format a conversation and generate the next model turn
    async fn chat(&self, messages: &[ChatMessage], options: Option<GenerationOptions>) -> Result<String>;
}

/// Image and audio capabilities; a text-only backend fails every call
#[async_trait::async_trait]
pub trait MultimodalProcessor: Send + Sync {
    async fn analyze_image(&self, image: &[u8], prompt: &str) -> Result<String>;

    async fn process_audio(&self, audio: &[u8]) -> Result<String>;
}

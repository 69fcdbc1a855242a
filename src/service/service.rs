use std::sync::Arc;
use futures::FutureExt;
use parking_lot::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    chat::format_chat_prompt,
    config::{GenerationOptions, ModelConfigOverrides, ServiceConfig},
    error::{Result, ServiceError},
    metrics::{MetricsCollector, MetricsSnapshot},
    model::{simulate_response, BackendLoader, SimulationRng},
    platform::{resolve_platform, EnvironmentProbe, Platform},
    processing::{ResponseStream, StreamContext},
    types::{ChatMessage, GeneratorHandle, ServiceInfo, ServiceState},
};

use super::builder::ServiceBuilder;
use super::{MultimodalProcessor, TextGenerator};

/// Simulated on-device Gemma 3n model.
///
/// Cloning is cheap and clones share one lifecycle. Lifecycle calls are not
/// serialized: overlapping `initialize` calls each run the loader and the
/// last to finish wins, and a `generate` already past its load check
/// completes even if `unload` runs meanwhile.
#[derive(Clone)]
pub struct Gemma3nService {
    config: Arc<ServiceConfig>,
    lifecycle: Arc<RwLock<Lifecycle>>,
    rng: Arc<SimulationRng>,
    environment: Arc<dyn EnvironmentProbe>,
    loader: Arc<dyn BackendLoader>,
    metrics: Arc<MetricsCollector>,
}

#[derive(Debug, Default)]
struct Lifecycle {
    state: ServiceState,
    handle: Option<GeneratorHandle>,
}

impl Gemma3nService {
    /// Create a new service builder
    pub fn builder() -> ServiceBuilder {
        ServiceBuilder::new()
    }

    /// Owned service with caller values merged over the defaults
    pub fn new(overrides: ModelConfigOverrides) -> Result<Self> {
        ServiceBuilder::new().with_overrides(overrides).build()
    }

    pub(crate) fn from_parts(
        config: Arc<ServiceConfig>,
        rng: Arc<SimulationRng>,
        environment: Arc<dyn EnvironmentProbe>,
        loader: Arc<dyn BackendLoader>,
    ) -> Self {
        Self {
            config,
            lifecycle: Arc::new(RwLock::new(Lifecycle::default())),
            rng,
            environment,
            loader,
            metrics: Arc::new(MetricsCollector::new()),
        }
    }

    /// Load the model for the current platform
    pub async fn initialize(&self) -> Result<()> {
        self.lifecycle.write().state = ServiceState::Loading;

        let platform = resolve_platform(&self.environment.probe());
        info!(
            platform = %platform,
            model_size = %self.config.model.model_size,
            quantized = self.config.model.quantized,
            "Initializing Gemma 3n"
        );

        let started = Instant::now();
        match self.loader.load(platform).await {
            Ok(handle) => {
                {
                    let mut lifecycle = self.lifecycle.write();
                    lifecycle.handle = Some(handle);
                    lifecycle.state = ServiceState::Loaded;
                }
                self.metrics.record_load().await;
                info!(platform = %platform, elapsed_ms = started.elapsed().as_millis() as u64, "Model loaded");
                Ok(())
            }
            Err(e) => {
                {
                    let mut lifecycle = self.lifecycle.write();
                    lifecycle.handle = None;
                    lifecycle.state = ServiceState::NotLoaded;
                }
                warn!(platform = %platform, error = %e, "Model initialization failed");
                let error = ServiceError::initialization(
                    format!("Failed to initialize Gemma 3n for {}", platform),
                    e,
                );
                self.fail(error).await
            }
        }
    }

    /// Generate a complete response for a prompt
    pub async fn generate(&self, prompt: &str, options: Option<GenerationOptions>) -> Result<String> {
        self.generate_for("generate", prompt, options).await
    }

    /// Stream growing word prefixes of a response.
    ///
    /// The load check runs on the first poll and fails as the first item.
    pub fn generate_stream(&self, prompt: &str, options: Option<GenerationOptions>) -> ResponseStream {
        let service = self.clone();
        let prompt = prompt.to_string();
        let response = async move {
            service.generate_for("generate_stream", &prompt, options).await
        }
        .boxed();

        ResponseStream::new(
            response,
            StreamContext {
                rng: self.rng.clone(),
                step: self.config.simulation.stream_step(),
                metrics: self.metrics.clone(),
            },
        )
    }

    /// Format a conversation with the chat template and generate the next turn
    pub async fn chat(&self, messages: &[ChatMessage], options: Option<GenerationOptions>) -> Result<String> {
        let prompt = format_chat_prompt(messages);
        debug!(turns = messages.len(), "Formatted chat prompt");
        self.generate_for("chat", &prompt, options).await
    }

    pub async fn analyze_image(&self, _image: &[u8], _prompt: &str) -> Result<String> {
        self.fail(ServiceError::NotImplemented { operation: "analyze_image" }).await
    }

    pub async fn process_audio(&self, _audio: &[u8]) -> Result<String> {
        self.fail(ServiceError::NotImplemented { operation: "process_audio" }).await
    }

    /// Current state and merged configuration
    pub fn info(&self) -> ServiceInfo {
        let lifecycle = self.lifecycle.read();
        ServiceInfo {
            loaded: lifecycle.state == ServiceState::Loaded,
            model_size: self.config.model.model_size.as_str().to_string(),
            config: self.config.model.clone(),
            state: lifecycle.state,
            platform: lifecycle.handle.as_ref().map(GeneratorHandle::platform),
        }
    }

    pub fn state(&self) -> ServiceState {
        self.lifecycle.read().state
    }

    /// Discard the loaded model; no-op when nothing is loaded
    pub async fn unload(&self) -> Result<()> {
        let released = {
            let mut lifecycle = self.lifecycle.write();
            let released = lifecycle.handle.take();
            if released.is_some() {
                lifecycle.state = ServiceState::NotLoaded;
            }
            released
        };

        if let Some(handle) = released {
            info!(
                platform = %handle.platform(),
                loaded_for_ms = handle.loaded_at().elapsed().as_millis() as u64,
                "Model unloaded"
            );
        }
        Ok(())
    }

    /// Get the current metrics
    pub async fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot().await
    }

    async fn generate_for(
        &self,
        operation: &'static str,
        prompt: &str,
        options: Option<GenerationOptions>,
    ) -> Result<String> {
        let platform = match self.loaded_platform() {
            Some(platform) => platform,
            None => return self.fail(ServiceError::NotLoaded { operation }).await,
        };

        if let Some(options) = &options {
            debug!(?options, "Sampling options are not applied by the simulated backend");
        }

        let started = Instant::now();
        let latency = self.rng.delay_in(self.config.simulation.generate_latency());
        tokio::time::sleep(latency).await;

        let response = simulate_response(&self.rng, platform, prompt);
        self.metrics.record_generation(started.elapsed()).await;
        debug!(operation, chars = response.len(), "Generated response");
        Ok(response)
    }

    fn loaded_platform(&self) -> Option<Platform> {
        let lifecycle = self.lifecycle.read();
        match (&lifecycle.state, &lifecycle.handle) {
            (ServiceState::Loaded, Some(handle)) => Some(handle.platform()),
            _ => None,
        }
    }

    async fn fail<T>(&self, error: ServiceError) -> Result<T> {
        self.metrics.record_error(error.kind()).await;
        Err(error)
    }
}

impl std::fmt::Debug for Gemma3nService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gemma3nService")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl TextGenerator for Gemma3nService {
    async fn generate(&self, prompt: &str, options: Option<GenerationOptions>) -> Result<String> {
        Gemma3nService::generate(self, prompt, options).await
    }

    fn generate_stream(&self, prompt: &str, options: Option<GenerationOptions>) -> ResponseStream {
        Gemma3nService::generate_stream(self, prompt, options)
    }

    async fn chat(&self, messages: &[ChatMessage], options: Option<GenerationOptions>) -> Result<String> {
        Gemma3nService::chat(self, messages, options).await
    }
}

#[async_trait::async_trait]
impl MultimodalProcessor for Gemma3nService {
    async fn analyze_image(&self, image: &[u8], prompt: &str) -> Result<String> {
        Gemma3nService::analyze_image(self, image, prompt).await
    }

    async fn process_audio(&self, audio: &[u8]) -> Result<String> {
        Gemma3nService::process_audio(self, audio).await
    }
}

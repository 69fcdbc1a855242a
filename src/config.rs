// Location: src/config.rs

use std::fmt;
use std::ops::Range;
use std::path::Path;
use std::time::Duration;
use serde::{Serialize, Deserialize};

use crate::error::{Result, ServiceError};
use crate::platform::Platform;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub model: ModelConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelSize {
    /// Effective 2B parameter variant
    #[default]
    #[serde(rename = "E2B", alias = "small")]
    Small,
    /// Effective 4B parameter variant
    #[serde(rename = "E4B", alias = "large")]
    Large,
}

impl ModelSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelSize::Small => "E2B",
            ModelSize::Large => "E4B",
        }
    }
}

impl fmt::Display for ModelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model variant to "load"
    pub model_size: ModelSize,

    /// Maximum number of tokens to generate
    pub max_tokens: usize,

    /// Temperature for sampling, in [0, 2]
    pub temperature: f32,

    /// Top-k sampling
    pub top_k: usize,

    /// Whether the quantized weights are requested
    pub quantized: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_size: ModelSize::Small,
            max_tokens: 512,
            temperature: 0.7,
            top_k: 50,
            quantized: true,
        }
    }
}

/// Partial model configuration supplied by a caller.
///
/// Fields left as `None` keep their default value when merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfigOverrides {
    pub model_size: Option<ModelSize>,
    pub max_tokens: Option<usize>,
    pub temperature: Option<f32>,
    pub top_k: Option<usize>,
    pub quantized: Option<bool>,
}

impl ModelConfig {
    /// Apply caller values on top of this configuration.
    pub fn merged(&self, overrides: &ModelConfigOverrides) -> Self {
        Self {
            model_size: overrides.model_size.unwrap_or(self.model_size),
            max_tokens: overrides.max_tokens.unwrap_or(self.max_tokens),
            temperature: overrides.temperature.unwrap_or(self.temperature),
            top_k: overrides.top_k.unwrap_or(self.top_k),
            quantized: overrides.quantized.unwrap_or(self.quantized),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 {
            return Err(ServiceError::configuration(
                "max_tokens",
                "Maximum tokens must be positive",
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ServiceError::configuration(
                "temperature",
                "Temperature must be between 0 and 2",
            ));
        }

        if self.top_k == 0 {
            return Err(ServiceError::configuration(
                "top_k",
                "Top-k must be positive",
            ));
        }

        Ok(())
    }
}

/// Timings and randomness of the simulated backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Load delay on iOS (ms)
    pub ios_load_ms: u64,

    /// Load delay on Android (ms)
    pub android_load_ms: u64,

    /// Load delay on the web (ms)
    pub web_load_ms: u64,

    /// Generation latency lower bound, inclusive (ms)
    pub generate_min_ms: u64,

    /// Generation latency upper bound, exclusive (ms)
    pub generate_max_ms: u64,

    /// Per-word streaming delay lower bound, inclusive (ms)
    pub stream_step_min_ms: u64,

    /// Per-word streaming delay upper bound, exclusive (ms)
    pub stream_step_max_ms: u64,

    /// Fixed seed for response and delay selection; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ios_load_ms: 3000,
            android_load_ms: 3000,
            web_load_ms: 2000,
            generate_min_ms: 800,
            generate_max_ms: 2000,
            stream_step_min_ms: 150,
            stream_step_max_ms: 250,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn load_delay(&self, platform: Platform) -> Duration {
        let ms = match platform {
            Platform::Ios => self.ios_load_ms,
            Platform::Android => self.android_load_ms,
            Platform::Web => self.web_load_ms,
        };
        Duration::from_millis(ms)
    }

    pub fn generate_latency(&self) -> Range<Duration> {
        Duration::from_millis(self.generate_min_ms)..Duration::from_millis(self.generate_max_ms)
    }

    pub fn stream_step(&self) -> Range<Duration> {
        Duration::from_millis(self.stream_step_min_ms)..Duration::from_millis(self.stream_step_max_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.generate_min_ms > self.generate_max_ms {
            return Err(ServiceError::configuration(
                "generate_min_ms",
                "Lower latency bound must not exceed the upper bound",
            ));
        }

        if self.stream_step_min_ms > self.stream_step_max_ms {
            return Err(ServiceError::configuration(
                "stream_step_min_ms",
                "Lower step bound must not exceed the upper bound",
            ));
        }

        Ok(())
    }
}

impl ServiceConfig {
    /// Parse a (possibly partial) JSON document; missing fields keep defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ServiceError::configuration("json", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        self.simulation.validate()
    }
}

/// Per-request sampling options.
///
/// Accepted for API compatibility with a real engine; the simulated
/// backend never applies them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    pub max_tokens: Option<usize>,
    pub temperature: Option<f32>,
    pub top_k: Option<usize>,
}

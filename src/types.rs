//! Common type definitions used throughout the service

use std::fmt;
use std::time::Instant;
use serde::{Serialize, Deserialize};

use crate::config::ModelConfig;
use crate::platform::Platform;

/// Lifecycle of a single service instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceState {
    #[default]
    NotLoaded,
    Loading,
    Loaded,
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ServiceState::NotLoaded => "not_loaded",
            ServiceState::Loading => "loading",
            ServiceState::Loaded => "loaded",
        };
        f.write_str(label)
    }
}

/// Speaker of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// Opaque handle installed by a successful load
#[derive(Debug, Clone)]
pub struct GeneratorHandle {
    platform: Platform,
    loaded_at: Instant,
}

impl GeneratorHandle {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            loaded_at: Instant::now(),
        }
    }

    /// Platform the handle was loaded for
    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn loaded_at(&self) -> Instant {
        self.loaded_at
    }
}

/// Snapshot returned by `Gemma3nService::info`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceInfo {
    pub loaded: bool,
    pub model_size: String,
    pub config: ModelConfig,
    pub state: ServiceState,
    pub platform: Option<Platform>,
}

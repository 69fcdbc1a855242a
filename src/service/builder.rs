use std::sync::Arc;

use crate::{
    config::{ModelConfigOverrides, ServiceConfig},
    error::Result,
    model::{BackendLoader, SimulatedLoader, SimulationRng},
    platform::{EnvironmentProbe, ProcessEnvironment},
};

use super::service::Gemma3nService;

/// Builder for constructing a Gemma3nService instance
pub struct ServiceBuilder {
    config: ServiceConfig,
    overrides: ModelConfigOverrides,
    environment: Option<Arc<dyn EnvironmentProbe>>,
    loader: Option<Arc<dyn BackendLoader>>,
}

impl ServiceBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ServiceConfig::default(),
            overrides: ModelConfigOverrides::default(),
            environment: None,
            loader: None,
        }
    }

    /// Set the full service configuration
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Caller values merged over the model configuration at build time
    pub fn with_overrides(mut self, overrides: ModelConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Make template and delay selection deterministic
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.simulation.seed = Some(seed);
        self
    }

    pub fn with_environment(mut self, environment: Arc<dyn EnvironmentProbe>) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn with_loader(mut self, loader: Arc<dyn BackendLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Build the service instance
    pub fn build(self) -> Result<Gemma3nService> {
        let mut config = self.config;
        config.model = config.model.merged(&self.overrides);
        config.validate()?;

        let config = Arc::new(config);
        let rng = Arc::new(SimulationRng::new(config.simulation.seed));
        let environment: Arc<dyn EnvironmentProbe> = match self.environment {
            Some(environment) => environment,
            None => Arc::new(ProcessEnvironment),
        };
        let loader: Arc<dyn BackendLoader> = match self.loader {
            Some(loader) => loader,
            None => Arc::new(SimulatedLoader::new(Arc::new(config.simulation.clone()))),
        };

        Ok(Gemma3nService::from_parts(config, rng, environment, loader))
    }
}

impl Default for ServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelSize;

    #[test]
    fn test_builder_default() {
        let service = ServiceBuilder::default().build().unwrap();
        let info = service.info();
        assert!(!info.loaded);
        assert_eq!(info.model_size, "E2B");
    }

    #[test]
    fn test_builder_merges_overrides() {
        let service = ServiceBuilder::new()
            .with_overrides(ModelConfigOverrides {
                model_size: Some(ModelSize::Large),
                max_tokens: Some(128),
                ..Default::default()
            })
            .build()
            .unwrap();

        let info = service.info();
        assert_eq!(info.model_size, "E4B");
        assert_eq!(info.config.max_tokens, 128);
        assert_eq!(info.config.top_k, 50);
    }

    #[test]
    fn test_builder_validation() {
        let result = ServiceBuilder::new()
            .with_overrides(ModelConfigOverrides {
                temperature: Some(-0.1),
                ..Default::default()
            })
            .build();
        assert!(result.is_err());
    }
}

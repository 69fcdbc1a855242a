use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

use crate::config::SimulationConfig;
use crate::platform::Platform;
use crate::types::GeneratorHandle;

/// Backend that turns a resolved platform into a ready generator.
///
/// Errors are wrapped into `ServiceError::Initialization` by the service.
#[async_trait::async_trait]
pub trait BackendLoader: Send + Sync {
    async fn load(&self, platform: Platform) -> Result<GeneratorHandle>;
}

/// Loader that only waits, one branch per platform
pub struct SimulatedLoader {
    simulation: Arc<SimulationConfig>,
}

impl SimulatedLoader {
    pub fn new(simulation: Arc<SimulationConfig>) -> Self {
        Self { simulation }
    }

    async fn load_ios(&self) -> Result<GeneratorHandle> {
        debug!("Preparing Core ML backend");
        tokio::time::sleep(self.simulation.load_delay(Platform::Ios)).await;
        Ok(GeneratorHandle::new(Platform::Ios))
    }

    async fn load_android(&self) -> Result<GeneratorHandle> {
        debug!("Preparing TensorFlow Lite backend");
        tokio::time::sleep(self.simulation.load_delay(Platform::Android)).await;
        Ok(GeneratorHandle::new(Platform::Android))
    }

    async fn load_web(&self) -> Result<GeneratorHandle> {
        debug!("Preparing ONNX web backend");
        tokio::time::sleep(self.simulation.load_delay(Platform::Web)).await;
        Ok(GeneratorHandle::new(Platform::Web))
    }
}

#[async_trait::async_trait]
impl BackendLoader for SimulatedLoader {
    async fn load(&self, platform: Platform) -> Result<GeneratorHandle> {
        match platform {
            Platform::Ios => self.load_ios().await,
            Platform::Android => self.load_android().await,
            Platform::Web => self.load_web().await,
        }
    }
}

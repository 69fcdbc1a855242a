use std::error::Error as StdError;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Loading the simulated backend failed; the service stays unloaded.
    #[error("Initialization error: {message}")]
    Initialization {
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    #[error("Model not loaded: call initialize() before {operation}")]
    NotLoaded { operation: &'static str },

    #[error("{operation} is not implemented yet")]
    NotImplemented { operation: &'static str },

    #[error("Configuration error for {parameter}: {message}")]
    Configuration { parameter: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    pub(crate) fn initialization(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        ServiceError::Initialization {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub(crate) fn configuration(parameter: &str, message: impl Into<String>) -> Self {
        ServiceError::Configuration {
            parameter: parameter.to_string(),
            message: message.into(),
        }
    }

    pub fn is_not_loaded(&self) -> bool {
        matches!(self, ServiceError::NotLoaded { .. })
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, ServiceError::NotImplemented { .. })
    }

    /// Short stable label used when recording error metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Initialization { .. } => "initialization",
            ServiceError::NotLoaded { .. } => "not_loaded",
            ServiceError::NotImplemented { .. } => "not_implemented",
            ServiceError::Configuration { .. } => "configuration",
            ServiceError::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ServiceError::NotLoaded { operation: "generate" };
        assert_eq!(
            error.to_string(),
            "Model not loaded: call initialize() before generate"
        );

        let error = ServiceError::configuration("top_k", "must be positive");
        assert_eq!(error.to_string(), "Configuration error for top_k: must be positive");
    }

    #[test]
    fn test_initialization_keeps_source() {
        let cause = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let error = ServiceError::initialization("Failed to load web backend", cause);

        assert_eq!(error.kind(), "initialization");
        let source = error.source().expect("source should be kept");
        assert_eq!(source.to_string(), "disk on fire");
    }

    #[test]
    fn test_error_classification() {
        assert!(ServiceError::NotLoaded { operation: "chat" }.is_not_loaded());
        assert!(ServiceError::NotImplemented { operation: "analyze_image" }.is_not_implemented());
        assert!(!ServiceError::NotImplemented { operation: "process_audio" }.is_not_loaded());
    }
}

//! Platform detection for the simulated backend

use std::fmt;
use serde::{Serialize, Deserialize};

/// Target platform the model is "loaded" for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Ios,
    Android,
    Web,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
            Platform::Web => "web",
        }
    }

    /// Human-readable name used in generated text
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Ios => "iOS",
            Platform::Android => "Android",
            Platform::Web => "Web",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ambient flags a platform decision is made from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeEnvironment {
    /// An embedded mobile JS-style runtime marker is present
    pub embedded_runtime: bool,
    /// User agent string, when the runtime exposes one
    pub user_agent: Option<String>,
    /// A browser-like global context (window and document) is present
    pub browser_context: bool,
}

/// Source of the current runtime environment.
///
/// Queried on every `initialize`, never cached.
pub trait EnvironmentProbe: Send + Sync {
    fn probe(&self) -> RuntimeEnvironment;
}

/// Reads the environment of the running process.
///
/// Mobile targets count as an embedded runtime, `wasm32` as a browser.
/// `GEMMA_EMBEDDED_RUNTIME`, `GEMMA_USER_AGENT` and `GEMMA_BROWSER` override
/// the compile-time guess.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl ProcessEnvironment {
    /// Build the environment from a variable lookup, falling back to the target
    pub(crate) fn from_lookup<F>(lookup: F) -> RuntimeEnvironment
    where
        F: Fn(&str) -> Option<String>,
    {
        let embedded_runtime = parse_flag(lookup("GEMMA_EMBEDDED_RUNTIME"))
            .unwrap_or(cfg!(any(target_os = "ios", target_os = "android")));
        let browser_context = parse_flag(lookup("GEMMA_BROWSER"))
            .unwrap_or(cfg!(target_arch = "wasm32"));

        let user_agent = lookup("GEMMA_USER_AGENT").or_else(|| {
            if cfg!(target_os = "android") {
                Some("Android".to_string())
            } else if cfg!(target_os = "ios") {
                Some("iPhone".to_string())
            } else {
                None
            }
        });

        RuntimeEnvironment {
            embedded_runtime,
            user_agent,
            browser_context,
        }
    }
}

impl EnvironmentProbe for ProcessEnvironment {
    fn probe(&self) -> RuntimeEnvironment {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

/// Fixed environment, mostly useful in tests
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment(pub RuntimeEnvironment);

impl EnvironmentProbe for StaticEnvironment {
    fn probe(&self) -> RuntimeEnvironment {
        self.0.clone()
    }
}

impl StaticEnvironment {
    /// Environment that resolves to the given platform
    pub fn for_platform(platform: Platform) -> Self {
        let env = match platform {
            Platform::Ios => RuntimeEnvironment {
                embedded_runtime: true,
                user_agent: Some("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)".into()),
                browser_context: false,
            },
            Platform::Android => RuntimeEnvironment {
                embedded_runtime: true,
                user_agent: Some("Mozilla/5.0 (Linux; Android 14; Pixel 8)".into()),
                browser_context: false,
            },
            Platform::Web => RuntimeEnvironment {
                embedded_runtime: false,
                user_agent: None,
                browser_context: true,
            },
        };
        Self(env)
    }
}

fn parse_flag(value: Option<String>) -> Option<bool> {
    value.map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

/// Decide the platform; first match wins.
pub fn resolve_platform(env: &RuntimeEnvironment) -> Platform {
    if env.embedded_runtime {
        return match env.user_agent.as_deref() {
            Some(ua) if ua.contains("iPhone") || ua.contains("iPad") => Platform::Ios,
            Some(ua) if ua.contains("Android") => Platform::Android,
            _ => Platform::Ios,
        };
    }

    if env.browser_context {
        return Platform::Web;
    }

    Platform::Web
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn embedded(user_agent: Option<&str>) -> RuntimeEnvironment {
        RuntimeEnvironment {
            embedded_runtime: true,
            user_agent: user_agent.map(str::to_string),
            browser_context: false,
        }
    }

    #[test]
    fn test_embedded_runtime_user_agents() {
        assert_eq!(resolve_platform(&embedded(Some("... iPhone OS 17 ..."))), Platform::Ios);
        assert_eq!(resolve_platform(&embedded(Some("... iPad; CPU OS ..."))), Platform::Ios);
        assert_eq!(resolve_platform(&embedded(Some("Linux; Android 14"))), Platform::Android);
    }

    #[test]
    fn test_embedded_runtime_defaults_to_ios() {
        assert_eq!(resolve_platform(&embedded(None)), Platform::Ios);
        assert_eq!(resolve_platform(&embedded(Some("SomethingElse/1.0"))), Platform::Ios);
    }

    #[test]
    fn test_embedded_runtime_wins_over_browser() {
        let mut env = embedded(Some("Android"));
        env.browser_context = true;
        assert_eq!(resolve_platform(&env), Platform::Android);
    }

    #[test]
    fn test_browser_and_fallback() {
        let browser = RuntimeEnvironment { browser_context: true, ..Default::default() };
        assert_eq!(resolve_platform(&browser), Platform::Web);
        assert_eq!(resolve_platform(&RuntimeEnvironment::default()), Platform::Web);
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_process_overrides() {
        let env = ProcessEnvironment::from_lookup(lookup_from(&[
            ("GEMMA_EMBEDDED_RUNTIME", " TRUE "),
            ("GEMMA_USER_AGENT", "Mozilla/5.0 (Linux; Android 14)"),
            ("GEMMA_BROWSER", "0"),
        ]));
        assert!(env.embedded_runtime);
        assert!(!env.browser_context);
        assert_eq!(resolve_platform(&env), Platform::Android);

        let env = ProcessEnvironment::from_lookup(lookup_from(&[
            ("GEMMA_EMBEDDED_RUNTIME", "no"),
            ("GEMMA_BROWSER", "yes"),
        ]));
        assert!(!env.embedded_runtime);
        assert!(env.browser_context);
        assert_eq!(resolve_platform(&env), Platform::Web);
    }

    #[test]
    fn test_process_defaults_follow_target() {
        let env = ProcessEnvironment::from_lookup(|_| None);
        assert_eq!(env.embedded_runtime, cfg!(any(target_os = "ios", target_os = "android")));
        assert_eq!(env.browser_context, cfg!(target_arch = "wasm32"));
        if !cfg!(any(target_os = "ios", target_os = "android")) {
            assert_eq!(env.user_agent, None);
        }
    }

    #[test]
    fn test_static_environment_round_trips() {
        for platform in [Platform::Ios, Platform::Android, Platform::Web] {
            let probe = StaticEnvironment::for_platform(platform);
            assert_eq!(resolve_platform(&probe.probe()), platform);
        }
    }
}

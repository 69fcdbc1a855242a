//! Simulated model backend: loading, canned responses and randomness

mod loader;
mod responses;
mod rng;

pub use loader::{BackendLoader, SimulatedLoader};
pub use rng::SimulationRng;

pub(crate) use responses::{compose_response, SuffixKind, TEMPLATES_PER_PLATFORM};

use crate::platform::Platform;

/// Draws a template and builds the complete response for `prompt`.
///
/// Consumes exactly one draw from `rng`.
pub(crate) fn simulate_response(rng: &SimulationRng, platform: Platform, prompt: &str) -> String {
    let template_index = rng.pick_index(TEMPLATES_PER_PLATFORM);
    tracing::debug!(
        platform = %platform,
        template_index,
        suffix = ?SuffixKind::classify(prompt),
        "Composing simulated response"
    );
    compose_response(platform, prompt, template_index)
}

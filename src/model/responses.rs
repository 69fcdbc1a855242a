//! Canned responses of the simulated backend

use crate::platform::Platform;

/// One canned sentence; embeds the head of the prompt followed by `...`
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResponseTemplate {
    lead: &'static str,
    excerpt_chars: usize,
    tail: &'static str,
}

impl ResponseTemplate {
    const fn new(lead: &'static str, excerpt_chars: usize, tail: &'static str) -> Self {
        Self { lead, excerpt_chars, tail }
    }

    pub(crate) fn render(&self, prompt: &str) -> String {
        let excerpt: String = prompt.chars().take(self.excerpt_chars).collect();
        format!("{}\"{}...\"{}", self.lead, excerpt, self.tail)
    }
}

pub(crate) const TEMPLATES_PER_PLATFORM: usize = 3;

const IOS_TEMPLATES: [ResponseTemplate; TEMPLATES_PER_PLATFORM] = [
    ResponseTemplate::new(
        "Running on-device with Core ML, I looked at ",
        40,
        " and put together an answer without leaving your iPhone.",
    ),
    ResponseTemplate::new(
        "Thanks for asking about ",
        35,
        ". Gemma 3n is processing this privately on iOS.",
    ),
    ResponseTemplate::new(
        "Here is my take on ",
        45,
        " generated locally on the Apple Neural Engine.",
    ),
];

const ANDROID_TEMPLATES: [ResponseTemplate; TEMPLATES_PER_PLATFORM] = [
    ResponseTemplate::new(
        "Running on-device with TensorFlow Lite, I looked at ",
        40,
        " and put together an answer without leaving your phone.",
    ),
    ResponseTemplate::new(
        "Thanks for asking about ",
        35,
        ". Gemma 3n is processing this privately on Android.",
    ),
    ResponseTemplate::new(
        "Here is my take on ",
        45,
        " generated locally with GPU delegate acceleration.",
    ),
];

const WEB_TEMPLATES: [ResponseTemplate; TEMPLATES_PER_PLATFORM] = [
    ResponseTemplate::new(
        "Running in the browser with ONNX, I looked at ",
        40,
        " and put together an answer without a server round trip.",
    ),
    ResponseTemplate::new(
        "Thanks for asking about ",
        35,
        ". Gemma 3n is processing this locally in your browser.",
    ),
    ResponseTemplate::new(
        "Here is my take on ",
        45,
        " generated with WebAssembly acceleration.",
    ),
];

pub(crate) fn templates_for(platform: Platform) -> &'static [ResponseTemplate; TEMPLATES_PER_PLATFORM] {
    match platform {
        Platform::Ios => &IOS_TEMPLATES,
        Platform::Android => &ANDROID_TEMPLATES,
        Platform::Web => &WEB_TEMPLATES,
    }
}

/// Question category picked from the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SuffixKind {
    How,
    What,
    Why,
    General,
}

impl SuffixKind {
    /// First matching keyword wins: how > what > why.
    pub(crate) fn classify(prompt: &str) -> Self {
        let lower = prompt.to_lowercase();
        if lower.contains("how") {
            SuffixKind::How
        } else if lower.contains("what") {
            SuffixKind::What
        } else if lower.contains("why") {
            SuffixKind::Why
        } else {
            SuffixKind::General
        }
    }

    pub(crate) fn render(&self, platform: Platform) -> String {
        let name = platform.display_name();
        match self {
            SuffixKind::How => format!(
                " On {}, the best approach is to break this down into small steps and work through them one at a time.",
                name
            ),
            SuffixKind::What => format!(
                " In short, this is a concept that can be explained clearly with a few examples, all computed on {}.",
                name
            ),
            SuffixKind::Why => format!(
                " The reasons come down to a few key factors, which I analyzed on-device on {}.",
                name
            ),
            SuffixKind::General => format!(
                " Let me know if you would like more detail; everything stays on your {} device.",
                name
            ),
        }
    }
}

/// Assemble the full response for one template pick.
pub(crate) fn compose_response(platform: Platform, prompt: &str, template_index: usize) -> String {
    let templates = templates_for(platform);
    let template = templates[template_index % templates.len()];
    let mut response = template.render(prompt);
    response.push_str(&SuffixKind::classify(prompt).render(platform));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_lengths() {
        for platform in [Platform::Ios, Platform::Android, Platform::Web] {
            for template in templates_for(platform) {
                assert!((35..=45).contains(&template.excerpt_chars));
            }
        }
    }

    #[test]
    fn test_excerpt_truncates_by_chars() {
        let template = ResponseTemplate::new("<", 3, ">");
        assert_eq!(template.render("héllo"), "<\"hél...\">");
        assert_eq!(template.render("hi"), "<\"hi...\">");
    }

    #[test]
    fn test_suffix_precedence() {
        assert_eq!(SuffixKind::classify("What is this and how does it work?"), SuffixKind::How);
        assert_eq!(SuffixKind::classify("WHY and what?"), SuffixKind::What);
        assert_eq!(SuffixKind::classify("Why not"), SuffixKind::Why);
        assert_eq!(SuffixKind::classify("Tell me a story"), SuffixKind::General);
        // Substring match, not word match
        assert_eq!(SuffixKind::classify("Show me"), SuffixKind::How);
    }

    #[test]
    fn test_single_suffix_applied() {
        let response = compose_response(Platform::Android, "how and why", 0);
        assert!(response.ends_with(&SuffixKind::How.render(Platform::Android)));
        assert!(!response.contains(&SuffixKind::Why.render(Platform::Android)));
    }

    #[test]
    fn test_compose_embeds_prompt_head() {
        let prompt = "Explain the difference between ownership and borrowing in detail";
        let response = compose_response(Platform::Web, prompt, 1);
        let head: String = prompt.chars().take(35).collect();
        assert!(response.starts_with("Thanks for asking about "));
        assert!(response.contains(&format!("\"{}...\"", head)));
        assert!(response.contains("Web"));
    }
}

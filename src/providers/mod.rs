//! Provider registry and the chat backend seam.
//!
//! [`SUPPORTED_PROVIDERS`] is the fixed, ordered list of recognized provider
//! identifiers. The order is part of the public contract: collaborators may
//! persist index-based references into it, so reordering or removing an entry
//! is a breaking change. Appending is safe.
//!
//! [`ChatBackend`] is the boundary to the actual LLM call. The core never
//! performs network I/O itself; a backend is injected at construction time
//! and the session layer routes prompts through it on cache misses.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::Result;
use crate::session::Message;

/// A supported LLM provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderInfo {
    /// Stable lowercase identifier used as the vault key and cache scope.
    pub name: &'static str,
    /// Human-readable name for display.
    pub display_name: &'static str,
    /// Model used when the caller does not pick one.
    pub default_model: &'static str,
}

/// Ordered registry of supported providers. Append-only.
pub const SUPPORTED_PROVIDERS: &[ProviderInfo] = &[
    ProviderInfo {
        name: "anthropic",
        display_name: "Anthropic",
        default_model: "claude-sonnet-4-5-20250929",
    },
    ProviderInfo {
        name: "openai",
        display_name: "OpenAI",
        default_model: "gpt-4o",
    },
    ProviderInfo {
        name: "openrouter",
        display_name: "OpenRouter",
        default_model: "openrouter/auto",
    },
    ProviderInfo {
        name: "groq",
        display_name: "Groq",
        default_model: "llama-3.3-70b-versatile",
    },
    ProviderInfo {
        name: "gemini",
        display_name: "Gemini",
        default_model: "gemini-2.5-pro",
    },
    ProviderInfo {
        name: "zhipu",
        display_name: "Zhipu",
        default_model: "glm-4.5",
    },
];

/// Position of `name` in the registry, if supported.
pub fn provider_index(name: &str) -> Option<usize> {
    SUPPORTED_PROVIDERS.iter().position(|p| p.name == name)
}

/// Whether `name` is a recognized provider identifier.
pub fn is_supported(name: &str) -> bool {
    provider_index(name).is_some()
}

/// Registry entry for `name`, if supported.
pub fn provider_info(name: &str) -> Option<&'static ProviderInfo> {
    SUPPORTED_PROVIDERS.iter().find(|p| p.name == name)
}

/// Default model for `name`, if supported.
pub fn default_model(name: &str) -> Option<&'static str> {
    provider_info(name).map(|p| p.default_model)
}

/// The LLM invocation boundary.
///
/// Implementations wrap a concrete provider SDK or HTTP client and hold
/// whatever credentials they need; the session layer only sees prompt in,
/// text out. `Send + Sync` because a backend may be shared across async
/// tasks.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Stable provider identifier this backend talks to (e.g. `"openai"`).
    fn name(&self) -> &str;

    /// Send `prompt` with the rolling conversation `history` to `model` and
    /// return the response text.
    async fn send(&self, model: &str, history: &[Message], prompt: &str) -> Result<String>;
}

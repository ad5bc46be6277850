//! Chat session state: rolling history with a cache-first ask path.
//!
//! A [`ChatSession`] owns the conversation history, the injected
//! [`ChatBackend`], and a per-session [`ResponseCache`]. Every prompt is
//! checked against the cache before the backend is called; a hit skips the
//! network entirely but still extends the history, so the transcript reads
//! the same either way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::cache::{CacheStats, ResponseCache};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::providers::ChatBackend;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A conversation bound to one provider backend and model.
///
/// The provider identifier (and therefore the cache scope) comes from the
/// backend itself, so a session can never cache under one provider and send
/// under another.
pub struct ChatSession {
    id: Uuid,
    model: String,
    backend: Box<dyn ChatBackend>,
    cache: ResponseCache,
    cache_enabled: bool,
    history: Vec<Message>,
}

impl ChatSession {
    pub fn new(backend: Box<dyn ChatBackend>, model: impl Into<String>, cache: &CacheConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            model: model.into(),
            backend,
            cache: ResponseCache::new(cache.ttl_secs, cache.max_entries),
            cache_enabled: cache.enabled,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn provider(&self) -> &str {
        self.backend.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    /// Swap the backend, e.g. after a credential change or provider switch.
    /// History is kept; cached entries for the old provider simply stop
    /// matching.
    pub fn set_backend(&mut self, backend: Box<dyn ChatBackend>) {
        self.backend = backend;
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Send `prompt`, consulting the cache first.
    ///
    /// On a hit the cached text is returned without touching the backend. On
    /// a miss the backend is called with the history so far; only a
    /// successful response is appended to history and written back to the
    /// cache. A failed call leaves both untouched.
    pub async fn ask(&mut self, prompt: &str) -> Result<String> {
        let provider = self.backend.name().to_string();
        if self.cache_enabled {
            if let Some(cached) = self.cache.get(&provider, &self.model, prompt) {
                debug!(session = %self.id, provider = %provider, "response served from cache");
                self.history.push(Message::user(prompt));
                self.history.push(Message::assistant(cached.clone()));
                return Ok(cached);
            }
        }

        let response = self.backend.send(&self.model, &self.history, prompt).await?;
        self.history.push(Message::user(prompt));
        self.history.push(Message::assistant(response.clone()));
        if self.cache_enabled {
            self.cache
                .put(&provider, &self.model, prompt, response.clone());
        }
        Ok(response)
    }

    /// Drop all cached responses, keeping the conversation.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Start over: new session id, empty history, empty cache.
    pub fn reset(&mut self) {
        self.id = Uuid::new_v4();
        self.history.clear();
        self.cache.clear();
        debug!(session = %self.id, "session reset");
    }
}

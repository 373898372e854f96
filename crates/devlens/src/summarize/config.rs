use crate::prelude::*;

/// Default model when `ANTHROPIC_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Default answer budget, in tokens.
pub const DEFAULT_MAX_TOKENS: u64 = 2048;

/// Default API origin. Overridable so the client can be pointed at a proxy.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Which client implementation carries the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Backend {
    /// The `rig` Anthropic provider
    #[default]
    Rig,
    /// A hand-built `reqwest` call to the Messages API
    Http,
}

/// Everything a summarizer needs, resolved once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct SummarizerConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u64,
    pub base_url: String,
    pub backend: Backend,
}

impl std::fmt::Debug for SummarizerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummarizerConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("base_url", &self.base_url)
            .field("backend", &self.backend)
            .finish()
    }
}

impl SummarizerConfig {
    /// Fails with [`Error::MissingApiKey`] when no usable key was supplied.
    pub fn new(
        api_key: Option<String>,
        model: String,
        max_tokens: u64,
        base_url: String,
        backend: Backend,
    ) -> std::result::Result<Self, Error> {
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(Error::MissingApiKey)?;

        Ok(Self {
            api_key,
            model,
            max_tokens,
            base_url: base_url.trim_end_matches('/').to_string(),
            backend,
        })
    }

    /// Full URL of the Messages endpoint.
    pub fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> std::result::Result<SummarizerConfig, Error> {
        SummarizerConfig::new(
            api_key.map(str::to_string),
            DEFAULT_MODEL.to_string(),
            DEFAULT_MAX_TOKENS,
            format!("{DEFAULT_BASE_URL}/"),
            Backend::Http,
        )
    }

    #[test]
    fn test_missing_api_key() {
        assert!(matches!(config(None), Err(Error::MissingApiKey)));
        assert!(matches!(config(Some("")), Err(Error::MissingApiKey)));
        assert!(matches!(config(Some("   ")), Err(Error::MissingApiKey)));
    }

    #[test]
    fn test_missing_api_key_message_is_readable() {
        let message = config(None).unwrap_err().to_string();
        assert!(message.contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn test_messages_url_strips_trailing_slash() {
        let config = config(Some("sk-test")).unwrap();
        assert_eq!(config.messages_url(), "https://api.anthropic.com/v1/messages");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = config(Some("sk-secret")).unwrap();
        assert!(!format!("{config:?}").contains("sk-secret"));
    }
}

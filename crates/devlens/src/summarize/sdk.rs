use crate::prelude::*;
use devlens_core::response::{interpret_body, interpret_value, ResponseEnvelope};
use rig::client::CompletionClient;
use rig::completion::{CompletionError, Prompt, PromptError};
use rig::http_client;
use rig::providers::anthropic;
use serde_json::{json, Value};

use super::config::SummarizerConfig;
use super::{Summarizer, SYSTEM_PREAMBLE};

/// Summarizer backed by the `rig` Anthropic provider.
pub struct RigSummarizer {
    client: anthropic::Client,
    model: String,
    max_tokens: u64,
}

fn create_client(config: &SummarizerConfig) -> Result<anthropic::Client> {
    anthropic::Client::builder()
        .api_key(config.api_key.clone())
        .base_url(&config.base_url)
        .build()
        .map_err(|e| eyre!("Failed to create Anthropic client: {}", e))
}

impl RigSummarizer {
    pub fn new(config: &SummarizerConfig) -> Result<Self> {
        Ok(Self {
            client: create_client(config)?,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }
}

impl Summarizer for RigSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<ResponseEnvelope> {
        let agent = self
            .client
            .agent(&self.model)
            .preamble(SYSTEM_PREAMBLE)
            .max_tokens(self.max_tokens)
            .build();

        match agent.prompt(prompt).await {
            Ok(text) => Ok(ResponseEnvelope::answer(text)),
            Err(e) => envelope_from_error(e),
        }
    }
}

/// Turn a failed `rig` call into the same envelope the raw backend would
/// produce. Only failures where no response arrived are fatal.
fn envelope_from_error(error: PromptError) -> Result<ResponseEnvelope> {
    let error = match error {
        PromptError::CompletionError(error) => error,
        other => return Err(Error::Network(other.to_string()).into()),
    };

    match error {
        // Non-2xx: the status and body are handed back verbatim.
        CompletionError::HttpError(http_client::Error::InvalidStatusCodeWithMessage(
            status,
            body,
        )) => Ok(interpret_body(status.as_u16(), &body)),
        CompletionError::HttpError(http_client::Error::InvalidStatusCode(status)) => {
            Ok(ResponseEnvelope::Raw {
                status: status.as_u16(),
                body: String::new(),
            })
        }
        // 2xx whose body is not a Messages response. rig drops the body,
        // so the parse error stands in for it.
        CompletionError::JsonError(e) => Ok(ResponseEnvelope::Raw {
            status: 200,
            body: e.to_string(),
        }),
        // 2xx carrying `"type": "error"`, or a message with no content.
        CompletionError::ResponseError(message) => Ok(ResponseEnvelope::ApiError {
            error: json!({ "message": message }),
        }),
        CompletionError::ProviderError(message) => Ok(provider_error(message)),
        other => Err(Error::Network(other.to_string()).into()),
    }
}

fn provider_error(message: String) -> ResponseEnvelope {
    match serde_json::from_str::<Value>(&message) {
        Ok(value) => match interpret_value(value) {
            ResponseEnvelope::Unrecognized { payload } => {
                ResponseEnvelope::ApiError { error: payload }
            }
            envelope => envelope,
        },
        Err(_) => ResponseEnvelope::ApiError {
            error: Value::String(message),
        },
    }
}

use crate::prelude::*;
use devlens_core::response::{interpret_body, ResponseEnvelope};
use serde::Serialize;

use super::config::SummarizerConfig;
use super::{Summarizer, SYSTEM_PREAMBLE};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
    model: &'a str,
    max_tokens: u64,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

/// Summarizer that talks to the Messages API with a plain `reqwest` call.
pub struct HttpSummarizer {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    max_tokens: u64,
}

impl HttpSummarizer {
    pub fn new(config: &SummarizerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.messages_url(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }
}

impl Summarizer for HttpSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<ResponseEnvelope> {
        let request = MessageRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: SYSTEM_PREAMBLE,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(interpret_body(status, &body))
    }
}

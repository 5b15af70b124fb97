//! The "AI Buddy": forwards a free-text question to an OpenAI-compatible
//! chat-completions endpoint.
use anyhow::{Context, Result, bail};
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::AssistantConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskOutcome {
    Answer(String),
    Error(String),
    /// The question was empty; nothing was sent.
    Blank,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Clone)]
pub struct Assistant {
    client: Client,
    config: AssistantConfig,
}

impl Assistant {
    pub fn new(config: AssistantConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub async fn ask(&self, question: &str) -> AskOutcome {
        if question.trim().is_empty() {
            warn!("Rejected blank question");
            return AskOutcome::Blank;
        }
        match self.complete(question).await {
            Ok(answer) => {
                info!("Assistant answered ({} chars)", answer.len());
                AskOutcome::Answer(answer)
            }
            Err(e) => {
                error!("Assistant request failed: {:#}", e);
                AskOutcome::Error(format!("{e:#}"))
            }
        }
    }

    async fn complete(&self, question: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .context("the assistant is not configured (OPENAI_API_KEY is not set)")?;
        let endpoint = format!(
            "{}/chat/completions",
            self.config.api_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: question,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };
        debug!("Sending question to {}", endpoint);
        let resp = self
            .client
            .post(endpoint)
            .json(&payload)
            .header(
                "Authorization",
                format!("Bearer {}", api_key.expose_secret()),
            )
            .timeout(self.config.timeout)
            .send()
            .await
            .context("Network error")?;
        let status = resp.status();
        let body = resp.text().await.context("Network error")?;
        extract_answer(status, &body)
    }
}

/// Error bodies from gateways are often HTML, so the status is checked
/// before the body is treated as JSON.
fn extract_answer(status: StatusCode, body: &str) -> Result<String> {
    if !status.is_success() {
        let msg = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|data| {
                data.pointer("/error/message")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            });
        match msg {
            Some(msg) => bail!("API error ({}): {}", status, msg),
            None => bail!("API error ({})", status),
        }
    }
    let data: serde_json::Value = serde_json::from_str(body)
        .with_context(|| format!("Parse error ({status})"))?;
    match data
        .pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())
    {
        Some(content) => Ok(content.trim().to_string()),
        None => bail!("No answer in response"),
    }
}

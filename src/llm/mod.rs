//! OpenAI-compatible chat-completion client for the generation backend.
//!
//! Guarantees transport correctness, per-chunk isolation of failure, and
//! exactly one GenerationResult per chunk. Makes no promise about the
//! quality of the generated text.

pub mod retry;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::chunking::Chunk;
use crate::config::Config;
use crate::error::LlmError;
use crate::models::GenerationResult;
use retry::RetryPolicy;

/// What the client needs from a chunk, detached from the pipeline's
/// borrows so generation can run on spawned worker tasks.
#[derive(Debug, Clone)]
pub struct ChunkPayload {
    pub index: usize,
    pub text: String,
    pub char_len: usize,
    pub oversized: bool,
}

impl ChunkPayload {
    pub fn from_chunk(chunk: &Chunk<'_>) -> Self {
        Self {
            index: chunk.index,
            text: chunk.text.clone(),
            char_len: chunk.char_len,
            oversized: chunk.oversized,
        }
    }
}

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

const SYSTEM_PROMPT: &str = "You are a daily report assistant. \
Analyze the user's work activity log and write a structured daily report in Markdown.\n\
Structure the report with exactly these five sections, in this order:\n\
## Purpose\n\
## Work Done\n\
## Learnings\n\
## AI-Output Log\n\
## Next Steps\n\
\n\
Keep the report concise and readable.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

pub struct LlmClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    timeout: Duration,
    retry: RetryPolicy,
}

impl LlmClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.llm.endpoint.clone(),
            model: config.llm.model.clone(),
            max_tokens: config.llm.max_tokens,
            temperature: config.llm.temperature,
            timeout: config.request_timeout(),
            retry: RetryPolicy::from_config(&config.llm),
        }
    }

    /// Generate the report fragment for one chunk. Never propagates an
    /// error: retries run out or a non-retryable failure occurs and the
    /// chunk is marked Failed, leaving the rest of the run untouched.
    pub async fn generate_chunk(
        &self,
        chunk: &ChunkPayload,
        date: NaiveDate,
        total_chunks: usize,
    ) -> GenerationResult {
        if chunk.oversized {
            log_warn!(
                "chunk {} exceeds the configured budget ({} chars); sending whole and \
                 relying on the backend's own context handling",
                chunk.index,
                chunk.char_len
            );
        }

        let user_prompt = build_user_prompt(chunk, date, total_chunks);

        match self.generate(&user_prompt).await {
            Ok(text) => {
                log_info!(
                    "chunk {}/{} generated ({} chars)",
                    chunk.index + 1,
                    total_chunks,
                    text.chars().count()
                );
                GenerationResult::success(chunk.index, text)
            }
            Err(err) => {
                log_error!(
                    "chunk {}/{} failed: {}",
                    chunk.index + 1,
                    total_chunks,
                    err
                );
                GenerationResult::failed(chunk.index, err.to_string())
            }
        }
    }

    /// Retry loop around a single chat completion. Transient failures back
    /// off exponentially; non-retryable ones surface immediately.
    async fn generate(&self, user_prompt: &str) -> Result<String, LlmError> {
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..self.retry.max_attempts {
            if attempt > 0 {
                let delay = self.retry.delay_for_attempt(attempt - 1);
                log_info!(
                    "retrying in {:?} (attempt {}/{})",
                    delay,
                    attempt + 1,
                    self.retry.max_attempts
                );
                tokio::time::sleep(delay).await;
            }

            match self.request_once(user_prompt).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_retryable() => {
                    log_warn!(
                        "attempt {}/{} failed: {}",
                        attempt + 1,
                        self.retry.max_attempts,
                        err
                    );
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            LlmError::Transport("retry loop exhausted without an attempt".into())
        }))
    }

    async fn request_once(&self, user_prompt: &str) -> Result<String, LlmError> {
        let payload = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    LlmError::Timeout(self.timeout.as_secs())
                } else {
                    LlmError::Transport(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Backend {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|err| LlmError::InvalidResponse(err.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("response has no choices".into()))?;

        if content.is_empty() {
            return Err(LlmError::InvalidResponse(
                "response message has empty content".into(),
            ));
        }

        Ok(content)
    }
}

fn build_user_prompt(chunk: &ChunkPayload, date: NaiveDate, total_chunks: usize) -> String {
    let part_header = if total_chunks > 1 {
        format!("[Part {}/{}]\n\n", chunk.index + 1, total_chunks)
    } else {
        String::new()
    };

    format!(
        "Write the daily report for {date} from the following activity log.\n\n\
         {part_header}{log}\n\n\
         Analyze the log above and produce the Markdown report.",
        date = date,
        part_header = part_header,
        log = chunk.text
    )
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 500;
    if body.chars().count() <= MAX {
        body.to_string()
    } else {
        let cut: String = body.chars().take(MAX).collect();
        format!("{cut}…")
    }
}

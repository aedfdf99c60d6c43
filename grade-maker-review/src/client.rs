//! Minimal blocking client for an OpenAI-compatible chat API.

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::ReviewError;

const DEFAULT_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// A chat-completions client tied to one endpoint and one model.
///
/// The client is blocking: the callers fan the requests out over worker
/// threads, like the rest of the pipeline.
#[derive(Debug)]
pub struct ChatClient {
    http: Client,
    url: String,
    model: String,
    api_key: String,
    organization: Option<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: String,
}

impl ChatClient {
    /// Build a client from the environment.
    ///
    /// `OPENAI_API_KEY` (mandatory) and `OPENAI_ORG_ID` (optional) are read
    /// from the environment, loading a `.env` file first when present. The
    /// model and endpoint default to OpenAI but can be overridden to target
    /// any compatible API.
    pub fn from_env(model: Option<String>, url: Option<String>) -> Result<ChatClient, ReviewError> {
        let _ = dotenvy::dotenv();
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| ReviewError::MissingApiKey)?;
        let organization = std::env::var("OPENAI_ORG_ID").ok();
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(ChatClient {
            http,
            url: url.unwrap_or_else(|| DEFAULT_URL.into()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.into()),
            api_key,
            organization,
        })
    }

    /// Send `system` as the system message, asking for a JSON object back.
    ///
    /// Returns the raw content of the first choice; the caller parses it.
    pub fn complete_json(&self, system: &str) -> Result<String, ReviewError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "system",
                content: system,
            }],
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };
        debug!("requesting a completion from {} ({})", self.url, self.model);
        let mut builder = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request);
        if let Some(organization) = &self.organization {
            builder = builder.header("OpenAI-Organization", organization);
        }
        let response = builder.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ReviewError::Api {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        let body: ChatResponse = response.json()?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ReviewError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responses_are_deserialized() {
        let raw = r#"{"choices":[{"message":{"content":"{\"valid\": \"valid\"}"}}]}"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            response.choices[0].message.content,
            "{\"valid\": \"valid\"}"
        );
    }

    #[test]
    fn requests_ask_for_json() {
        let request = ChatRequest {
            model: "test-model",
            messages: vec![Message {
                role: "system",
                content: "prompt",
            }],
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };
        let raw = serde_json::to_value(&request).unwrap();
        assert_eq!(raw["response_format"]["type"], "json_object");
        assert_eq!(raw["messages"][0]["role"], "system");
    }
}

//! Chat-completion client.
//!
//! Owns the one request/response cycle against the completion endpoint:
//! build the system prompt, POST the user input, parse the reply, and decide
//! whether the model produced a runnable command or declined. The sentinel
//! flag the model is told to prefix onto non-command replies lives here and
//! is shared with the prompt builder; it never leaves this module except
//! inside the instruction text itself.

pub mod prompt;

use crate::config::{OpenAiConfig, OPENAI_KEY_PLACEHOLDER};
use crate::context::EnvContext;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Marker the model prefixes onto replies that are not executable commands.
pub(crate) const ERROR_FLAG: &str = "GENERR";

/// The only error text ever shown to the user. Real causes go to the logs.
const ERROR_MESSAGE: &str = "An error occurred.";

/// Outcome of one completion exchange, fully materialized before return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// A command ready to hand to the shell.
    Command(String),
    /// The model declined; the text explains why.
    Declined(String),
}

/// Errors from the completion client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// API key missing or still the placeholder. Raised at construction,
    /// before any network traffic.
    #[error("openai api key is not defined")]
    Configuration,
    /// The endpoint could not be reached or the exchange was cut short.
    #[error("request to the completion endpoint failed")]
    Transport(#[source] reqwest::Error),
    /// The endpoint answered with something other than a chat completion.
    #[error("unexpected completion response: {reason}")]
    Protocol {
        reason: String,
        #[source]
        source: Option<serde_json::Error>,
    },
}

impl ClientError {
    /// Fixed text shown to the user for any failure. The underlying cause
    /// stays on the error value for diagnostics.
    pub fn display_message(&self) -> &'static str {
        ERROR_MESSAGE
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Client for the chat-completion endpoint.
///
/// Holds only immutable configuration; `send` is stateless, so concurrent
/// calls on a shared client are fine.
#[derive(Debug)]
pub struct Client {
    config: OpenAiConfig,
    context: EnvContext,
    http: reqwest::Client,
}

impl Client {
    /// Create a client, validating the credential up front.
    pub fn new(config: OpenAiConfig, context: EnvContext) -> Result<Self, ClientError> {
        if config.api_key.is_empty() || config.api_key == OPENAI_KEY_PLACEHOLDER {
            return Err(ClientError::Configuration);
        }

        let mut builder = reqwest::Client::builder();
        // No timeout unless configured; long generations are allowed to run.
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let http = builder.build().map_err(ClientError::Transport)?;

        Ok(Self {
            config,
            context,
            http,
        })
    }

    /// Send one completion request and classify the reply.
    ///
    /// Exactly one outbound call per invocation; no retries, no caching.
    pub async fn send(&self, input: &str) -> Result<Completion, ClientError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompt::build_system_prompt(&self.context),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: input.to_string(),
                },
            ],
        };

        debug!(model = %self.config.model, url = %self.config.url, "sending completion request");

        let response = self
            .http
            .post(&self.config.url)
            .header("Content-Type", "application/json")
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(ClientError::Transport)?;
        debug!(%status, bytes = body.len(), "completion response received");

        parse_completion(&body)
    }
}

/// Parse a response body and classify the first choice.
///
/// An upstream error payload has no `choices` and lands here as a protocol
/// error, which is also why the HTTP status is not branched on.
fn parse_completion(body: &str) -> Result<Completion, ClientError> {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| ClientError::Protocol {
        reason: "body is not a chat completion".to_string(),
        source: Some(e),
    })?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| ClientError::Protocol {
            reason: "response contained no choices".to_string(),
            source: None,
        })?;

    Ok(classify(&content))
}

/// Apply the sentinel convention to a raw completion.
fn classify(content: &str) -> Completion {
    let output = content.trim_matches('\n');
    if output.contains(ERROR_FLAG) {
        Completion::Declined(output.replace(ERROR_FLAG, ""))
    } else {
        Completion::Command(output.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Os;

    fn test_context() -> EnvContext {
        EnvContext {
            os: Os::Linux,
            distro: None,
            shell: None,
            home_dir: None,
        }
    }

    fn config_with_key(key: &str) -> OpenAiConfig {
        OpenAiConfig {
            api_key: key.to_string(),
            ..OpenAiConfig::default()
        }
    }

    #[test]
    fn test_classify_trims_newlines() {
        assert_eq!(
            classify("\nls -la\n"),
            Completion::Command("ls -la".to_string())
        );
    }

    #[test]
    fn test_classify_sentinel_prefix() {
        assert_eq!(
            classify("GENERRI cannot do that"),
            Completion::Declined("I cannot do that".to_string())
        );
    }

    #[test]
    fn test_classify_strips_every_sentinel() {
        assert_eq!(
            classify("GENERRno command hereGENERR"),
            Completion::Declined("no command here".to_string())
        );
    }

    #[test]
    fn test_classify_plain_command() {
        assert_eq!(
            classify("du -sh *"),
            Completion::Command("du -sh *".to_string())
        );
    }

    #[test]
    fn test_parse_completion_roundtrip() {
        let body = r#"{"choices":[{"message":{"content":"\nls -la\n"}}]}"#;
        assert_eq!(
            parse_completion(body).unwrap(),
            Completion::Command("ls -la".to_string())
        );
    }

    #[test]
    fn test_parse_completion_only_first_choice() {
        let body = r#"{"choices":[{"message":{"content":"pwd"}},{"message":{"content":"ls"}}]}"#;
        assert_eq!(
            parse_completion(body).unwrap(),
            Completion::Command("pwd".to_string())
        );
    }

    #[test]
    fn test_parse_completion_empty_choices() {
        let err = parse_completion(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, ClientError::Protocol { .. }));
        assert_eq!(err.display_message(), "An error occurred.");
    }

    #[test]
    fn test_parse_completion_malformed_body() {
        let err = parse_completion("not json").unwrap_err();
        match err {
            ClientError::Protocol { source, .. } => assert!(source.is_some()),
            other => panic!("expected protocol error, got {:?}", other),
        }
    }

    #[test]
    fn test_new_rejects_placeholder_key() {
        let err = Client::new(config_with_key(OPENAI_KEY_PLACEHOLDER), test_context()).unwrap_err();
        assert!(matches!(err, ClientError::Configuration));
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let err = Client::new(config_with_key(""), test_context()).unwrap_err();
        assert!(matches!(err, ClientError::Configuration));
    }

    #[test]
    fn test_new_accepts_real_key() {
        assert!(Client::new(config_with_key("sk-test"), test_context()).is_ok());
    }
}

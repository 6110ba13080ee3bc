use chrono::{DateTime, Utc};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::export::TranscriptSink;
use super::transcript::Transcript;
use crate::error::{ExportResult, ServiceError, StorageResult, WorkflowError, WorkflowResult};
use crate::service::{AskRequest, CaseServiceClient, ConversationMessage, Role};
use crate::storage::KeyValueStore;

/// Shown when the question never reached the service or the reply was unreadable.
pub const ASK_FAILED_MESSAGE: &str = "Something went wrong while asking the question.";

const OPERATION: &str = "Question";

/// Outcome of [`ConversationSession::ask`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskOutcome {
    /// Blank question; nothing appended, nothing sent.
    Ignored,
    /// The assistant's reply, already appended to the history.
    Answered(String),
}

#[derive(Debug, Default)]
struct SessionState {
    history: Vec<ConversationMessage>,
    input: String,
    pending: bool,
    error: Option<String>,
}

/// Persisted question-and-answer conversation about the case material.
///
/// The history is written to the durable store after every change and read
/// back once by [`ConversationSession::restore`]. Only one question may be
/// outstanding at a time.
#[derive(Clone)]
pub struct ConversationSession {
    client: CaseServiceClient,
    store: Arc<dyn KeyValueStore>,
    storage_key: String,
    state: Arc<Mutex<SessionState>>,
}

impl ConversationSession {
    /// Start a session seeded from the durable store.
    ///
    /// A missing, unreadable, or corrupt value yields an empty history.
    pub async fn restore(
        client: CaseServiceClient,
        store: Arc<dyn KeyValueStore>,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();

        let history = match store.get(&storage_key).await {
            Ok(Some(raw)) => parse_history(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = %storage_key, error = %e, "Could not read saved conversation");
                Vec::new()
            }
        };

        info!(key = %storage_key, messages = history.len(), "Conversation restored");

        Self {
            client,
            store,
            storage_key,
            state: Arc::new(Mutex::new(SessionState {
                history,
                ..SessionState::default()
            })),
        }
    }

    /// Ask a question about the uploaded material.
    ///
    /// The question is appended and persisted before the request is sent,
    /// and stays in the history even if no answer arrives.
    pub async fn ask(&self, question: &str) -> WorkflowResult<AskOutcome> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(AskOutcome::Ignored);
        }

        let history = {
            let mut state = self.state.lock().await;
            if state.pending {
                return Err(WorkflowError::busy(OPERATION));
            }

            state.history.push(ConversationMessage::user(question));
            state.input.clear();
            state.error = None;
            state.pending = true;
            self.persist(&state.history).await;
            state.history.clone()
        };

        debug!(history = history.len(), "Question appended");

        let outcome = self.client.ask(&AskRequest::new(question, history)).await;

        let mut state = self.state.lock().await;
        state.pending = false;

        match outcome {
            Ok(reply) => {
                let answer = reply.into_text();
                state
                    .history
                    .push(ConversationMessage::assistant(answer.clone()));
                self.persist(&state.history).await;
                info!(messages = state.history.len(), "Answer appended");
                Ok(AskOutcome::Answered(answer))
            }
            Err(source) => {
                let message = ask_error_message(&source);
                if source.is_transport() {
                    error!(error = %source, "Question request did not complete");
                } else {
                    warn!(error = %source, "Question rejected");
                }
                state.error = Some(message.clone());
                Err(WorkflowError::Service { message, source })
            }
        }
    }

    /// Ask whatever is currently in the input field
    pub async fn ask_input(&self) -> WorkflowResult<AskOutcome> {
        let input = self.state.lock().await.input.clone();
        self.ask(&input).await
    }

    /// Empty the history, input and error, and erase the saved copy.
    pub async fn clear(&self) -> StorageResult<()> {
        let mut state = self.state.lock().await;
        state.history.clear();
        state.input.clear();
        state.error = None;
        self.store.remove(&self.storage_key).await?;
        info!(key = %self.storage_key, "Conversation cleared");
        Ok(())
    }

    /// Render the transcript as of `now` without saving it
    pub async fn transcript_at(&self, now: DateTime<Utc>) -> Transcript {
        let state = self.state.lock().await;
        Transcript::new(&state.history, now)
    }

    /// Export the transcript through `sink`
    pub async fn export(&self, sink: &dyn TranscriptSink) -> ExportResult<PathBuf> {
        let transcript = self.transcript_at(Utc::now()).await;
        sink.save(&transcript).await
    }

    pub async fn set_input(&self, text: impl Into<String>) {
        self.state.lock().await.input = text.into();
    }

    pub async fn input(&self) -> String {
        self.state.lock().await.input.clone()
    }

    pub async fn history(&self) -> Vec<ConversationMessage> {
        self.state.lock().await.history.clone()
    }

    pub async fn is_pending(&self) -> bool {
        self.state.lock().await.pending
    }

    /// Text for the inline error under the question box
    pub async fn error(&self) -> Option<String> {
        self.state.lock().await.error.clone()
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Write the history under the session key. Failures are logged only;
    /// the in-memory history stays authoritative.
    async fn persist(&self, history: &[ConversationMessage]) {
        let raw = match serde_json::to_string(history) {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, "Failed to serialize conversation");
                return;
            }
        };
        if let Err(e) = self.store.set(&self.storage_key, &raw).await {
            error!(key = %self.storage_key, error = %e, "Failed to save conversation");
        }
    }
}

/// Decode a saved history.
///
/// Any JSON array is kept. Each entry is read leniently: a missing role
/// becomes an empty one, and a missing or `null` content becomes empty text.
/// Anything that is not an array yields an empty history.
pub fn parse_history(raw: &str) -> Vec<ConversationMessage> {
    match serde_json::from_str::<Vec<Value>>(raw) {
        Ok(entries) => entries.iter().map(message_from_value).collect(),
        Err(e) => {
            debug!(error = %e, "Ignoring unreadable saved conversation");
            Vec::new()
        }
    }
}

fn message_from_value(entry: &Value) -> ConversationMessage {
    let role = entry
        .get("role")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let content = match entry.get("content") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    };
    ConversationMessage {
        role: Role::from(role),
        content,
    }
}

/// Response body when present, status-coded text otherwise.
fn ask_error_message(err: &ServiceError) -> String {
    match err {
        ServiceError::Api { status, message } if message.is_empty() => {
            format!("Failed to get answer (status {}).", status)
        }
        ServiceError::Api { message, .. } => message.clone(),
        _ => ASK_FAILED_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_history_valid() {
        let history = parse_history(r#"[{"role":"user","content":"Q1"}]"#);
        assert_eq!(history, vec![ConversationMessage::user("Q1")]);
    }

    #[test]
    fn test_parse_history_corrupt_is_empty() {
        assert!(parse_history("{not json").is_empty());
        assert!(parse_history(r#"{"role":"user"}"#).is_empty());
        assert!(parse_history("42").is_empty());
    }

    #[test]
    fn test_parse_history_keeps_malformed_entries() {
        let history = parse_history(
            r#"[{"role":"user","content":"Q1"},{"role":"assistant","content":"A1"},{"role":"assistant","content":null},{"content":"orphan"},{"role":"narrator","content":"x"}]"#,
        );

        assert_eq!(history.len(), 5);
        assert_eq!(history[0], ConversationMessage::user("Q1"));
        assert_eq!(history[2], ConversationMessage::assistant(""));
        assert_eq!(history[3].role, Role::Other(String::new()));
        assert_eq!(history[3].role.label(), "MESSAGE");
        assert_eq!(history[3].content, "orphan");
        assert_eq!(history[4].role.as_str(), "narrator");
        assert_eq!(history[4].role.label(), "NARRATOR");
    }

    #[test]
    fn test_ask_error_message() {
        let err = ServiceError::Api {
            status: 500,
            message: String::new(),
        };
        assert_eq!(ask_error_message(&err), "Failed to get answer (status 500).");

        let err = ServiceError::Api {
            status: 400,
            message: "No documents indexed".to_string(),
        };
        assert_eq!(ask_error_message(&err), "No documents indexed");

        let err = ServiceError::Timeout { timeout_ms: 5 };
        assert_eq!(ask_error_message(&err), ASK_FAILED_MESSAGE);
    }
}

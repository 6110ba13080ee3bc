use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::{CaseInputs, Phase, RequestSlot};
use crate::error::{ServiceError, WorkflowError, WorkflowResult};
use crate::expansion::{row_key, section_key, ExpansionState};
use crate::service::{Bucket, CaseServiceClient, RelevanceResult};

/// Shown when the case summary (the classification criteria) is blank.
pub const CRITERIA_REQUIRED_MESSAGE: &str = "Case Summary is required for relevance check.";
/// Shown when nothing is staged.
pub const NO_DOCUMENTS_FOR_RELEVANCE_MESSAGE: &str =
    "Please upload at least one document before running relevance check.";
/// Shown when the request never completed.
pub const RELEVANCE_FAILED_MESSAGE: &str =
    "Something went wrong while getting relevance results.";

const OPERATION: &str = "Relevance check";

#[derive(Debug, Default)]
struct RelevanceState {
    slot: RequestSlot<RelevanceResult>,
    expansion: ExpansionState,
}

/// Drives the "documents + criteria → five buckets" request cycle and
/// tracks which result sections are open.
#[derive(Clone)]
pub struct RelevanceOrchestrator {
    client: CaseServiceClient,
    inputs: CaseInputs,
    state: Arc<RwLock<RelevanceState>>,
}

impl RelevanceOrchestrator {
    pub fn new(client: CaseServiceClient, inputs: CaseInputs) -> Self {
        Self {
            client,
            inputs,
            state: Arc::new(RwLock::new(RelevanceState::default())),
        }
    }

    /// Validate the inputs and classify the staged documents.
    ///
    /// The trimmed case summary is sent as the criteria. Starting a run
    /// closes every section and discards the previous result.
    pub async fn check(&self) -> WorkflowResult<RelevanceResult> {
        let (documents, metadata) = self.inputs.snapshot().await;
        let criteria = metadata.overview().map(str::to_string);

        let criteria = {
            let mut state = self.state.write().await;
            state.slot.ensure_idle(OPERATION)?;

            let Some(criteria) = criteria else {
                state.slot.reject(CRITERIA_REQUIRED_MESSAGE);
                return Err(WorkflowError::validation(CRITERIA_REQUIRED_MESSAGE));
            };
            if documents.is_empty() {
                state.slot.reject(NO_DOCUMENTS_FOR_RELEVANCE_MESSAGE);
                return Err(WorkflowError::validation(NO_DOCUMENTS_FOR_RELEVANCE_MESSAGE));
            }

            state.slot.begin(OPERATION)?;
            state.expansion.reset();
            criteria
        };

        info!(documents = documents.len(), "Relevance check started");
        let start = Instant::now();

        let outcome = self
            .client
            .check_relevance(&criteria, &metadata, &documents)
            .await;

        let mut state = self.state.write().await;
        match outcome {
            Ok(result) => {
                info!(
                    highly_relevant = result.highly_relevant.len(),
                    partially_relevant = result.partially_relevant.len(),
                    less_relevant = result.less_relevant.len(),
                    not_relevant = result.not_relevant.len(),
                    failed = result.failed.len(),
                    latency_ms = start.elapsed().as_millis(),
                    "Relevance check completed"
                );
                state.slot.succeed(result.clone());
                Ok(result)
            }
            Err(source) => {
                let message = relevance_error_message(&source);
                if source.is_transport() {
                    error!(error = %source, "Relevance request did not complete");
                } else {
                    warn!(error = %source, "Relevance check rejected");
                }
                state.slot.fail(message.clone());
                Err(WorkflowError::Service { message, source })
            }
        }
    }

    /// Flip an arbitrary section key and return the new flag
    pub async fn toggle(&self, key: &str) -> bool {
        self.state.write().await.expansion.toggle(key)
    }

    /// Flip a whole bucket section
    pub async fn toggle_bucket(&self, bucket: Bucket) -> bool {
        self.toggle(&section_key(bucket.title())).await
    }

    /// Flip one document row. Returns `None` when there is no such row.
    pub async fn toggle_row(&self, bucket: Bucket, position: usize) -> Option<bool> {
        let mut state = self.state.write().await;
        let name = state
            .slot
            .result()?
            .bucket(bucket)
            .get(position)?
            .name
            .clone();
        Some(
            state
                .expansion
                .toggle(row_key(bucket.title(), &name, position)),
        )
    }

    pub async fn is_open(&self, key: &str) -> bool {
        self.state.read().await.expansion.is_open(key)
    }

    /// Copy of the current open/closed map
    pub async fn expansion(&self) -> ExpansionState {
        self.state.read().await.expansion.clone()
    }

    pub async fn phase(&self) -> Phase {
        self.state.read().await.slot.phase()
    }

    pub async fn is_pending(&self) -> bool {
        self.state.read().await.slot.is_pending()
    }

    pub async fn result(&self) -> Option<RelevanceResult> {
        self.state.read().await.slot.result().cloned()
    }

    /// Text for the inline error next to the relevance control
    pub async fn error(&self) -> Option<String> {
        self.state.read().await.slot.error().map(str::to_string)
    }

    pub fn inputs(&self) -> &CaseInputs {
        &self.inputs
    }
}

/// Response body when present, status-coded text otherwise.
fn relevance_error_message(err: &ServiceError) -> String {
    match err {
        ServiceError::Api { status, message } if message.is_empty() => {
            format!("Error getting relevance (status {}).", status)
        }
        ServiceError::Api { message, .. } => message.clone(),
        _ => RELEVANCE_FAILED_MESSAGE.to_string(),
    }
}

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::{CaseInputs, Phase, RequestSlot};
use crate::error::{ServiceError, WorkflowError, WorkflowResult};
use crate::service::{AnalysisResult, CaseServiceClient};

/// Shown when analysis is triggered with nothing staged.
pub const NO_DOCUMENTS_MESSAGE: &str = "Please upload at least one document.";
/// Shown when analysis is triggered with a blank case summary.
pub const SUMMARY_REQUIRED_MESSAGE: &str = "Case Summary is required.";
/// Shown when the request never completed.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Error analyzing case.";

const OPERATION: &str = "Case analysis";

/// Drives the "documents + metadata → findings" request cycle.
#[derive(Clone)]
pub struct AnalysisOrchestrator {
    client: CaseServiceClient,
    inputs: CaseInputs,
    state: Arc<RwLock<RequestSlot<AnalysisResult>>>,
}

impl AnalysisOrchestrator {
    pub fn new(client: CaseServiceClient, inputs: CaseInputs) -> Self {
        Self {
            client,
            inputs,
            state: Arc::new(RwLock::new(RequestSlot::new())),
        }
    }

    /// Validate the inputs and submit them for analysis.
    ///
    /// Staged documents and metadata are left untouched whatever the outcome.
    pub async fn submit(&self) -> WorkflowResult<AnalysisResult> {
        let (documents, metadata) = self.inputs.snapshot().await;

        {
            let mut state = self.state.write().await;
            state.ensure_idle(OPERATION)?;

            if documents.is_empty() {
                state.reject(NO_DOCUMENTS_MESSAGE);
                return Err(WorkflowError::validation(NO_DOCUMENTS_MESSAGE));
            }
            if metadata.overview().is_none() {
                state.reject(SUMMARY_REQUIRED_MESSAGE);
                return Err(WorkflowError::validation(SUMMARY_REQUIRED_MESSAGE));
            }

            state.begin(OPERATION)?;
        }

        info!(documents = documents.len(), "Case analysis started");
        let start = Instant::now();

        let outcome = self.client.analyze_case(&documents, &metadata).await;

        let mut state = self.state.write().await;
        match outcome {
            Ok(result) => {
                info!(
                    issues = result.issues.len(),
                    latency_ms = start.elapsed().as_millis(),
                    "Case analysis completed"
                );
                state.succeed(result.clone());
                Ok(result)
            }
            Err(source) => {
                let message = analysis_error_message(&source);
                if source.is_transport() {
                    error!(error = %source, "Case analysis request did not complete");
                } else {
                    warn!(error = %source, "Case analysis rejected");
                }
                state.fail(message.clone());
                Err(WorkflowError::Service { message, source })
            }
        }
    }

    pub async fn phase(&self) -> Phase {
        self.state.read().await.phase()
    }

    pub async fn is_pending(&self) -> bool {
        self.state.read().await.is_pending()
    }

    /// Latest successful result, if any
    pub async fn result(&self) -> Option<AnalysisResult> {
        self.state.read().await.result().cloned()
    }

    /// Text for the inline error next to the analyze control
    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error().map(str::to_string)
    }

    pub fn inputs(&self) -> &CaseInputs {
        &self.inputs
    }
}

/// Status-coded text for server rejections, generic text otherwise.
fn analysis_error_message(err: &ServiceError) -> String {
    match err {
        ServiceError::Api { status, .. } => {
            format!("Error analyzing case (status {}).", status)
        }
        _ => ANALYSIS_FAILED_MESSAGE.to_string(),
    }
}

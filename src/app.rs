//! Shared application state.

use std::sync::Arc;

use crate::config::Config;
use crate::conversation::ConversationSession;
use crate::service::CaseServiceClient;
use crate::storage::KeyValueStore;
use crate::workflow::{AnalysisOrchestrator, CaseInputs, RelevanceOrchestrator};

/// Everything a front end needs: the shared case inputs, both orchestrators,
/// and the conversation session.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Staged documents and case metadata.
    pub inputs: CaseInputs,
    /// Case analysis request cycle.
    pub analysis: AnalysisOrchestrator,
    /// Relevance classification request cycle.
    pub relevance: RelevanceOrchestrator,
    /// Persisted Q&A conversation.
    pub conversation: ConversationSession,
}

impl AppState {
    /// Wire up the components. Reads the saved conversation once.
    pub async fn new(
        config: Config,
        client: CaseServiceClient,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let inputs = CaseInputs::new();
        let analysis = AnalysisOrchestrator::new(client.clone(), inputs.clone());
        let relevance = RelevanceOrchestrator::new(client.clone(), inputs.clone());
        let conversation =
            ConversationSession::restore(client, store, config.chat.storage_key.clone()).await;

        tracing::info!(
            base_url = %config.service.base_url,
            storage_key = %config.chat.storage_key,
            "AppState initialized"
        );

        Self {
            config,
            inputs,
            analysis,
            relevance,
            conversation,
        }
    }
}

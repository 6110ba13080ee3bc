//! Request/response orchestrators for case analysis and relevance checks.
//!
//! - [`AnalysisOrchestrator`]: documents + metadata → findings
//! - [`RelevanceOrchestrator`]: documents + criteria → five buckets
//!
//! Both read the shared [`CaseInputs`] and own independent state, so they
//! can run at the same time.

mod analysis;
mod phase;
mod relevance;

pub use analysis::*;
pub use phase::*;
pub use relevance::*;

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::metadata::{CaseMetadata, MetadataField};
use crate::staging::{AddOutcome, DocumentSource, DocumentStore, StagedDocument};

/// Staged documents and case metadata shared by both orchestrators.
#[derive(Clone, Default)]
pub struct CaseInputs {
    documents: Arc<RwLock<DocumentStore>>,
    metadata: Arc<RwLock<CaseMetadata>>,
}

impl CaseInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create inputs pre-filled with metadata
    pub fn with_metadata(metadata: CaseMetadata) -> Self {
        Self {
            documents: Arc::default(),
            metadata: Arc::new(RwLock::new(metadata)),
        }
    }

    /// Stage documents through the store's size check
    pub async fn add_documents(
        &self,
        source: DocumentSource,
        files: impl IntoIterator<Item = StagedDocument>,
    ) -> AddOutcome {
        self.documents.write().await.add(source, files)
    }

    pub async fn remove_document(&self, index: usize) -> Option<StagedDocument> {
        self.documents.write().await.remove(index)
    }

    pub async fn clear_documents(&self) {
        self.documents.write().await.clear();
    }

    pub async fn set_field(&self, field: MetadataField, value: impl Into<String>) {
        self.metadata.write().await.set(field, value);
    }

    pub async fn document_count(&self) -> usize {
        self.documents.read().await.len()
    }

    pub fn documents(&self) -> &Arc<RwLock<DocumentStore>> {
        &self.documents
    }

    pub fn metadata(&self) -> &Arc<RwLock<CaseMetadata>> {
        &self.metadata
    }

    /// Copy of the current documents and metadata for one submission.
    pub(crate) async fn snapshot(&self) -> (Vec<StagedDocument>, CaseMetadata) {
        let documents = self.documents.read().await.documents().to_vec();
        let metadata = self.metadata.read().await.clone();
        (documents, metadata)
    }
}

//! Document staging store.
//!
//! Holds the files queued for submission to the case service. Every
//! candidate, whether it came from a file picker or a drag-and-drop,
//! goes through the same size check before it is staged.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

/// Largest accepted document: 100 MiB.
pub const MAX_DOCUMENT_BYTES: u64 = 100 * 1024 * 1024;

/// Where a document's bytes live until submission.
#[derive(Debug, Clone)]
pub enum DocumentContent {
    /// Read from disk when the document is submitted.
    File(PathBuf),
    /// Already held in memory.
    Memory(Arc<[u8]>),
}

impl DocumentContent {
    /// Load the full document content.
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match self {
            DocumentContent::File(path) => tokio::fs::read(path).await,
            DocumentContent::Memory(bytes) => Ok(bytes.to_vec()),
        }
    }
}

impl PartialEq for DocumentContent {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DocumentContent::File(a), DocumentContent::File(b)) => a == b,
            (DocumentContent::Memory(a), DocumentContent::Memory(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A file selected by the user for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedDocument {
    /// File name sent with the upload.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Content handle.
    pub content: DocumentContent,
}

impl StagedDocument {
    /// Create a document from in-memory bytes
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            content: DocumentContent::Memory(Arc::from(bytes)),
        }
    }

    /// Create a document from an explicit size and content handle
    pub fn new(name: impl Into<String>, size: u64, content: DocumentContent) -> Self {
        Self {
            name: name.into(),
            size,
            content,
        }
    }

    /// Create a document backed by a file on disk.
    ///
    /// Only the file metadata is read here; the content is loaded at
    /// submission time.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            size: metadata.len(),
            content: DocumentContent::File(path.to_path_buf()),
        })
    }

    /// Whether this document may enter the store
    pub fn within_limit(&self) -> bool {
        self.size <= MAX_DOCUMENT_BYTES
    }
}

/// How a batch of candidate files reached the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSource {
    /// File picker selection.
    Picker,
    /// Drag-and-drop onto the drop zone.
    DragDrop,
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::Picker => write!(f, "picker"),
            DocumentSource::DragDrop => write!(f, "drag_drop"),
        }
    }
}

/// A candidate refused at add-time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// File name as offered
    pub name: String,
    /// Size in bytes
    pub size: u64,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "File \"{}\" exceeds 100MB.", self.name)
    }
}

/// Result of one `add` call. Partial success is normal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddOutcome {
    /// Number of documents appended to the store
    pub added: usize,
    /// Oversized candidates, in arrival order
    pub rejected: Vec<Rejection>,
}

impl AddOutcome {
    /// User-facing warnings, one per rejected file
    pub fn warnings(&self) -> Vec<String> {
        self.rejected.iter().map(|r| r.to_string()).collect()
    }
}

/// Ordered set of staged documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Vec<StagedDocument>,
}

impl DocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage every candidate within the size limit, preserving arrival order.
    pub fn add(
        &mut self,
        source: DocumentSource,
        files: impl IntoIterator<Item = StagedDocument>,
    ) -> AddOutcome {
        let mut outcome = AddOutcome::default();

        for file in files {
            if !file.within_limit() {
                warn!(
                    name = %file.name,
                    size = file.size,
                    limit = MAX_DOCUMENT_BYTES,
                    source = %source,
                    "Rejected oversized document"
                );
                outcome.rejected.push(Rejection {
                    name: file.name,
                    size: file.size,
                });
                continue;
            }

            debug!(name = %file.name, size = file.size, source = %source, "Document staged");
            self.documents.push(file);
            outcome.added += 1;
        }

        outcome
    }

    /// Remove the document at `index`. Out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<StagedDocument> {
        if index >= self.documents.len() {
            return None;
        }
        Some(self.documents.remove(index))
    }

    /// Drop every staged document
    pub fn clear(&mut self) {
        self.documents.clear();
    }

    pub fn documents(&self) -> &[StagedDocument] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Combined size of all staged documents
    pub fn total_bytes(&self) -> u64 {
        self.documents.iter().map(|d| d.size).sum()
    }
}

/// Hover state of the drop zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropZone {
    dragging: bool,
}

impl DropZone {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer entered or moved over the zone
    pub fn drag_over(&mut self) {
        self.dragging = true;
    }

    /// Pointer left the zone
    pub fn drag_leave(&mut self) {
        self.dragging = false;
    }

    /// Files dropped on the zone; staged through the usual validation.
    pub fn drop_files(
        &mut self,
        store: &mut DocumentStore,
        files: Vec<StagedDocument>,
    ) -> AddOutcome {
        self.dragging = false;
        if files.is_empty() {
            return AddOutcome::default();
        }
        store.add(DocumentSource::DragDrop, files)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(name: &str, size: u64) -> StagedDocument {
        StagedDocument::new(name, size, DocumentContent::Memory(Arc::from(Vec::new())))
    }

    #[test]
    fn test_add_within_limit_grows_by_one() {
        let mut store = DocumentStore::new();
        let outcome = store.add(DocumentSource::Picker, vec![sized("a.pdf", 10)]);
        assert_eq!(outcome.added, 1);
        assert!(outcome.rejected.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_exactly_at_limit_is_accepted() {
        let mut store = DocumentStore::new();
        let outcome = store.add(
            DocumentSource::Picker,
            vec![sized("big.pdf", MAX_DOCUMENT_BYTES)],
        );
        assert_eq!(outcome.added, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_over_limit_is_rejected() {
        let mut store = DocumentStore::new();
        let outcome = store.add(
            DocumentSource::Picker,
            vec![sized("huge.pdf", MAX_DOCUMENT_BYTES + 1)],
        );
        assert_eq!(outcome.added, 0);
        assert_eq!(store.len(), 0);
        assert_eq!(outcome.warnings(), vec!["File \"huge.pdf\" exceeds 100MB."]);
    }

    #[test]
    fn test_add_partial_success_preserves_order() {
        let mut store = DocumentStore::new();
        let outcome = store.add(
            DocumentSource::DragDrop,
            vec![
                sized("one.pdf", 1),
                sized("too-big.pdf", MAX_DOCUMENT_BYTES + 10),
                sized("two.pdf", 2),
            ],
        );
        assert_eq!(outcome.added, 2);
        assert_eq!(outcome.rejected.len(), 1);
        let names: Vec<_> = store.documents().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["one.pdf", "two.pdf"]);
    }

    #[test]
    fn test_remove_drops_that_document() {
        let mut store = DocumentStore::new();
        store.add(
            DocumentSource::Picker,
            vec![sized("a", 1), sized("b", 2), sized("c", 3)],
        );
        let target = store.documents()[1].clone();

        let removed = store.remove(1).unwrap();
        assert_eq!(removed, target);
        assert_eq!(store.len(), 2);
        assert!(!store.documents().contains(&target));
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut store = DocumentStore::new();
        store.add(DocumentSource::Picker, vec![sized("a", 1)]);
        assert!(store.remove(5).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_identity_distinguishes_same_name_and_size() {
        let a = StagedDocument::from_bytes("dup.txt", b"abc".to_vec());
        let b = StagedDocument::from_bytes("dup.txt", b"abc".to_vec());
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_clear_and_total_bytes() {
        let mut store = DocumentStore::new();
        store.add(DocumentSource::Picker, vec![sized("a", 5), sized("b", 7)]);
        assert_eq!(store.total_bytes(), 12);
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_drop_zone_hover_state() {
        let mut zone = DropZone::new();
        let mut store = DocumentStore::new();
        assert!(!zone.is_dragging());

        zone.drag_over();
        assert!(zone.is_dragging());
        zone.drag_leave();
        assert!(!zone.is_dragging());

        zone.drag_over();
        let outcome = zone.drop_files(&mut store, vec![sized("dropped.pdf", 3)]);
        assert!(!zone.is_dragging());
        assert_eq!(outcome.added, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_drop_zone_uses_same_validation() {
        let mut zone = DropZone::new();
        let mut store = DocumentStore::new();
        let outcome = zone.drop_files(&mut store, vec![sized("x", MAX_DOCUMENT_BYTES + 1)]);
        assert_eq!(outcome.rejected.len(), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_from_path_reads_size_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memo.txt");
        std::fs::write(&path, b"hello").unwrap();

        let doc = StagedDocument::from_path(&path).await.unwrap();
        assert_eq!(doc.name, "memo.txt");
        assert_eq!(doc.size, 5);
        assert_eq!(doc.content.read().await.unwrap(), b"hello");
    }
}

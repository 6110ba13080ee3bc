//! # Legal Case Assistant
//!
//! Client-side orchestration for an AI-assisted legal case workflow. Users
//! stage case documents, describe the matter, and send both to a remote case
//! service for issue analysis, relevance classification, and conversational
//! Q&A.
//!
//! ## Components
//!
//! - **Document Staging**: size-checked, ordered list of files to submit
//! - **Case Metadata**: matter overview plus optional context fields
//! - **Case Analysis**: multipart submission returning a summary and issues
//! - **Relevance Classification**: sorts documents into five buckets
//! - **Conversation**: question/answer history persisted across restarts
//! - **Transcript Export**: plain-text export of the conversation
//!
//! ## Architecture
//!
//! ```text
//! CLI → AppState ─┬─ AnalysisOrchestrator  ─┐
//!                 ├─ RelevanceOrchestrator ─┼→ CaseServiceClient (HTTP)
//!                 └─ ConversationSession ───┘
//!                          ↓
//!                   KeyValueStore (SQLite)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use legal_case_assistant::{AppState, Config};
//! use legal_case_assistant::service::CaseServiceClient;
//! use legal_case_assistant::storage::SqliteStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let store = Arc::new(SqliteStore::new(&config.database).await?);
//!     let client = CaseServiceClient::new(&config.service, config.request.clone())?;
//!     let state = AppState::new(config, client, store).await;
//!     let answer = state.conversation.ask("Who signed the lease?").await?;
//!     println!("{:?}", answer);
//!     Ok(())
//! }
//! ```

/// Shared application state wiring.
pub mod app;
/// Command-line interface.
pub mod cli;
/// Configuration management.
pub mod config;
/// Conversation session, transcript rendering, and export.
pub mod conversation;
/// Error types and result aliases for the application.
pub mod error;
/// Open/closed state for collapsible result sections.
pub mod expansion;
/// Descriptive case metadata.
pub mod metadata;
/// Case service HTTP client and wire types.
pub mod service;
/// Document staging store.
pub mod staging;
/// Durable key-value storage.
pub mod storage;
/// Analysis and relevance request orchestrators.
pub mod workflow;

pub use app::AppState;
pub use config::Config;
pub use error::{AppError, AppResult};

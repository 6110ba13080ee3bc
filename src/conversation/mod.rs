//! Conversational Q&A about the case material.
//!
//! - [`ConversationSession`]: ask/answer cycle with durable history
//! - [`Transcript`]: plain-text export rendering
//! - [`TranscriptSink`]: direct save or download fallback

mod export;
mod session;
mod transcript;

pub use export::*;
pub use session::*;
pub use transcript::*;

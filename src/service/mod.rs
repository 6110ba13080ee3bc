//! Case service client and wire types.
//!
//! Three operations: case analysis, relevance classification, and
//! question answering.

mod client;
mod types;


pub use client::CaseServiceClient;
pub use types::*;

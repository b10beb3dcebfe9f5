//! Gentle: multi-model chat routing backend
//!
//! Each user message is routed to one of three external language models
//! (DeepSeek for reasoning, GPT-5 for visual and code work, Claude for
//! creative writing), chosen explicitly by the caller or by keyword
//! heuristics. Replies are normalized into a single [`DispatchResult`] shape
//! and stored alongside the conversation.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod api;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod messages;
pub mod router;
pub mod services;
pub mod store;

// Re-exports for convenience
pub use config::ModelChoice;
pub use coordinator::Coordinator;
pub use error::{GentleError, Result};
pub use services::{DispatchResult, ModelAdapter};

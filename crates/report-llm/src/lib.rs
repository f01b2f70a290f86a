//! Chat completion provider layer for stock-report
//!
//! Provider-agnostic types for asking a chat model for a single, non-streamed
//! completion:
//!
//! - Message types (`role` + `content`, the shape the report endpoint accepts)
//! - Completion request/response types
//! - Provider trait for LLM implementations
//! - An OpenAI-compatible provider (behind the `openai` feature)

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;

pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

#[cfg(feature = "openai")]
pub mod providers;

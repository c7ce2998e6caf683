//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - World graph and event log storage (could swap in-memory -> a database)
//! - LLM calls (could swap Ollama -> Anthropic)
//! - Intent resolution (could swap the LLM resolver -> a scripted one)
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;
pub mod types;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{EventLogRepo, WorldRepo};

// =============================================================================
// Types crossing the resolver boundary
// =============================================================================
pub use types::{ResolveRequest, WorldContext};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{
    ChatMessage, FinishReason, IntentResolverPort, LlmPort, LlmRequest, LlmResponse, MessageRole,
    TokenUsage, ToolCall, ToolDefinition,
};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockEventLogRepo, MockWorldRepo};

#[cfg(test)]
pub use external::{MockIntentResolverPort, MockLlmPort};

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{LlmError, RepoError, ResolverError};

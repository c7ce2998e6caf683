//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod anthropic;
pub mod clock;
pub mod config;
pub mod event_log;
pub mod llm_resolver;
pub mod locks;
pub mod ollama;
pub mod ports;
pub mod resilient_llm;
pub mod sqlite_event_log;
pub mod world_seed;
pub mod world_store;

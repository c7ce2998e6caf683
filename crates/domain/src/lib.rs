//! Imagind domain: the world graph, the command taxonomy, and game events.
//!
//! Pure types and invariants only. Storage, LLM access, and orchestration live
//! in `imagind-engine`.

pub mod commands;
pub mod containment;
pub mod entities;
pub mod error;
pub mod ids;

pub use commands::{
    CapabilitySet, Command, CommandInvocation, CommandKind, CommandParseError, CommandSpec, ParamKind,
    ParamSpec,
};
pub use containment::{ContainmentGraph, Placement, MAX_CONTAINMENT_DEPTH};
pub use entities::{
    indefinite_article, Actor, CreatureTemplate, EntityKind, EventActor, Exit, GameEvent, Item,
    ItemOwner, Location,
};
pub use error::DomainError;
pub use ids::{ActorId, CreatureTemplateId, EventId, ExitId, ItemId, LocationId};

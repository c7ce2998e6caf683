//! Game events - the append-only record of resolved commands
//!
//! Events are created by the referee once per successful command and never
//! change afterwards. The observer list fixes, at creation time, which actors
//! are entitled to a narration of the event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ActorId, Command, CommandKind, DomainError, EventId, LocationId};

/// Who caused an event: an actor, or the game master acting as "system".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EventActor {
    System,
    Actor(ActorId),
}

impl EventActor {
    pub const SYSTEM_SENTINEL: &'static str = "system";

    pub fn actor_id(&self) -> Option<ActorId> {
        match self {
            Self::Actor(id) => Some(*id),
            Self::System => None,
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Self::System)
    }
}

impl std::fmt::Display for EventActor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => f.write_str(Self::SYSTEM_SENTINEL),
            Self::Actor(id) => write!(f, "{}", id),
        }
    }
}

impl std::str::FromStr for EventActor {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::SYSTEM_SENTINEL {
            Ok(Self::System)
        } else {
            s.parse().map(Self::Actor)
        }
    }
}

impl TryFrom<String> for EventActor {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EventActor> for String {
    fn from(value: EventActor) -> Self {
        value.to_string()
    }
}

impl From<ActorId> for EventActor {
    fn from(value: ActorId) -> Self {
        Self::Actor(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: EventId,
    pub actor: EventActor,
    pub location_id: LocationId,
    /// The resolved command, not the text the player typed
    pub command: Command,
    /// Detail lines produced by execution
    pub output: Vec<String>,
    /// Original free text, shared by every event of one batch
    pub input: Option<String>,
    pub observers: Vec<ActorId>,
    pub created_at: DateTime<Utc>,
}

impl GameEvent {
    pub fn kind(&self) -> CommandKind {
        self.command.kind()
    }

    pub fn is_observed_by(&self, actor_id: ActorId) -> bool {
        self.observers.contains(&actor_id)
    }

    pub fn is_performed_by(&self, actor_id: ActorId) -> bool {
        self.actor == EventActor::Actor(actor_id)
    }
}

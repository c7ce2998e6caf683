//! Command execution errors.

use imagind_domain::{ActorId, CommandKind, CommandParseError, EntityKind};

use crate::infrastructure::ports::RepoError;

/// Why a single command was not applied.
///
/// None of these reach players; the referee logs them and moves on to the
/// next command in the batch.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{kind} is not available here")]
    InvalidCapability { kind: CommandKind },

    #[error("{entity} not found: {id}")]
    TargetNotFound { entity: EntityKind, id: String },

    #[error("Not accessible: {0}")]
    NotAccessible(String),

    #[error("Not owner: {0}")]
    NotOwner(String),

    #[error("Unknown command kind: {0}")]
    UnknownCommandKind(String),

    #[error("Invalid arguments for {kind}: {message}")]
    InvalidArguments { kind: CommandKind, message: String },

    #[error("Actor {0} is dead")]
    ActorDead(ActorId),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl CommandError {
    pub fn not_found(entity: EntityKind, id: impl ToString) -> Self {
        Self::TargetNotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn not_accessible(message: impl Into<String>) -> Self {
        Self::NotAccessible(message.into())
    }

    pub fn not_owner(message: impl Into<String>) -> Self {
        Self::NotOwner(message.into())
    }
}

impl From<CommandParseError> for CommandError {
    fn from(err: CommandParseError) -> Self {
        match err {
            CommandParseError::UnknownKind(kind) => Self::UnknownCommandKind(kind),
            CommandParseError::InvalidArguments { kind, message } => {
                Self::InvalidArguments { kind, message }
            }
        }
    }
}

/// Failure of a whole instruction batch.
#[derive(Debug, thiserror::Error)]
pub enum RefereeError {
    #[error("Actor not found: {0}")]
    ActorNotFound(ActorId),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

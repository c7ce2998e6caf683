//! Typed command records
//!
//! A [`Command`] is a command kind together with its resolved argument
//! record. Resolvers hand back loosely typed [`CommandInvocation`]s; parsing
//! one into a `Command` is the single place where kind and argument shape are
//! checked together.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::CommandKind;
use crate::{ActorId, CreatureTemplateId, ExitId, ItemId, LocationId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetAgentArgs {
    pub target_agent_id: ActorId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemArgs {
    pub item_id: ItemId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitArgs {
    pub exit_id: ExitId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmoteArgs {
    pub emote_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventArgs {
    pub event_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetItemFromItemArgs {
    pub container_item_id: ItemId,
    pub target_item_id: ItemId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiveItemArgs {
    pub item_id: ItemId,
    pub target_agent_id: ActorId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealExitArgs {
    pub exit_id: ExitId,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealItemArgs {
    pub item_id: ItemId,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnAgentArgs {
    pub template_id: CreatureTemplateId,
    pub location_id: LocationId,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakArgs {
    pub target_agent_id: ActorId,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockExitArgs {
    pub exit_id: ExitId,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateIntentArgs {
    pub intent: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMoodArgs {
    pub mood: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItemDescriptionArgs {
    pub item_id: ItemId,
    pub description: String,
    #[serde(default)]
    pub reason: String,
}

/// A command kind with its resolved arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CommandRecord", into = "CommandRecord")]
pub enum Command {
    AttackAgent(TargetAgentArgs),
    DoNothing,
    DropItem(ItemArgs),
    Emote(EmoteArgs),
    Event(EventArgs),
    GetInventory,
    GetItemFromItem(GetItemFromItemArgs),
    GiveItemToAgent(GiveItemArgs),
    GoExit(ExitArgs),
    DisplayHelpText,
    LookAround,
    LookAtAgent(TargetAgentArgs),
    LookAtExit(ExitArgs),
    LookAtItem(ItemArgs),
    PickUpItem(ItemArgs),
    RevealExit(RevealExitArgs),
    RevealItem(RevealItemArgs),
    SearchExit(ExitArgs),
    SearchItem(ItemArgs),
    SearchLocation,
    SpawnAgent(SpawnAgentArgs),
    SpeakToAgent(SpeakArgs),
    UnlockExit(UnlockExitArgs),
    UpdateAgentIntent(UpdateIntentArgs),
    UpdateAgentMood(UpdateMoodArgs),
    UpdateItemDescription(UpdateItemDescriptionArgs),
    Wait,
}

/// Why a raw invocation could not become a [`Command`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandParseError {
    #[error("Unknown command kind: {0}")]
    UnknownKind(String),
    #[error("Invalid arguments for {kind}: {message}")]
    InvalidArguments { kind: CommandKind, message: String },
}

fn args<T: serde::de::DeserializeOwned>(
    kind: CommandKind,
    arguments: &Value,
) -> Result<T, CommandParseError> {
    let arguments = if arguments.is_null() {
        Value::Object(Default::default())
    } else {
        arguments.clone()
    };
    serde_json::from_value(arguments).map_err(|e| CommandParseError::InvalidArguments {
        kind,
        message: e.to_string(),
    })
}

impl Command {
    /// Build a typed command from a kind and a JSON argument object.
    ///
    /// Argument-free kinds ignore whatever arguments they are given.
    pub fn from_raw(kind: CommandKind, arguments: &Value) -> Result<Self, CommandParseError> {
        use CommandKind as K;

        Ok(match kind {
            K::AttackAgent => Self::AttackAgent(args(kind, arguments)?),
            K::DoNothing => Self::DoNothing,
            K::DropItem => Self::DropItem(args(kind, arguments)?),
            K::Emote => Self::Emote(args(kind, arguments)?),
            K::Event => Self::Event(args(kind, arguments)?),
            K::GetInventory => Self::GetInventory,
            K::GetItemFromItem => Self::GetItemFromItem(args(kind, arguments)?),
            K::GiveItemToAgent => Self::GiveItemToAgent(args(kind, arguments)?),
            K::GoExit => Self::GoExit(args(kind, arguments)?),
            K::DisplayHelpText => Self::DisplayHelpText,
            K::LookAround => Self::LookAround,
            K::LookAtAgent => Self::LookAtAgent(args(kind, arguments)?),
            K::LookAtExit => Self::LookAtExit(args(kind, arguments)?),
            K::LookAtItem => Self::LookAtItem(args(kind, arguments)?),
            K::PickUpItem => Self::PickUpItem(args(kind, arguments)?),
            K::RevealExit => Self::RevealExit(args(kind, arguments)?),
            K::RevealItem => Self::RevealItem(args(kind, arguments)?),
            K::SearchExit => Self::SearchExit(args(kind, arguments)?),
            K::SearchItem => Self::SearchItem(args(kind, arguments)?),
            K::SearchLocation => Self::SearchLocation,
            K::SpawnAgent => Self::SpawnAgent(args(kind, arguments)?),
            K::SpeakToAgent => Self::SpeakToAgent(args(kind, arguments)?),
            K::UnlockExit => Self::UnlockExit(args(kind, arguments)?),
            K::UpdateAgentIntent => Self::UpdateAgentIntent(args(kind, arguments)?),
            K::UpdateAgentMood => Self::UpdateAgentMood(args(kind, arguments)?),
            K::UpdateItemDescription => Self::UpdateItemDescription(args(kind, arguments)?),
            K::Wait => Self::Wait,
        })
    }

    /// The command for an argument-free kind, `None` if the kind needs arguments.
    pub fn without_arguments(kind: CommandKind) -> Option<Self> {
        if kind.takes_arguments() {
            return None;
        }
        Self::from_raw(kind, &Value::Null).ok()
    }

    pub fn kind(&self) -> CommandKind {
        use CommandKind as K;

        match self {
            Self::AttackAgent(_) => K::AttackAgent,
            Self::DoNothing => K::DoNothing,
            Self::DropItem(_) => K::DropItem,
            Self::Emote(_) => K::Emote,
            Self::Event(_) => K::Event,
            Self::GetInventory => K::GetInventory,
            Self::GetItemFromItem(_) => K::GetItemFromItem,
            Self::GiveItemToAgent(_) => K::GiveItemToAgent,
            Self::GoExit(_) => K::GoExit,
            Self::DisplayHelpText => K::DisplayHelpText,
            Self::LookAround => K::LookAround,
            Self::LookAtAgent(_) => K::LookAtAgent,
            Self::LookAtExit(_) => K::LookAtExit,
            Self::LookAtItem(_) => K::LookAtItem,
            Self::PickUpItem(_) => K::PickUpItem,
            Self::RevealExit(_) => K::RevealExit,
            Self::RevealItem(_) => K::RevealItem,
            Self::SearchExit(_) => K::SearchExit,
            Self::SearchItem(_) => K::SearchItem,
            Self::SearchLocation => K::SearchLocation,
            Self::SpawnAgent(_) => K::SpawnAgent,
            Self::SpeakToAgent(_) => K::SpeakToAgent,
            Self::UnlockExit(_) => K::UnlockExit,
            Self::UpdateAgentIntent(_) => K::UpdateAgentIntent,
            Self::UpdateAgentMood(_) => K::UpdateAgentMood,
            Self::UpdateItemDescription(_) => K::UpdateItemDescription,
            Self::Wait => K::Wait,
        }
    }

    /// The resolved arguments as a JSON object (`{}` for argument-free kinds).
    pub fn arguments_json(&self) -> Value {
        let value = match self {
            Self::AttackAgent(a) | Self::LookAtAgent(a) => serde_json::to_value(a),
            Self::DropItem(a) | Self::LookAtItem(a) | Self::PickUpItem(a) | Self::SearchItem(a) => {
                serde_json::to_value(a)
            }
            Self::GoExit(a) | Self::LookAtExit(a) | Self::SearchExit(a) => serde_json::to_value(a),
            Self::Emote(a) => serde_json::to_value(a),
            Self::Event(a) => serde_json::to_value(a),
            Self::GetItemFromItem(a) => serde_json::to_value(a),
            Self::GiveItemToAgent(a) => serde_json::to_value(a),
            Self::RevealExit(a) => serde_json::to_value(a),
            Self::RevealItem(a) => serde_json::to_value(a),
            Self::SpawnAgent(a) => serde_json::to_value(a),
            Self::SpeakToAgent(a) => serde_json::to_value(a),
            Self::UnlockExit(a) => serde_json::to_value(a),
            Self::UpdateAgentIntent(a) => serde_json::to_value(a),
            Self::UpdateAgentMood(a) => serde_json::to_value(a),
            Self::UpdateItemDescription(a) => serde_json::to_value(a),
            Self::DoNothing
            | Self::GetInventory
            | Self::DisplayHelpText
            | Self::LookAround
            | Self::SearchLocation
            | Self::Wait => return Value::Object(Default::default()),
        };
        // Plain structs of ids and strings always serialize.
        value.unwrap_or_else(|_| Value::Object(Default::default()))
    }
}

/// Wire shape of a command: `{"kind": "...", "arguments": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRecord {
    pub kind: CommandKind,
    #[serde(default)]
    pub arguments: Value,
}

impl From<Command> for CommandRecord {
    fn from(command: Command) -> Self {
        Self {
            kind: command.kind(),
            arguments: command.arguments_json(),
        }
    }
}

impl TryFrom<CommandRecord> for Command {
    type Error = CommandParseError;

    fn try_from(record: CommandRecord) -> Result<Self, Self::Error> {
        Command::from_raw(record.kind, &record.arguments)
    }
}

/// One structured call as returned by an intent resolver, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandInvocation {
    pub kind: String,
    #[serde(default)]
    pub arguments: Value,
}

impl CommandInvocation {
    pub fn new(kind: impl Into<String>, arguments: Value) -> Self {
        Self {
            kind: kind.into(),
            arguments,
        }
    }

    /// The kind named by this call. Arguments are left unchecked so callers
    /// can decide on the kind before looking at them.
    pub fn command_kind(&self) -> Result<CommandKind, CommandParseError> {
        self.kind
            .parse()
            .map_err(|_| CommandParseError::UnknownKind(self.kind.clone()))
    }
}

impl From<&Command> for CommandInvocation {
    fn from(command: &Command) -> Self {
        Self::new(command.kind().as_str(), command.arguments_json())
    }
}

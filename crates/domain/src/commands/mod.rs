//! Command taxonomy: kinds, argument records, and capability sets

mod capabilities;
mod command;
mod kind;

pub use capabilities::{CapabilitySet, PLAYER_COMMANDS, SELF_REFLECTIVE_COMMANDS, SYSTEM_COMMANDS};
pub use command::{
    Command, CommandInvocation, CommandParseError, CommandRecord, EmoteArgs, EventArgs, ExitArgs,
    GetItemFromItemArgs, GiveItemArgs, ItemArgs, RevealExitArgs, RevealItemArgs, SpawnAgentArgs,
    SpeakArgs, TargetAgentArgs, UnlockExitArgs, UpdateIntentArgs, UpdateItemDescriptionArgs,
    UpdateMoodArgs,
};
pub use kind::{CommandKind, CommandSpec, ParamKind, ParamSpec};

//! The closed vocabulary of command kinds
//!
//! Each kind carries a static [`CommandSpec`]: the description shown in help
//! text and tool schemas, the literal synonyms used for the fast path, and the
//! shape of its argument record.

use serde::{Deserialize, Serialize};

use crate::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    AttackAgent,
    DoNothing,
    DropItem,
    Emote,
    Event,
    GetInventory,
    GetItemFromItem,
    GiveItemToAgent,
    GoExit,
    DisplayHelpText,
    LookAround,
    LookAtAgent,
    LookAtExit,
    LookAtItem,
    PickUpItem,
    RevealExit,
    RevealItem,
    SearchExit,
    SearchItem,
    SearchLocation,
    SpawnAgent,
    SpeakToAgent,
    UnlockExit,
    UpdateAgentIntent,
    UpdateAgentMood,
    UpdateItemDescription,
    Wait,
}

/// What an argument refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Actor,
    Item,
    Exit,
    Location,
    CreatureTemplate,
    Text,
}

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub description: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub kind: CommandKind,
    pub description: &'static str,
    pub synonyms: &'static [&'static str],
    pub params: &'static [ParamSpec],
}

const fn param(name: &'static str, kind: ParamKind, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        description,
        required: true,
    }
}

const fn optional(name: &'static str, kind: ParamKind, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        description,
        required: false,
    }
}

const TARGET_AGENT: ParamSpec = param(
    "target_agent_id",
    ParamKind::Actor,
    "The id of the character to act on",
);
const ITEM: ParamSpec = param("item_id", ParamKind::Item, "The id of the item");
const EXIT: ParamSpec = param("exit_id", ParamKind::Exit, "The id of the exit");
const REASON: ParamSpec = optional("reason", ParamKind::Text, "Why this is happening");
const NO_SYNONYMS: &[&str] = &[];
const NO_PARAMS: &[ParamSpec] = &[];
const TARGET_AGENT_PARAMS: &[ParamSpec] = &[TARGET_AGENT];
const ITEM_PARAMS: &[ParamSpec] = &[ITEM];
const EXIT_PARAMS: &[ParamSpec] = &[EXIT];
const EXIT_REASON_PARAMS: &[ParamSpec] = &[EXIT, REASON];
const ITEM_REASON_PARAMS: &[ParamSpec] = &[ITEM, REASON];
const GIVE_PARAMS: &[ParamSpec] = &[ITEM, TARGET_AGENT];
const EMOTE_PARAMS: &[ParamSpec] = &[param(
    "emote_text",
    ParamKind::Text,
    "What the character does, in the third person",
)];
const EVENT_PARAMS: &[ParamSpec] = &[param(
    "event_text",
    ParamKind::Text,
    "The narration of what happens",
)];
const GET_ITEM_FROM_ITEM_PARAMS: &[ParamSpec] = &[
    param("container_item_id", ParamKind::Item, "The id of the container"),
    param("target_item_id", ParamKind::Item, "The id of the item inside the container"),
];
const SPAWN_AGENT_PARAMS: &[ParamSpec] = &[
    param("template_id", ParamKind::CreatureTemplate, "The id of the creature template"),
    param("location_id", ParamKind::Location, "The id of the location to spawn into"),
    optional("name", ParamKind::Text, "A name for the creature"),
];
const SPEAK_PARAMS: &[ParamSpec] = &[TARGET_AGENT, param("message", ParamKind::Text, "What is said")];
const INTENT_PARAMS: &[ParamSpec] = &[
    param("intent", ParamKind::Text, "Your short-term intent"),
    REASON,
];
const MOOD_PARAMS: &[ParamSpec] = &[param("mood", ParamKind::Text, "Your new mood"), REASON];
const ITEM_DESCRIPTION_PARAMS: &[ParamSpec] = &[
    ITEM,
    param("description", ParamKind::Text, "The new description"),
    REASON,
];

impl CommandKind {
    pub const ALL: [CommandKind; 27] = [
        Self::AttackAgent,
        Self::DoNothing,
        Self::DropItem,
        Self::Emote,
        Self::Event,
        Self::GetInventory,
        Self::GetItemFromItem,
        Self::GiveItemToAgent,
        Self::GoExit,
        Self::DisplayHelpText,
        Self::LookAround,
        Self::LookAtAgent,
        Self::LookAtExit,
        Self::LookAtItem,
        Self::PickUpItem,
        Self::RevealExit,
        Self::RevealItem,
        Self::SearchExit,
        Self::SearchItem,
        Self::SearchLocation,
        Self::SpawnAgent,
        Self::SpeakToAgent,
        Self::UnlockExit,
        Self::UpdateAgentIntent,
        Self::UpdateAgentMood,
        Self::UpdateItemDescription,
        Self::Wait,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AttackAgent => "attack_agent",
            Self::DoNothing => "do_nothing",
            Self::DropItem => "drop_item",
            Self::Emote => "emote",
            Self::Event => "event",
            Self::GetInventory => "get_inventory",
            Self::GetItemFromItem => "get_item_from_item",
            Self::GiveItemToAgent => "give_item_to_agent",
            Self::GoExit => "go_exit",
            Self::DisplayHelpText => "display_help_text",
            Self::LookAround => "look_around",
            Self::LookAtAgent => "look_at_agent",
            Self::LookAtExit => "look_at_exit",
            Self::LookAtItem => "look_at_item",
            Self::PickUpItem => "pick_up_item",
            Self::RevealExit => "reveal_exit",
            Self::RevealItem => "reveal_item",
            Self::SearchExit => "search_exit",
            Self::SearchItem => "search_item",
            Self::SearchLocation => "search_location",
            Self::SpawnAgent => "spawn_agent",
            Self::SpeakToAgent => "speak_to_agent",
            Self::UnlockExit => "unlock_exit",
            Self::UpdateAgentIntent => "update_agent_intent",
            Self::UpdateAgentMood => "update_agent_mood",
            Self::UpdateItemDescription => "update_item_description",
            Self::Wait => "wait",
        }
    }

    pub fn spec(&self) -> CommandSpec {
        let (description, synonyms, params): (&str, &[&str], &[ParamSpec]) = match self {
            Self::AttackAgent => (
                "Attack another character who is here",
                &["attack", "fight", "hit", "strike", "assault", "battle"],
                TARGET_AGENT_PARAMS,
            ),
            Self::DoNothing => (
                "Nothing happens as a result of these events",
                &["stand still", "idle"],
                NO_PARAMS,
            ),
            Self::DropItem => (
                "Drop an item you are carrying",
                &["drop", "discard", "put down", "leave", "abandon"],
                ITEM_PARAMS,
            ),
            Self::Emote => (
                "Express an emotion or gesture without speaking",
                &["emote", "express", "show", "display"],
                EMOTE_PARAMS,
            ),
            Self::Event => (
                "Describe something that happens in the world",
                NO_SYNONYMS,
                EVENT_PARAMS,
            ),
            Self::GetInventory => (
                "List the items you are carrying",
                &["inventory", "i", "check inventory", "show inventory", "items"],
                NO_PARAMS,
            ),
            Self::GetItemFromItem => (
                "Take an item out of a container",
                &["get", "take", "remove"],
                GET_ITEM_FROM_ITEM_PARAMS,
            ),
            Self::GiveItemToAgent => (
                "Give an item you are carrying to another character who is here",
                &["give", "hand", "pass", "offer"],
                GIVE_PARAMS,
            ),
            Self::GoExit => (
                "Leave this location through an exit",
                &["go", "move", "walk", "run", "enter", "leave", "exit"],
                EXIT_PARAMS,
            ),
            Self::DisplayHelpText => (
                "Show the commands you can use",
                &["help", "commands", "?"],
                NO_PARAMS,
            ),
            Self::LookAround => (
                "Look around the current location",
                &["look", "observe", "survey", "examine room", "examine area"],
                NO_PARAMS,
            ),
            Self::LookAtAgent => (
                "Look closely at a character who is here",
                &["examine", "inspect", "observe"],
                TARGET_AGENT_PARAMS,
            ),
            Self::LookAtExit => (
                "Look closely at an exit",
                &["examine exit", "inspect exit", "look at exit"],
                EXIT_PARAMS,
            ),
            Self::LookAtItem => (
                "Look closely at an item that is here or that you carry",
                &["examine", "inspect", "observe"],
                ITEM_PARAMS,
            ),
            Self::PickUpItem => (
                "Pick up an item that is here",
                &["take", "grab", "get", "collect", "pick up"],
                ITEM_PARAMS,
            ),
            Self::RevealExit => (
                "Reveal a hidden exit",
                NO_SYNONYMS,
                EXIT_REASON_PARAMS,
            ),
            Self::RevealItem => (
                "Reveal a hidden item",
                NO_SYNONYMS,
                ITEM_REASON_PARAMS,
            ),
            Self::SearchExit => (
                "Search an exit carefully",
                &["search exit", "examine exit carefully", "investigate exit"],
                EXIT_PARAMS,
            ),
            Self::SearchItem => (
                "Search an item carefully, including its contents",
                &["search item", "examine item carefully", "investigate item"],
                ITEM_PARAMS,
            ),
            Self::SearchLocation => (
                "Search the current location",
                &["search", "loot"],
                NO_PARAMS,
            ),
            Self::SpawnAgent => (
                "Bring a new creature into a location",
                NO_SYNONYMS,
                SPAWN_AGENT_PARAMS,
            ),
            Self::SpeakToAgent => (
                "Say something to a character who is here",
                NO_SYNONYMS,
                SPEAK_PARAMS,
            ),
            Self::UnlockExit => (
                "Unlock a locked exit",
                &["unlock", "open"],
                EXIT_REASON_PARAMS,
            ),
            Self::UpdateAgentIntent => (
                "Decide what you intend to do next",
                NO_SYNONYMS,
                INTENT_PARAMS,
            ),
            Self::UpdateAgentMood => (
                "Change how you feel",
                NO_SYNONYMS,
                MOOD_PARAMS,
            ),
            Self::UpdateItemDescription => (
                "Change the description of an item",
                NO_SYNONYMS,
                ITEM_DESCRIPTION_PARAMS,
            ),
            Self::Wait => (
                "Wait for something to happen",
                &["wait", "pause", "hold"],
                NO_PARAMS,
            ),
        };

        CommandSpec {
            kind: *self,
            description,
            synonyms,
            params,
        }
    }

    /// Kinds whose argument record is empty can be issued from a synonym alone.
    pub fn takes_arguments(&self) -> bool {
        !self.spec().params.is_empty()
    }

    pub fn matches_synonym(&self, input: &str) -> bool {
        self.spec().synonyms.iter().any(|s| *s == input)
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CommandKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::parse(format!("Unknown command kind: {}", s)))
    }
}

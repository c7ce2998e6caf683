//! Capability sets: which command kinds an actor may issue
//!
//! [`CapabilitySet::for_actor`] is the one place that decides this. The
//! resolver is shown exactly this set and the referee rejects anything
//! outside it.

use super::CommandKind;
use crate::Actor;

/// Commands available to every actor, human or autonomous.
pub const PLAYER_COMMANDS: &[CommandKind] = &[
    CommandKind::GoExit,
    CommandKind::PickUpItem,
    CommandKind::GetItemFromItem,
    CommandKind::DropItem,
    CommandKind::GiveItemToAgent,
    CommandKind::LookAround,
    CommandKind::LookAtItem,
    CommandKind::LookAtAgent,
    CommandKind::LookAtExit,
    CommandKind::SpeakToAgent,
    CommandKind::AttackAgent,
    CommandKind::SearchLocation,
    CommandKind::SearchItem,
    CommandKind::SearchExit,
    CommandKind::GetInventory,
    CommandKind::Wait,
    CommandKind::DisplayHelpText,
    CommandKind::Emote,
];

/// Narrative-state commands only autonomous actors get.
pub const SELF_REFLECTIVE_COMMANDS: &[CommandKind] = &[
    CommandKind::UpdateAgentIntent,
    CommandKind::UpdateAgentMood,
];

/// Game-master commands, issued with no acting actor.
pub const SYSTEM_COMMANDS: &[CommandKind] = &[
    CommandKind::DoNothing,
    CommandKind::Event,
    CommandKind::RevealItem,
    CommandKind::RevealExit,
    CommandKind::UnlockExit,
    CommandKind::UpdateItemDescription,
    CommandKind::SpawnAgent,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySet {
    kinds: Vec<CommandKind>,
}

impl CapabilitySet {
    /// `None` is the game master; autonomous actors get the player set plus
    /// self-reflective commands; everyone else gets the player set.
    pub fn for_actor(actor: Option<&Actor>) -> Self {
        let kinds = match actor {
            None => SYSTEM_COMMANDS.to_vec(),
            Some(actor) if actor.autonomous => PLAYER_COMMANDS
                .iter()
                .chain(SELF_REFLECTIVE_COMMANDS)
                .copied()
                .collect(),
            Some(_) => PLAYER_COMMANDS.to_vec(),
        };
        Self { kinds }
    }

    pub fn system() -> Self {
        Self::for_actor(None)
    }

    pub fn contains(&self, kind: CommandKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn kinds(&self) -> &[CommandKind] {
        &self.kinds
    }

    pub fn iter(&self) -> impl Iterator<Item = CommandKind> + '_ {
        self.kinds.iter().copied()
    }

    /// Literal fast path: the one argument-free kind whose synonym list holds
    /// `input` exactly (after trimming and lower-casing). Ambiguous input
    /// matches nothing.
    pub fn match_synonym(&self, input: &str) -> Option<CommandKind> {
        let normalized = input.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }

        let mut matches = self
            .iter()
            .filter(|kind| !kind.takes_arguments() && kind.matches_synonym(&normalized));
        let first = matches.next()?;
        match matches.next() {
            Some(_) => None,
            None => Some(first),
        }
    }

    /// One help line per available command.
    pub fn help_lines(&self) -> Vec<String> {
        self.iter()
            .map(|kind| format!("{}: {}", kind, kind.spec().description))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LocationId;

    #[test]
    fn player_and_system_sets_are_disjoint() {
        for kind in PLAYER_COMMANDS.iter().chain(SELF_REFLECTIVE_COMMANDS) {
            assert!(!SYSTEM_COMMANDS.contains(kind), "{} in both sets", kind);
        }
    }

    #[test]
    fn every_kind_belongs_to_some_set() {
        for kind in CommandKind::ALL {
            let covered = PLAYER_COMMANDS.contains(&kind)
                || SELF_REFLECTIVE_COMMANDS.contains(&kind)
                || SYSTEM_COMMANDS.contains(&kind);
            assert!(covered, "{} is unreachable", kind);
        }
    }

    #[test]
    fn autonomous_actors_get_self_reflective_commands() {
        let loc = LocationId::new();
        let player = Actor::new("Mira", loc);
        let npc = Actor::new("Rat", loc).autonomous();

        let player_set = CapabilitySet::for_actor(Some(&player));
        let npc_set = CapabilitySet::for_actor(Some(&npc));

        assert!(!player_set.contains(CommandKind::UpdateAgentMood));
        assert!(npc_set.contains(CommandKind::UpdateAgentMood));
        assert!(npc_set.contains(CommandKind::GoExit));
        assert!(!npc_set.contains(CommandKind::RevealItem));
        assert!(CapabilitySet::system().contains(CommandKind::RevealItem));
        assert!(!CapabilitySet::system().contains(CommandKind::PickUpItem));
    }

    #[test]
    fn synonym_fast_path_only_hits_argument_free_kinds() {
        let player = CapabilitySet::for_actor(Some(&Actor::new("Mira", LocationId::new())));

        assert_eq!(player.match_synonym("  LOOK "), Some(CommandKind::LookAround));
        assert_eq!(player.match_synonym("i"), Some(CommandKind::GetInventory));
        assert_eq!(player.match_synonym("wait"), Some(CommandKind::Wait));
        assert_eq!(player.match_synonym("search"), Some(CommandKind::SearchLocation));
        assert_eq!(player.match_synonym("go"), None);
        assert_eq!(player.match_synonym("go north"), None);
        assert_eq!(player.match_synonym(""), None);
    }

    #[test]
    fn system_set_has_no_player_synonyms() {
        assert_eq!(CapabilitySet::system().match_synonym("look"), None);
    }

    #[test]
    fn help_lists_descriptions() {
        let lines = CapabilitySet::system().help_lines();
        assert_eq!(lines.len(), SYSTEM_COMMANDS.len());
        assert!(lines[0].starts_with("do_nothing: "));
    }
}

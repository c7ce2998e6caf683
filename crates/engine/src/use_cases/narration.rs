//! Event narration.
//!
//! Renders a stored event as text for one observer: second person for the
//! actor who performed it, third person for everyone else. The game master
//! gets its own impersonal view, which is what consequence resolution reads.

use std::sync::Arc;

use imagind_domain::{
    ActorId, Command, CommandKind, EventActor, ExitId, GameEvent, ItemId,
};

use crate::infrastructure::ports::{RepoError, WorldRepo};

/// Who is reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Viewer {
    Actor { id: ActorId, hide_details: bool },
    System,
}

/// Who may read an event's detail lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Details {
    /// Everyone who observed the event
    Public,
    /// The performer, unless details are hidden
    Private,
    /// The game master only
    System,
    /// Already part of the summary line
    Folded,
}

fn details_of(kind: CommandKind) -> Details {
    use CommandKind as K;
    match kind {
        K::AttackAgent => Details::Public,
        K::GoExit
        | K::LookAround
        | K::LookAtAgent
        | K::LookAtExit
        | K::LookAtItem
        | K::SearchExit
        | K::SearchItem
        | K::SearchLocation
        | K::GetInventory
        | K::DisplayHelpText => Details::Private,
        K::RevealExit | K::RevealItem | K::UnlockExit | K::UpdateItemDescription | K::SpawnAgent => {
            Details::System
        }
        K::DoNothing
        | K::DropItem
        | K::Emote
        | K::Event
        | K::GetItemFromItem
        | K::GiveItemToAgent
        | K::PickUpItem
        | K::SpeakToAgent
        | K::UpdateAgentIntent
        | K::UpdateAgentMood
        | K::Wait => Details::Folded,
    }
}

fn is_self_reflective(kind: CommandKind) -> bool {
    matches!(
        kind,
        CommandKind::UpdateAgentIntent | CommandKind::UpdateAgentMood
    )
}

/// Grammatical person for the performer.
struct Voice {
    first_person: bool,
    name: String,
}

impl Voice {
    fn subject(&self) -> &str {
        if self.first_person {
            "You"
        } else {
            &self.name
        }
    }

    fn verb<'a>(&self, base: &'a str, third: &'a str) -> &'a str {
        if self.first_person {
            base
        } else {
            third
        }
    }

    fn possessive(&self) -> &'static str {
        if self.first_person {
            "your"
        } else {
            "their"
        }
    }
}

pub struct Narrator {
    world: Arc<dyn WorldRepo>,
}

impl Narrator {
    pub fn new(world: Arc<dyn WorldRepo>) -> Self {
        Self { world }
    }

    /// Lines `observer` reads for `event`; empty when they did not witness it.
    pub async fn describe(
        &self,
        event: &GameEvent,
        observer: ActorId,
        hide_details: bool,
    ) -> Result<Vec<String>, RepoError> {
        if !event.is_observed_by(observer) {
            return Ok(Vec::new());
        }
        if is_self_reflective(event.kind()) && !event.is_performed_by(observer) {
            return Ok(Vec::new());
        }
        self.narrate(
            event,
            Viewer::Actor {
                id: observer,
                hide_details,
            },
        )
        .await
    }

    /// Lines the game master reads for `event`.
    pub async fn describe_for_system(&self, event: &GameEvent) -> Result<Vec<String>, RepoError> {
        self.narrate(event, Viewer::System).await
    }

    async fn narrate(&self, event: &GameEvent, viewer: Viewer) -> Result<Vec<String>, RepoError> {
        let mut lines = Vec::new();
        if let Some(summary) = self.summary(event, viewer).await? {
            lines.push(summary);
        }

        let first_person = match viewer {
            Viewer::Actor { id, .. } => event.is_performed_by(id),
            Viewer::System => false,
        };
        let show_details = match (details_of(event.kind()), viewer) {
            (Details::Public, _) => true,
            (Details::Private, Viewer::Actor { hide_details, .. }) => {
                first_person && !hide_details
            }
            (Details::System, Viewer::System) => true,
            _ => false,
        };
        if show_details {
            lines.extend(event.output.iter().cloned());
        }

        Ok(lines)
    }

    async fn summary(&self, event: &GameEvent, viewer: Viewer) -> Result<Option<String>, RepoError> {
        let voice = match event.actor {
            EventActor::Actor(actor_id) => Some(Voice {
                first_person: matches!(viewer, Viewer::Actor { id, .. } if id == actor_id),
                name: self.actor_name(actor_id).await?,
            }),
            EventActor::System => None,
        };
        let viewer_id = match viewer {
            Viewer::Actor { id, .. } => Some(id),
            Viewer::System => None,
        };

        let Some(v) = voice else {
            return self.system_summary(event).await;
        };
        let s = v.subject();

        let line = match &event.command {
            Command::AttackAgent(args) => format!(
                "{} {} {}.",
                s,
                v.verb("attack", "attacks"),
                self.object_name(args.target_agent_id, viewer_id).await?
            ),
            Command::DropItem(args) => format!(
                "{} {} the {}.",
                s,
                v.verb("drop", "drops"),
                self.item_name(args.item_id).await?
            ),
            Command::Emote(args) => format!(
                "{} {}: {}",
                s,
                v.verb("emote", "emotes"),
                args.emote_text
            ),
            Command::GetInventory => format!(
                "{} {} {} belongings.",
                s,
                v.verb("check", "checks"),
                v.possessive()
            ),
            Command::GetItemFromItem(args) => format!(
                "{} {} the {} from the {}.",
                s,
                v.verb("take", "takes"),
                self.item_name(args.target_item_id).await?,
                self.item_name(args.container_item_id).await?
            ),
            Command::GiveItemToAgent(args) => format!(
                "{} {} the {} to {}.",
                s,
                v.verb("give", "gives"),
                self.item_name(args.item_id).await?,
                self.object_name(args.target_agent_id, viewer_id).await?
            ),
            Command::GoExit(args) => {
                let direction = self.direction(args.exit_id).await?;
                if v.first_person {
                    format!("You go {}.", direction)
                } else {
                    format!("{} goes {}.", v.name, direction)
                }
            }
            Command::DisplayHelpText => {
                if !v.first_person {
                    return Ok(None);
                }
                "You consider what you can do.".to_string()
            }
            Command::LookAround => format!("{} {} around.", s, v.verb("look", "looks")),
            Command::LookAtAgent(args) => format!(
                "{} {} at {}.",
                s,
                v.verb("look", "looks"),
                self.object_name(args.target_agent_id, viewer_id).await?
            ),
            Command::LookAtExit(args) => format!(
                "{} {} the {}.",
                s,
                v.verb("examine", "examines"),
                self.exit_name(args.exit_id).await?
            ),
            Command::LookAtItem(args) => format!(
                "{} {} the {}.",
                s,
                v.verb("examine", "examines"),
                self.item_name(args.item_id).await?
            ),
            Command::PickUpItem(args) => format!(
                "{} {} the {}.",
                s,
                v.verb("pick up", "picks up"),
                self.item_name(args.item_id).await?
            ),
            Command::SearchExit(args) => format!(
                "{} {} the {}.",
                s,
                v.verb("search", "searches"),
                self.exit_name(args.exit_id).await?
            ),
            Command::SearchItem(args) => format!(
                "{} {} the {}.",
                s,
                v.verb("search", "searches"),
                self.item_name(args.item_id).await?
            ),
            Command::SearchLocation => format!("{} {} the area.", s, v.verb("search", "searches")),
            Command::SpeakToAgent(args) => format!(
                "{} {} to {}: \"{}\"",
                s,
                v.verb("say", "says"),
                self.object_name(args.target_agent_id, viewer_id).await?,
                args.message
            ),
            Command::UpdateAgentIntent(args) => format!(
                "{} now {} to {}",
                s,
                v.verb("intend", "intends"),
                args.intent
            ),
            Command::UpdateAgentMood(args) => {
                format!("{} now {} {}.", s, v.verb("feel", "feels"), args.mood)
            }
            Command::Wait => format!("{} {}.", s, v.verb("wait", "waits")),
            other => {
                tracing::warn!(command = %other.kind(), "Actor event with a game-master command");
                return Ok(None);
            }
        };

        Ok(Some(line))
    }

    async fn system_summary(&self, event: &GameEvent) -> Result<Option<String>, RepoError> {
        let line = match &event.command {
            Command::DoNothing => return Ok(None),
            Command::Event(args) => args.event_text.clone(),
            Command::RevealItem(args) => {
                format!("The {} is revealed.", self.item_name(args.item_id).await?)
            }
            Command::RevealExit(args) => {
                format!("The {} is revealed.", self.exit_name(args.exit_id).await?)
            }
            Command::UnlockExit(args) => {
                format!("The {} is unlocked.", self.exit_name(args.exit_id).await?)
            }
            Command::UpdateItemDescription(args) => {
                format!("The {} changes.", self.item_name(args.item_id).await?)
            }
            Command::SpawnAgent(args) => {
                let name = if args.name.trim().is_empty() {
                    self.world
                        .get_template(args.template_id)
                        .await?
                        .map(|t| t.name)
                        .unwrap_or_else(|| "A creature".to_string())
                } else {
                    args.name.trim().to_string()
                };
                format!("{} appears.", name)
            }
            other => format!("Something happens ({}).", other.kind()),
        };
        Ok(Some(line))
    }

    async fn actor_name(&self, id: ActorId) -> Result<String, RepoError> {
        Ok(self
            .world
            .get_actor(id)
            .await?
            .map(|a| a.label)
            .unwrap_or_else(|| "Someone".to_string()))
    }

    /// "you" when the viewer is the one acted upon.
    async fn object_name(&self, id: ActorId, viewer: Option<ActorId>) -> Result<String, RepoError> {
        if viewer == Some(id) {
            return Ok("you".to_string());
        }
        self.actor_name(id).await
    }

    async fn item_name(&self, id: ItemId) -> Result<String, RepoError> {
        Ok(self
            .world
            .get_item(id)
            .await?
            .map(|i| i.label)
            .unwrap_or_else(|| "something".to_string()))
    }

    async fn exit_name(&self, id: ExitId) -> Result<String, RepoError> {
        Ok(self
            .world
            .get_exit(id)
            .await?
            .map(|e| e.label)
            .unwrap_or_else(|| "way out".to_string()))
    }

    async fn direction(&self, id: ExitId) -> Result<String, RepoError> {
        Ok(self
            .world
            .get_exit(id)
            .await?
            .map(|e| e.direction)
            .unwrap_or_else(|| "away".to_string()))
    }
}

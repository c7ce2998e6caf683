//! The referee: validates commands against world rules and applies them.
//!
//! Every command runs under the location lock of the place it happens in (and
//! of the destination, for movement). Item transfers and moves are also
//! compare-and-set at the storage layer, so a conflicting writer that slipped
//! past the locks still cannot double-apply a change.

mod error;
mod plan;

use std::collections::HashMap;
use std::sync::Arc;

use imagind_domain::{
    ActorId, CapabilitySet, Command, CommandInvocation, CommandKind, EntityKind, EventActor,
    EventId, GameEvent, LocationId,
};

use crate::infrastructure::locks::LocationLocks;
use crate::infrastructure::ports::{ClockPort, IntentResolverPort, ResolveRequest, WorldRepo};
use crate::use_cases::snapshot::LocationSnapshot;

pub use error::{CommandError, RefereeError};
pub use plan::{Acting, Mutation, Plan};

/// An actor re-read under the lock may have moved; give up after this many
/// attempts at locking the right location.
const MAX_LOCK_ATTEMPTS: usize = 3;

/// Who performs a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Performer {
    Actor(ActorId),
    /// The game master, acting in one location
    System(LocationId),
}

/// A command that was applied.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub command: Command,
    /// Where the command was carried out
    pub location_id: LocationId,
    pub output: Vec<String>,
    /// Everyone present when it was carried out
    pub witnesses: Vec<ActorId>,
}

impl Outcome {
    /// Commands that leave no trace in the event log.
    pub fn is_silent(&self) -> bool {
        self.command.kind() == CommandKind::DoNothing
    }
}

pub struct Referee {
    world: Arc<dyn WorldRepo>,
    resolver: Arc<dyn IntentResolverPort>,
    locks: Arc<LocationLocks>,
    clock: Arc<dyn ClockPort>,
}

impl Referee {
    pub fn new(
        world: Arc<dyn WorldRepo>,
        resolver: Arc<dyn IntentResolverPort>,
        locks: Arc<LocationLocks>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            world,
            resolver,
            locks,
            clock,
        }
    }

    /// Turn an actor's free text into events.
    ///
    /// Rejected commands are logged and skipped; the rest of the batch still
    /// runs. A dead actor, or a resolver that cannot answer, yields no events.
    pub async fn resolve_instructions(
        &self,
        actor_id: ActorId,
        text: &str,
    ) -> Result<Vec<GameEvent>, RefereeError> {
        let actor = self
            .world
            .get_actor(actor_id)
            .await?
            .ok_or(RefereeError::ActorNotFound(actor_id))?;
        if actor.is_dead() {
            tracing::debug!(actor_id = %actor_id, "Ignoring instructions from a dead actor");
            return Ok(Vec::new());
        }

        let capabilities = CapabilitySet::for_actor(Some(&actor));
        let invocations = match capabilities.match_synonym(text) {
            Some(kind) => vec![CommandInvocation::new(
                kind.as_str(),
                serde_json::Value::Object(Default::default()),
            )],
            None => {
                let snapshot =
                    LocationSnapshot::load(self.world.as_ref(), actor.location_id).await?;
                let request = ResolveRequest {
                    text: text.to_string(),
                    context: snapshot.to_context(Some(&actor)),
                    actor: Some(actor),
                    capabilities,
                };
                match self.resolver.resolve(request).await {
                    Ok(invocations) => invocations,
                    Err(e) => {
                        tracing::warn!(
                            actor_id = %actor_id,
                            error = %e,
                            "Intent resolution failed, no commands executed"
                        );
                        return Ok(Vec::new());
                    }
                }
            }
        };

        let mut outcomes = Vec::new();
        for invocation in &invocations {
            match self.execute(Performer::Actor(actor_id), invocation).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(CommandError::ActorDead(_)) => break,
                Err(e) => {
                    tracing::warn!(
                        actor_id = %actor_id,
                        command = %invocation.kind,
                        error = %e,
                        "Command rejected"
                    );
                }
            }
        }

        Ok(self
            .record(EventActor::Actor(actor_id), outcomes, Some(text))
            .await)
    }

    /// Validate and apply one invocation atomically.
    pub async fn execute(
        &self,
        performer: Performer,
        invocation: &CommandInvocation,
    ) -> Result<Outcome, CommandError> {
        let kind = invocation.command_kind()?;

        for _ in 0..MAX_LOCK_ATTEMPTS {
            let (stale_actor, origin) = match performer {
                Performer::Actor(actor_id) => {
                    let actor = self
                        .world
                        .get_actor(actor_id)
                        .await?
                        .ok_or_else(|| CommandError::not_found(EntityKind::Actor, actor_id))?;
                    let origin = actor.location_id;
                    (Some(actor), origin)
                }
                Performer::System(location_id) => (None, location_id),
            };

            let capabilities = CapabilitySet::for_actor(stale_actor.as_ref());
            if !capabilities.contains(kind) {
                return Err(CommandError::InvalidCapability { kind });
            }
            let command = Command::from_raw(kind, &invocation.arguments)?;

            let mut scope = vec![origin];
            if let Command::GoExit(args) = &command {
                if let Some(exit) = self.world.get_exit(args.exit_id).await? {
                    if exit.location_id == origin {
                        scope.push(exit.destination_id);
                    }
                }
            }
            let _guard = self.locks.acquire(&scope).await;

            let actor = match stale_actor {
                Some(stale) => {
                    let current = self
                        .world
                        .get_actor(stale.id)
                        .await?
                        .ok_or_else(|| CommandError::not_found(EntityKind::Actor, stale.id))?;
                    if current.location_id != origin {
                        tracing::debug!(
                            actor_id = %current.id,
                            "Actor moved while waiting for the location lock, retrying"
                        );
                        continue;
                    }
                    if current.is_dead() {
                        return Err(CommandError::ActorDead(current.id));
                    }
                    Some(current)
                }
                None => None,
            };

            let snapshot = LocationSnapshot::load(self.world.as_ref(), origin).await?;
            let acting = match &actor {
                Some(actor) => Acting::Actor(actor),
                None => Acting::System,
            };
            let plan = plan::plan(&command, acting, &snapshot, &capabilities)?;

            self.apply(plan.mutations).await?;

            let mut output = plan.output;
            if let (Some(actor), Some(destination)) = (&actor, plan.arrival) {
                let arrival = LocationSnapshot::load(self.world.as_ref(), destination).await?;
                output.extend(arrival.look_around(Some(actor.id)));
            }

            tracing::debug!(
                command = %command.kind(),
                location_id = %origin,
                "Command applied"
            );
            return Ok(Outcome {
                command,
                location_id: origin,
                output,
                witnesses: snapshot.occupant_ids(),
            });
        }

        Err(CommandError::not_accessible(
            "the actor kept moving while the command was prepared",
        ))
    }

    async fn apply(&self, mutations: Vec<Mutation>) -> Result<(), CommandError> {
        for mutation in mutations {
            let result = match mutation {
                Mutation::TransferItem { item_id, from, to } => {
                    self.world.transfer_item(item_id, from, to).await
                }
                Mutation::MoveActor { actor_id, from, to } => {
                    self.world.move_actor(actor_id, from, to).await
                }
                Mutation::SaveActor(actor) => self.world.save_actor(&actor).await,
                Mutation::SaveItem(item) => self.world.save_item(&item).await,
                Mutation::SaveExit(exit) => self.world.save_exit(&exit).await,
            };
            result.map_err(|e| {
                if e.is_constraint_violation() {
                    CommandError::NotAccessible(e.to_string())
                } else {
                    CommandError::Repo(e)
                }
            })?;
        }
        Ok(())
    }

    /// Stamp applied outcomes as events.
    ///
    /// An actor's events all carry the actor's final location. Observers are
    /// whoever is there now plus whoever witnessed the command where it ran.
    /// The outcomes are already applied, so a failed lookup only narrows the
    /// observers down to the witnesses.
    pub async fn record(
        &self,
        actor: EventActor,
        outcomes: Vec<Outcome>,
        input: Option<&str>,
    ) -> Vec<GameEvent> {
        let final_location = match actor.actor_id() {
            Some(actor_id) => match self.world.get_actor(actor_id).await {
                Ok(found) => found.map(|a| a.location_id),
                Err(e) => {
                    tracing::warn!(
                        actor_id = %actor_id,
                        error = %e,
                        "Could not read final location, events keep their own"
                    );
                    None
                }
            },
            None => None,
        };

        let mut occupants: HashMap<LocationId, Vec<ActorId>> = HashMap::new();
        let mut events = Vec::new();
        for outcome in outcomes.into_iter().filter(|o| !o.is_silent()) {
            let location_id = final_location.unwrap_or(outcome.location_id);
            if !occupants.contains_key(&location_id) {
                let present = match self.world.list_actors_in_location(location_id).await {
                    Ok(actors) => actors.into_iter().map(|a| a.id).collect(),
                    Err(e) => {
                        tracing::warn!(
                            location_id = %location_id,
                            error = %e,
                            "Could not list occupants, observers are the witnesses only"
                        );
                        Vec::new()
                    }
                };
                occupants.insert(location_id, present);
            }

            let mut observers = occupants.get(&location_id).cloned().unwrap_or_default();
            for witness in outcome.witnesses {
                if !observers.contains(&witness) {
                    observers.push(witness);
                }
            }

            events.push(GameEvent {
                id: EventId::new(),
                actor,
                location_id,
                command: outcome.command,
                output: outcome.output,
                input: input.map(str::to_string),
                observers,
                created_at: self.clock.now(),
            });
        }

        events
    }
}

//! Background turns for autonomous actors.
//!
//! Every active autonomous actor asks the resolver what it wants to do, then
//! takes that as its instructions. Actors run concurrently; location locks
//! keep their commands from interleaving inside one place.

use std::sync::Arc;

use futures_util::future::join_all;
use imagind_domain::{Actor, GameEvent};
use serde::Serialize;

use crate::infrastructure::ports::{IntentResolverPort, RepoError, ResolverError, WorldRepo};
use crate::use_cases::history::RecentNarration;
use crate::use_cases::referee::RefereeError;
use crate::use_cases::snapshot::LocationSnapshot;
use crate::use_cases::turn::SubmitInstructions;

#[derive(Debug, thiserror::Error)]
enum ActorTurnError {
    #[error(transparent)]
    Resolver(#[from] ResolverError),
    #[error(transparent)]
    Referee(#[from] RefereeError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Everything one tick produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickSummary {
    pub actors: usize,
    pub failures: usize,
    /// Events and consequences of every actor that took a turn
    pub events: Vec<GameEvent>,
}

pub struct AutonomousTick {
    world: Arc<dyn WorldRepo>,
    resolver: Arc<dyn IntentResolverPort>,
    submit: Arc<SubmitInstructions>,
    history: Arc<RecentNarration>,
    history_limit: usize,
}

impl AutonomousTick {
    pub fn new(
        world: Arc<dyn WorldRepo>,
        resolver: Arc<dyn IntentResolverPort>,
        submit: Arc<SubmitInstructions>,
        history: Arc<RecentNarration>,
        history_limit: usize,
    ) -> Self {
        Self {
            world,
            resolver,
            submit,
            history,
            history_limit,
        }
    }

    pub async fn execute(&self) -> Result<TickSummary, RepoError> {
        let actors = self.world.list_active_autonomous_actors().await?;
        let results = join_all(actors.iter().map(|actor| self.take_turn(actor))).await;

        let mut summary = TickSummary {
            actors: actors.len(),
            ..TickSummary::default()
        };
        for (actor, result) in actors.iter().zip(results) {
            match result {
                Ok(events) => summary.events.extend(events),
                Err(e) => {
                    summary.failures += 1;
                    tracing::error!(
                        actor_id = %actor.id,
                        error = %e,
                        "Autonomous turn failed"
                    );
                }
            }
        }

        tracing::info!(
            actors = summary.actors,
            events = summary.events.len(),
            failures = summary.failures,
            "Autonomous tick complete"
        );
        Ok(summary)
    }

    async fn take_turn(&self, actor: &Actor) -> Result<Vec<GameEvent>, ActorTurnError> {
        let snapshot = LocationSnapshot::load(self.world.as_ref(), actor.location_id).await?;
        let mut context = snapshot.to_context(Some(actor));
        context.recent_events = self
            .history
            .lines(actor.id, self.history_limit, true)
            .await?;

        let instructions = self.resolver.compose_instructions(actor, &context).await?;
        if instructions.trim().is_empty() {
            return Ok(Vec::new());
        }
        tracing::debug!(actor_id = %actor.id, instructions = %instructions, "Autonomous intent");

        let turn = self.submit.execute(actor.id, &instructions).await?;
        let mut events = turn.events;
        events.extend(turn.consequences);
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagind_domain::{CommandKind, LocationId};

    use crate::infrastructure::event_log::InMemoryEventLog;
    use crate::infrastructure::ports::{LlmError, MockIntentResolverPort};
    use crate::use_cases::consequences::ResolveConsequences;
    use crate::use_cases::narration::Narrator;
    use crate::use_cases::test_support::{invocation, TestWorld};

    fn tick(t: &TestWorld, resolver: MockIntentResolverPort, log: Arc<InMemoryEventLog>) -> AutonomousTick {
        let resolver: Arc<dyn IntentResolverPort> = Arc::new(resolver);
        let narrator = Arc::new(Narrator::new(t.world.clone()));
        let referee = Arc::new(crate::use_cases::referee::Referee::new(
            t.world.clone(),
            resolver.clone(),
            Arc::new(crate::infrastructure::locks::LocationLocks::new()),
            Arc::new(crate::infrastructure::clock::SystemClock::new()),
        ));
        let consequences = Arc::new(ResolveConsequences::new(
            t.world.clone(),
            resolver.clone(),
            referee.clone(),
            narrator.clone(),
        ));
        let submit = Arc::new(SubmitInstructions::new(referee, consequences, log.clone()));
        let history = Arc::new(RecentNarration::new(log, narrator));
        AutonomousTick::new(t.world.clone(), resolver, submit, history, 20)
    }

    async fn add_goblin(t: &TestWorld, label: &str, location_id: LocationId) -> Actor {
        let goblin = Actor::new(label, location_id).autonomous();
        t.world.save_actor(&goblin).await.unwrap();
        goblin
    }

    #[tokio::test]
    async fn each_active_actor_takes_a_turn() {
        let t = TestWorld::new().await;
        add_goblin(&t, "Grub", t.hall.id).await;
        add_goblin(&t, "Snik", t.garden.id).await;

        let mut resolver = MockIntentResolverPort::new();
        resolver
            .expect_compose_instructions()
            .times(2)
            .returning(|_, _| Ok("I wait and watch.".to_string()));
        resolver.expect_resolve().returning(|request| {
            if request.actor.is_some() {
                Ok(vec![invocation(CommandKind::Wait, serde_json::json!({}))])
            } else {
                Ok(Vec::new())
            }
        });
        let log = Arc::new(InMemoryEventLog::new());

        let summary = tick(&t, resolver, log.clone()).execute().await.unwrap();

        assert_eq!(summary.actors, 2);
        assert_eq!(summary.events.len(), 2);
        assert!(summary
            .events
            .iter()
            .all(|e| e.kind() == CommandKind::Wait));
        assert_eq!(summary.failures, 0);
        assert_eq!(log.len().await, 2);
    }

    #[tokio::test]
    async fn a_failing_actor_does_not_stop_the_others() {
        let t = TestWorld::new().await;
        let grub = add_goblin(&t, "Grub", t.hall.id).await;
        add_goblin(&t, "Snik", t.garden.id).await;

        let mut resolver = MockIntentResolverPort::new();
        resolver.expect_compose_instructions().returning(move |actor, _| {
            if actor.id == grub.id {
                Err(ResolverError::Unavailable(LlmError::RequestFailed(
                    "timeout".to_string(),
                )))
            } else {
                Ok("wait".to_string())
            }
        });
        resolver.expect_resolve().returning(|_| Ok(Vec::new()));

        let summary = tick(&t, resolver, Arc::new(InMemoryEventLog::new()))
            .execute()
            .await
            .unwrap();

        assert_eq!(summary.actors, 2);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.events.len(), 1, "'wait' matches a synonym");
    }

    #[tokio::test]
    async fn sleeping_and_dead_actors_are_skipped() {
        let t = TestWorld::new().await;
        let mut sleeper = Actor::new("Sleeper", t.hall.id).autonomous();
        sleeper.activated = false;
        t.world.save_actor(&sleeper).await.unwrap();
        let corpse = Actor::new("Corpse", t.hall.id)
            .autonomous()
            .with_combat_stats(0, 0, 0);
        t.world.save_actor(&corpse).await.unwrap();

        let mut resolver = MockIntentResolverPort::new();
        resolver.expect_compose_instructions().times(0);

        let summary = tick(&t, resolver, Arc::new(InMemoryEventLog::new()))
            .execute()
            .await
            .unwrap();

        assert_eq!(summary, TickSummary::default());
    }
}

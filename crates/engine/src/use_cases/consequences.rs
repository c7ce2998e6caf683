//! Game-master reaction to what actors just did.
//!
//! Events are grouped by location; for each location the resolver reads the
//! impersonal narration and answers with system commands, which the referee
//! applies like any other command. Consequences of consequences are not
//! resolved.

use std::sync::Arc;

use imagind_domain::{CapabilitySet, EventActor, GameEvent, LocationId};

use crate::infrastructure::ports::{IntentResolverPort, RepoError, ResolveRequest, WorldRepo};
use crate::use_cases::narration::Narrator;
use crate::use_cases::referee::{Performer, Referee};
use crate::use_cases::snapshot::LocationSnapshot;

pub struct ResolveConsequences {
    world: Arc<dyn WorldRepo>,
    resolver: Arc<dyn IntentResolverPort>,
    referee: Arc<Referee>,
    narrator: Arc<Narrator>,
}

impl ResolveConsequences {
    pub fn new(
        world: Arc<dyn WorldRepo>,
        resolver: Arc<dyn IntentResolverPort>,
        referee: Arc<Referee>,
        narrator: Arc<Narrator>,
    ) -> Self {
        Self {
            world,
            resolver,
            referee,
            narrator,
        }
    }

    pub async fn execute(&self, events: &[GameEvent]) -> Result<Vec<GameEvent>, RepoError> {
        let mut consequences = Vec::new();

        for (location_id, group) in group_by_location(events) {
            let mut lines = Vec::new();
            for event in group {
                lines.extend(self.narrator.describe_for_system(event).await?);
            }
            if lines.is_empty() {
                continue;
            }

            let snapshot = LocationSnapshot::load(self.world.as_ref(), location_id).await?;
            let request = ResolveRequest {
                text: lines.join("\n"),
                actor: None,
                capabilities: CapabilitySet::system(),
                context: snapshot.to_context(None),
            };
            let invocations = match self.resolver.resolve(request).await {
                Ok(invocations) => invocations,
                Err(e) => {
                    tracing::warn!(
                        location_id = %location_id,
                        error = %e,
                        "Consequence resolution failed"
                    );
                    continue;
                }
            };

            let mut outcomes = Vec::new();
            for invocation in &invocations {
                match self
                    .referee
                    .execute(Performer::System(location_id), invocation)
                    .await
                {
                    Ok(outcome) => outcomes.push(outcome),
                    Err(e) => tracing::warn!(
                        location_id = %location_id,
                        command = %invocation.kind,
                        error = %e,
                        "Consequence rejected"
                    ),
                }
            }

            consequences.extend(
                self.referee
                    .record(EventActor::System, outcomes, None)
                    .await,
            );
        }

        Ok(consequences)
    }
}

/// Events per location, in order of first appearance.
fn group_by_location(events: &[GameEvent]) -> Vec<(LocationId, Vec<&GameEvent>)> {
    let mut groups: Vec<(LocationId, Vec<&GameEvent>)> = Vec::new();
    for event in events {
        match groups.iter_mut().find(|(id, _)| *id == event.location_id) {
            Some((_, group)) => group.push(event),
            None => groups.push((event.location_id, vec![event])),
        }
    }
    groups
}

//! One actor's turn: resolve, react, persist.

use std::sync::Arc;

use imagind_domain::{ActorId, GameEvent};
use serde::Serialize;

use crate::infrastructure::ports::EventLogRepo;
use crate::use_cases::consequences::ResolveConsequences;
use crate::use_cases::referee::{Referee, RefereeError};

#[derive(Debug, Clone, Serialize)]
pub struct TurnResult {
    pub events: Vec<GameEvent>,
    pub consequences: Vec<GameEvent>,
}

pub struct SubmitInstructions {
    referee: Arc<Referee>,
    consequences: Arc<ResolveConsequences>,
    event_log: Arc<dyn EventLogRepo>,
}

impl SubmitInstructions {
    pub fn new(
        referee: Arc<Referee>,
        consequences: Arc<ResolveConsequences>,
        event_log: Arc<dyn EventLogRepo>,
    ) -> Self {
        Self {
            referee,
            consequences,
            event_log,
        }
    }

    pub async fn execute(&self, actor_id: ActorId, text: &str) -> Result<TurnResult, RefereeError> {
        let events = self.referee.resolve_instructions(actor_id, text).await?;
        if !events.is_empty() {
            self.event_log.append(&events).await?;
        }

        let consequences = match self.consequences.execute(&events).await {
            Ok(consequences) => consequences,
            Err(e) => {
                tracing::warn!(
                    actor_id = %actor_id,
                    error = %e,
                    "Consequence pass failed, keeping the turn's own events"
                );
                Vec::new()
            }
        };
        if !consequences.is_empty() {
            self.event_log.append(&consequences).await?;
        }

        tracing::info!(
            actor_id = %actor_id,
            events = events.len(),
            consequences = consequences.len(),
            "Turn resolved"
        );
        Ok(TurnResult {
            events,
            consequences,
        })
    }
}

//! Narrated history for one observer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use imagind_domain::{ActorId, CommandKind, EventId};
use serde::Serialize;

use crate::infrastructure::ports::{EventLogRepo, RepoError};
use crate::use_cases::narration::Narrator;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarratedEvent {
    pub id: EventId,
    pub kind: CommandKind,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<String>,
}

pub struct RecentNarration {
    event_log: Arc<dyn EventLogRepo>,
    narrator: Arc<Narrator>,
}

impl RecentNarration {
    pub fn new(event_log: Arc<dyn EventLogRepo>, narrator: Arc<Narrator>) -> Self {
        Self {
            event_log,
            narrator,
        }
    }

    /// The last `limit` events `observer` witnessed, oldest first, skipping
    /// any that narrate to nothing for them.
    pub async fn execute(
        &self,
        observer: ActorId,
        limit: usize,
        hide_details: bool,
    ) -> Result<Vec<NarratedEvent>, RepoError> {
        let events = self.event_log.recent_for_observer(observer, limit).await?;
        let mut narrated = Vec::with_capacity(events.len());
        for event in &events {
            let lines = self.narrator.describe(event, observer, hide_details).await?;
            if lines.is_empty() {
                continue;
            }
            narrated.push(NarratedEvent {
                id: event.id,
                kind: event.kind(),
                created_at: event.created_at,
                lines,
            });
        }
        Ok(narrated)
    }

    /// Flattened lines, as fed to prompts.
    pub async fn lines(
        &self,
        observer: ActorId,
        limit: usize,
        hide_details: bool,
    ) -> Result<Vec<String>, RepoError> {
        Ok(self
            .execute(observer, limit, hide_details)
            .await?
            .into_iter()
            .flat_map(|e| e.lines)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockEventLogRepo;
    use crate::use_cases::test_support::TestWorld;
    use imagind_domain::{Command, EventActor, GameEvent};

    #[tokio::test]
    async fn narrates_each_stored_event_for_the_observer() {
        let t = TestWorld::new().await;
        let event = GameEvent {
            id: EventId::new(),
            actor: EventActor::Actor(t.mira.id),
            location_id: t.hall.id,
            command: Command::Wait,
            output: Vec::new(),
            input: Some("wait".to_string()),
            observers: vec![t.mira.id, t.tom.id],
            created_at: Utc::now(),
        };
        let mut log = MockEventLogRepo::new();
        log.expect_recent_for_observer()
            .withf(|_, limit| *limit == 5)
            .returning(move |_, _| Ok(vec![event.clone()]));
        let history = RecentNarration::new(Arc::new(log), Arc::new(Narrator::new(t.world.clone())));

        assert_eq!(
            history.lines(t.tom.id, 5, true).await.unwrap(),
            vec!["Mira waits.".to_string()]
        );
    }
}

//! In-memory append-only event log.

use async_trait::async_trait;
use imagind_domain::{ActorId, GameEvent};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{EventLogRepo, RepoError};

#[derive(Default)]
pub struct InMemoryEventLog {
    events: RwLock<Vec<GameEvent>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventLogRepo for InMemoryEventLog {
    async fn append(&self, events: &[GameEvent]) -> Result<(), RepoError> {
        if events.is_empty() {
            return Ok(());
        }
        self.events.write().await.extend_from_slice(events);
        Ok(())
    }

    async fn recent_for_observer(
        &self,
        observer: ActorId,
        limit: usize,
    ) -> Result<Vec<GameEvent>, RepoError> {
        let events = self.events.read().await;
        let mut seen: Vec<&GameEvent> = events
            .iter()
            .filter(|e| e.is_observed_by(observer))
            .collect();
        // Newest first, then keep the head and flip back to chronological.
        seen.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let mut recent: Vec<GameEvent> = seen.into_iter().take(limit).cloned().collect();
        recent.reverse();
        Ok(recent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use imagind_domain::{Command, EventActor, EventId, LocationId};

    fn event(observers: Vec<ActorId>, minute: i64, text: &str) -> GameEvent {
        GameEvent {
            id: EventId::new(),
            actor: EventActor::System,
            location_id: LocationId::new(),
            command: Command::Event(imagind_domain::commands::EventArgs {
                event_text: text.to_string(),
            }),
            output: vec![text.to_string()],
            input: None,
            observers,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
                + Duration::minutes(minute),
        }
    }

    #[tokio::test]
    async fn returns_most_recent_n_oldest_first() {
        let log = InMemoryEventLog::new();
        let mira = ActorId::new();
        let tom = ActorId::new();
        // Appended out of order on purpose.
        log.append(&[
            event(vec![mira], 3, "third"),
            event(vec![mira], 1, "first"),
            event(vec![tom], 4, "unseen"),
            event(vec![mira, tom], 2, "second"),
        ])
        .await
        .unwrap();

        let recent = log.recent_for_observer(mira, 2).await.unwrap();

        let texts: Vec<&str> = recent.iter().map(|e| e.output[0].as_str()).collect();
        assert_eq!(texts, vec!["second", "third"]);
    }

    #[tokio::test]
    async fn empty_append_is_a_no_op() {
        let log = InMemoryEventLog::new();
        log.append(&[]).await.unwrap();
        assert!(log.is_empty().await);
    }
}

//! SQLite-backed append-only event log.
//!
//! One row per event. Arguments, output lines and the observer list are JSON
//! text columns; the observer filter uses SQLite's `json_each`.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use imagind_domain::{ActorId, Command, CommandKind, EventActor, EventId, GameEvent, LocationId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::infrastructure::ports::{EventLogRepo, RepoError};

pub struct SqliteEventLog {
    pool: SqlitePool,
}

impl SqliteEventLog {
    pub async fn new(db_path: &str) -> Result<Self, RepoError> {
        if let Some(parent) = std::path::Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| RepoError::database("event_log", e))?;
            }
        }

        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("event_log", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS game_events (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                actor_id TEXT NOT NULL,
                location_id TEXT NOT NULL,
                command_kind TEXT NOT NULL,
                arguments_json TEXT NOT NULL,
                output_json TEXT NOT NULL,
                input TEXT,
                observers_json TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("event_log", e))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_game_events_created_at ON game_events (created_at)",
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("event_log", e))?;

        Ok(Self { pool })
    }
}

fn timestamp(at: &DateTime<Utc>) -> String {
    // Fixed width so text ordering matches time ordering.
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode(row: &SqliteRow) -> Result<GameEvent, RepoError> {
    let text = |column: &str| -> Result<String, RepoError> {
        row.try_get::<String, _>(column)
            .map_err(|e| RepoError::database("event_log.decode", e))
    };

    let id: EventId = text("id")?.parse().map_err(RepoError::serialization)?;
    let actor: EventActor = text("actor_id")?.parse().map_err(RepoError::serialization)?;
    let location_id: LocationId = text("location_id")?
        .parse()
        .map_err(RepoError::serialization)?;
    let kind: CommandKind = text("command_kind")?
        .parse()
        .map_err(RepoError::serialization)?;
    let arguments: serde_json::Value =
        serde_json::from_str(&text("arguments_json")?).map_err(RepoError::serialization)?;
    let command = Command::from_raw(kind, &arguments).map_err(RepoError::serialization)?;
    let output: Vec<String> =
        serde_json::from_str(&text("output_json")?).map_err(RepoError::serialization)?;
    let input: Option<String> = row
        .try_get("input")
        .map_err(|e| RepoError::database("event_log.decode", e))?;
    let observers: Vec<ActorId> =
        serde_json::from_str(&text("observers_json")?).map_err(RepoError::serialization)?;
    let created_at = DateTime::parse_from_rfc3339(&text("created_at")?)
        .map_err(RepoError::serialization)?
        .with_timezone(&Utc);

    Ok(GameEvent {
        id,
        actor,
        location_id,
        command,
        output,
        input,
        observers,
        created_at,
    })
}

#[async_trait]
impl EventLogRepo for SqliteEventLog {
    async fn append(&self, events: &[GameEvent]) -> Result<(), RepoError> {
        if events.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("event_log.append", e))?;

        for event in events {
            let output =
                serde_json::to_string(&event.output).map_err(RepoError::serialization)?;
            let observers =
                serde_json::to_string(&event.observers).map_err(RepoError::serialization)?;
            sqlx::query(
                r#"
                INSERT INTO game_events
                    (id, actor_id, location_id, command_kind, arguments_json, output_json, input, observers_json, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(event.id.to_string())
            .bind(event.actor.to_string())
            .bind(event.location_id.to_string())
            .bind(event.kind().as_str())
            .bind(event.command.arguments_json().to_string())
            .bind(output)
            .bind(event.input.clone())
            .bind(observers)
            .bind(timestamp(&event.created_at))
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("event_log.append", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("event_log.append", e))
    }

    async fn recent_for_observer(
        &self,
        observer: ActorId,
        limit: usize,
    ) -> Result<Vec<GameEvent>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT id, actor_id, location_id, command_kind, arguments_json, output_json, input, observers_json, created_at
            FROM game_events
            WHERE EXISTS (
                SELECT 1 FROM json_each(game_events.observers_json)
                WHERE json_each.value = ?
            )
            ORDER BY created_at DESC, seq DESC
            LIMIT ?
            "#,
        )
        .bind(observer.to_string())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("event_log.recent_for_observer", e))?;

        let mut events = rows.iter().map(decode).collect::<Result<Vec<_>, _>>()?;
        events.reverse();
        Ok(events)
    }
}

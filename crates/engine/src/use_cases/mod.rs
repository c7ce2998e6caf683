//! Use cases - User story orchestration.
//!
//! The referee is the only place world state changes. Everything else here
//! orchestrates it: a player turn, game-master consequences, the autonomous
//! tick, and narrated history.

pub mod autonomous;
pub mod consequences;
pub mod history;
pub mod narration;
pub mod referee;
pub mod snapshot;
pub mod turn;

#[cfg(test)]
pub(crate) mod test_support;

pub use autonomous::{AutonomousTick, TickSummary};
pub use consequences::ResolveConsequences;
pub use history::{NarratedEvent, RecentNarration};
pub use narration::Narrator;
pub use referee::{CommandError, Outcome, Performer, Referee, RefereeError};
pub use snapshot::LocationSnapshot;
pub use turn::{SubmitInstructions, TurnResult};

//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    locks::LocationLocks,
    ports::{ClockPort, EventLogRepo, IntentResolverPort, WorldRepo},
};
use crate::use_cases::{
    AutonomousTick, Narrator, RecentNarration, Referee, ResolveConsequences, SubmitInstructions,
};

/// Main application state.
///
/// Holds the repositories and use cases.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

pub struct Repositories {
    pub world: Arc<dyn WorldRepo>,
    pub event_log: Arc<dyn EventLogRepo>,
}

/// Container for all use cases.
pub struct UseCases {
    pub referee: Arc<Referee>,
    pub narrator: Arc<Narrator>,
    pub consequences: Arc<ResolveConsequences>,
    pub submit: Arc<SubmitInstructions>,
    pub history: Arc<RecentNarration>,
    pub tick: Arc<AutonomousTick>,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        world: Arc<dyn WorldRepo>,
        event_log: Arc<dyn EventLogRepo>,
        resolver: Arc<dyn IntentResolverPort>,
        clock: Arc<dyn ClockPort>,
        event_history_limit: usize,
    ) -> Self {
        let locks = Arc::new(LocationLocks::new());

        let referee = Arc::new(Referee::new(
            world.clone(),
            resolver.clone(),
            locks,
            clock,
        ));
        let narrator = Arc::new(Narrator::new(world.clone()));
        let consequences = Arc::new(ResolveConsequences::new(
            world.clone(),
            resolver.clone(),
            referee.clone(),
            narrator.clone(),
        ));
        let submit = Arc::new(SubmitInstructions::new(
            referee.clone(),
            consequences.clone(),
            event_log.clone(),
        ));
        let history = Arc::new(RecentNarration::new(event_log.clone(), narrator.clone()));
        let tick = Arc::new(AutonomousTick::new(
            world.clone(),
            resolver,
            submit.clone(),
            history.clone(),
            event_history_limit,
        ));

        Self {
            repositories: Repositories { world, event_log },
            use_cases: UseCases {
                referee,
                narrator,
                consequences,
                submit,
                history,
                tick,
            },
        }
    }
}

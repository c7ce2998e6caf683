//! Imagind Engine library.
//!
//! Resolves free-text instructions into validated world commands, runs the
//! game-master consequence pass and the autonomous tick, and narrates events.
//!
//! ## Structure
//!
//! - `use_cases/` - Referee, consequences, narration, turns, the tick
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;

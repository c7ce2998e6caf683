//! World graph entities and the event record

mod actor;
mod creature_template;
mod exit;
mod game_event;
mod item;
mod location;

pub use actor::Actor;
pub use creature_template::CreatureTemplate;
pub use exit::Exit;
pub use game_event::{EventActor, GameEvent};
pub use item::{indefinite_article, Item, ItemOwner};
pub use location::Location;

/// Kind tag shared by every world-graph entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Actor,
    Location,
    Item,
    Exit,
    CreatureTemplate,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Actor => "Actor",
            Self::Location => "Location",
            Self::Item => "Item",
            Self::Exit => "Exit",
            Self::CreatureTemplate => "CreatureTemplate",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

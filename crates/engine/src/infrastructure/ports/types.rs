//! Data passed across the intent-resolver boundary.

use imagind_domain::{
    Actor, CapabilitySet, CreatureTemplate, Exit, Item, Location,
};

/// Everything a resolver may know about the place a command happens in.
///
/// Built by the engine for one point of view: an actor sees only visible
/// exits and items, the game master sees everything.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldContext {
    pub location: Location,
    pub exits: Vec<Exit>,
    /// Items in the location, including the contents of open containers
    pub items: Vec<Item>,
    /// Other actors present
    pub actors: Vec<Actor>,
    /// Items carried by the acting actor
    pub inventory: Vec<Item>,
    /// Creature templates that may be spawned here
    pub templates: Vec<CreatureTemplate>,
    /// Narrated recent events, oldest first
    pub recent_events: Vec<String>,
}

impl WorldContext {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            exits: Vec::new(),
            items: Vec::new(),
            actors: Vec::new(),
            inventory: Vec::new(),
            templates: Vec::new(),
            recent_events: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolveRequest {
    pub text: String,
    /// `None` for the game master
    pub actor: Option<Actor>,
    pub capabilities: CapabilitySet,
    pub context: WorldContext,
}

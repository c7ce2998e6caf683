//! Creature templates - blueprints for actors spawned by the game master

use serde::{Deserialize, Serialize};

use crate::{Actor, ActorId, CreatureTemplateId, LocationId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureTemplate {
    pub id: CreatureTemplateId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    #[serde(default = "default_health")]
    pub health: i32,
    #[serde(default)]
    pub damage: i32,
    #[serde(default)]
    pub defence: i32,
    #[serde(default)]
    pub backstory: String,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub notes: String,
}

fn default_health() -> i32 {
    10
}

fn default_capacity() -> u32 {
    10
}

impl CreatureTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CreatureTemplateId::new(),
            name: name.into(),
            description: String::new(),
            capacity: default_capacity(),
            health: default_health(),
            damage: 0,
            defence: 0,
            backstory: String::new(),
            mood: String::new(),
            notes: String::new(),
        }
    }

    /// Instantiate an autonomous, activated actor from this template.
    pub fn spawn(&self, name: &str, location_id: LocationId) -> Actor {
        let label = if name.trim().is_empty() {
            self.name.clone()
        } else {
            name.trim().to_string()
        };

        Actor {
            id: ActorId::new(),
            label,
            short_description: self.description.clone(),
            long_description: self.description.clone(),
            location_id,
            capacity: self.capacity,
            health: self.health,
            damage: self.damage,
            defence: self.defence,
            mood: self.mood.clone(),
            current_intent: String::new(),
            goal: String::new(),
            backstory: self.backstory.clone(),
            notes: self.notes.clone(),
            autonomous: true,
            activated: true,
        }
    }
}

//! Actor entity - anything that can issue commands
//!
//! Player characters and autonomous creatures share one shape. The
//! `autonomous` flag decides whether the tick loop may drive the actor, and
//! `activated` decides whether it currently does.

use serde::{Deserialize, Serialize};

use crate::{ActorId, LocationId};

/// A controllable entity with health, an inventory and a location.
///
/// Inventory is not stored on the actor; items point at their owner instead
/// (see [`crate::ItemOwner`]). The world store answers "what does this actor
/// carry" by traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub label: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    /// Where the actor stands. Always a valid location id.
    pub location_id: LocationId,
    /// Maximum total weight the actor can carry
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    #[serde(default = "default_health")]
    pub health: i32,
    #[serde(default)]
    pub damage: i32,
    #[serde(default)]
    pub defence: i32,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub current_intent: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub backstory: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub autonomous: bool,
    #[serde(default)]
    pub activated: bool,
}

fn default_capacity() -> u32 {
    10
}

fn default_health() -> i32 {
    10
}

impl Actor {
    pub fn new(label: impl Into<String>, location_id: LocationId) -> Self {
        Self {
            id: ActorId::new(),
            label: label.into(),
            short_description: String::new(),
            long_description: String::new(),
            location_id,
            capacity: default_capacity(),
            health: default_health(),
            damage: 0,
            defence: 0,
            mood: String::new(),
            current_intent: String::new(),
            goal: String::new(),
            backstory: String::new(),
            notes: String::new(),
            autonomous: false,
            activated: false,
        }
    }

    /// Builder for autonomous actors that start out active.
    pub fn autonomous(mut self) -> Self {
        self.autonomous = true;
        self.activated = true;
        self
    }

    pub fn with_combat_stats(mut self, health: i32, damage: i32, defence: i32) -> Self {
        self.health = health;
        self.damage = damage;
        self.defence = defence;
        self
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Whether the autonomous tick loop should drive this actor right now.
    pub fn is_active_autonomous(&self) -> bool {
        self.autonomous && self.activated && !self.is_dead()
    }

    /// Damage this actor deals to `target` in one blow.
    pub fn damage_against(&self, target: &Actor) -> i32 {
        (self.damage - target.defence).max(0)
    }

    /// Reduce health and report whether this blow killed the actor.
    ///
    /// A defeated actor is also deactivated so the tick loop stops driving it.
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        let was_alive = !self.is_dead();
        self.health -= amount.max(0);
        if self.is_dead() {
            self.activated = false;
        }
        was_alive && self.is_dead()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defeat_is_reported_once() {
        let mut target = Actor::new("Goblin", LocationId::new())
            .autonomous()
            .with_combat_stats(3, 0, 0);

        assert!(!target.apply_damage(2));
        assert!(target.apply_damage(2));
        assert!(target.is_dead());
        assert!(!target.activated);
        assert!(!target.apply_damage(2));
    }

    #[test]
    fn defence_never_heals() {
        let attacker = Actor::new("Mira", LocationId::new()).with_combat_stats(10, 2, 0);
        let target = Actor::new("Troll", LocationId::new()).with_combat_stats(10, 1, 5);
        assert_eq!(attacker.damage_against(&target), 0);
    }

    #[test]
    fn dead_autonomous_actor_is_not_active() {
        let mut npc = Actor::new("Rat", LocationId::new()).autonomous();
        assert!(npc.is_active_autonomous());
        npc.health = 0;
        assert!(!npc.is_active_autonomous());
    }
}

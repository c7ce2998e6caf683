//! World seed documents: the starting world graph as JSON.
//!
//! A seed is validated as a whole before anything is written, so a bad file
//! never leaves a half-installed world behind.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use imagind_domain::containment::{self, ContainmentGraph};
use imagind_domain::{
    Actor, ActorId, CreatureTemplate, DomainError, Exit, Item, ItemId, ItemOwner, Location,
    LocationId,
};
use serde::{Deserialize, Serialize};

use crate::infrastructure::ports::{RepoError, WorldRepo};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read world file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse world file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid world: {0}")]
    Invalid(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSeed {
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub exits: Vec<Exit>,
    #[serde(default)]
    pub actors: Vec<Actor>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub templates: Vec<CreatureTemplate>,
}

/// Ownership edges of a seed that has not been installed yet.
struct SeedGraph {
    item_owners: HashMap<ItemId, ItemOwner>,
    actor_locations: HashMap<ActorId, LocationId>,
}

impl ContainmentGraph for SeedGraph {
    fn owner_of_item(&self, item_id: ItemId) -> Option<ItemOwner> {
        self.item_owners.get(&item_id).copied()
    }

    fn location_of_actor(&self, actor_id: ActorId) -> Option<LocationId> {
        self.actor_locations.get(&actor_id).copied()
    }
}

impl WorldSeed {
    pub async fn load_from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SeedError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Check every reference and walk every item to its root location.
    ///
    /// Returns the items ordered so that each container comes before its
    /// contents.
    pub fn validate(&self) -> Result<Vec<&Item>, DomainError> {
        let locations: HashSet<LocationId> = self.locations.iter().map(|l| l.id).collect();
        let templates: HashSet<_> = self.templates.iter().map(|t| t.id).collect();

        for location in &self.locations {
            if location.label.trim().is_empty() {
                return Err(DomainError::validation("location label cannot be empty"));
            }
            if let Some(missing) = location
                .template_ids
                .iter()
                .find(|id| !templates.contains(id))
            {
                return Err(DomainError::not_found("CreatureTemplate", missing.to_string()));
            }
        }
        for exit in &self.exits {
            for end in [exit.location_id, exit.destination_id] {
                if !locations.contains(&end) {
                    return Err(DomainError::not_found("Location", end.to_string()));
                }
            }
        }
        for actor in &self.actors {
            if !locations.contains(&actor.location_id) {
                return Err(DomainError::not_found(
                    "Location",
                    actor.location_id.to_string(),
                ));
            }
        }

        let graph = SeedGraph {
            item_owners: self.items.iter().map(|i| (i.id, i.owner)).collect(),
            actor_locations: self
                .actors
                .iter()
                .map(|a| (a.id, a.location_id))
                .collect(),
        };

        let mut ordered = Vec::with_capacity(self.items.len());
        for item in &self.items {
            let placement = containment::resolve_placement(&graph, item.owner)?;
            if !locations.contains(&placement.root) {
                return Err(DomainError::not_found(
                    "Location",
                    placement.root.to_string(),
                ));
            }
            let depth = placement
                .chain
                .iter()
                .filter(|owner| owner.as_item().is_some())
                .count();
            ordered.push((depth, item));
        }
        ordered.sort_by_key(|(depth, _)| *depth);

        Ok(ordered.into_iter().map(|(_, item)| item).collect())
    }

    /// Validate, then write the whole seed into the world store.
    pub async fn install(&self, world: &dyn WorldRepo) -> Result<(), SeedError> {
        let items = self.validate()?;

        for location in &self.locations {
            world.save_location(location).await?;
        }
        for template in &self.templates {
            world.save_template(template).await?;
        }
        for exit in &self.exits {
            world.save_exit(exit).await?;
        }
        for actor in &self.actors {
            world.save_actor(actor).await?;
        }
        for item in items {
            world.save_item(item).await?;
        }

        tracing::info!(
            locations = self.locations.len(),
            exits = self.exits.len(),
            actors = self.actors.len(),
            items = self.items.len(),
            templates = self.templates.len(),
            "World seed installed"
        );
        Ok(())
    }

    /// A small world to play in when no world file is configured.
    pub fn demo() -> Self {
        let rat = CreatureTemplate {
            description: "A fat grey rat with a twitching nose".to_string(),
            damage: 1,
            health: 3,
            mood: "skittish".to_string(),
            ..CreatureTemplate::new("cellar rat")
        };

        let hall = Location::new("Entrance Hall").with_description(
            "A dusty entrance hall",
            "A dusty entrance hall. Portraits with scratched-out faces line the walls.",
        );
        let garden = Location::new("Rose Garden").with_description(
            "An overgrown rose garden",
            "An overgrown rose garden. Thorns have swallowed the paths.",
        );
        let mut cellar = Location::new("Wine Cellar").with_description(
            "A damp wine cellar",
            "A damp wine cellar. Broken bottles crunch underfoot.",
        );
        cellar.template_ids.push(rat.id);

        let exits = vec![
            Exit::new("oak door", "north", hall.id, garden.id)
                .with_description("A heavy oak door, propped open"),
            Exit::new("oak door", "south", garden.id, hall.id)
                .with_description("A heavy oak door leading back inside"),
            Exit {
                notes: "Unlocks when someone uses the iron key on it.".to_string(),
                ..Exit::new("trapdoor", "down", hall.id, cellar.id)
                    .with_description("A trapdoor set into the floorboards")
                    .locked()
            },
            Exit::new("ladder", "up", cellar.id, hall.id)
                .with_description("A rickety ladder up to the hall"),
        ];

        let wanderer = Actor {
            short_description: "a travel-worn wanderer".to_string(),
            long_description: "a travel-worn wanderer with mud on their boots".to_string(),
            ..Actor::new("Wanderer", hall.id).with_combat_stats(10, 3, 1)
        };
        let gardener = Actor {
            short_description: "a stooped old gardener".to_string(),
            long_description: "a stooped old gardener who has tended these roses for fifty years"
                .to_string(),
            mood: "wistful".to_string(),
            goal: "Keep strangers away from the cellar".to_string(),
            backstory: "He buried something in the cellar long ago and has never spoken of it."
                .to_string(),
            autonomous: true,
            ..Actor::new("Old Gardener", garden.id).with_combat_stats(8, 2, 0)
        };

        let chest = Item::new("chest", ItemOwner::Location(hall.id))
            .with_description("An iron-banded chest, lid ajar")
            .with_weight(20)
            .with_capacity(5);
        let items = vec![
            Item::new("iron key", ItemOwner::Item(chest.id))
                .with_description("A heavy iron key, cold to the touch")
                .hidden(),
            Item::new("lantern", ItemOwner::Location(hall.id))
                .with_description("A brass lantern with a cracked pane")
                .with_weight(2),
            Item::new("rose", ItemOwner::Location(garden.id))
                .with_description("A single perfect red rose"),
            Item::new("pruning shears", ItemOwner::Actor(gardener.id))
                .with_description("Rusty pruning shears")
                .with_weight(2),
            chest,
        ];

        Self {
            locations: vec![hall, garden, cellar],
            exits,
            actors: vec![wanderer, gardener],
            items,
            templates: vec![rat],
        }
    }
}

//! Eager, read-only view of one location and everything rooted in it.
//!
//! The referee validates commands against a snapshot taken while it holds the
//! location lock; the resolver context is rendered from the same view.

use std::collections::VecDeque;

use imagind_domain::{
    Actor, ActorId, CreatureTemplate, Exit, ExitId, Item, ItemId, ItemOwner, Location, LocationId,
    MAX_CONTAINMENT_DEPTH,
};

use crate::infrastructure::ports::{RepoError, WorldContext, WorldRepo};

#[derive(Debug, Clone)]
pub struct LocationSnapshot {
    pub location: Location,
    pub exits: Vec<Exit>,
    /// Everyone present, the dead included
    pub actors: Vec<Actor>,
    /// Every item whose owner chain ends here: on the floor, carried, or nested
    pub items: Vec<Item>,
    pub templates: Vec<CreatureTemplate>,
}

impl LocationSnapshot {
    pub async fn load(world: &dyn WorldRepo, location_id: LocationId) -> Result<Self, RepoError> {
        let location = world
            .get_location(location_id)
            .await?
            .ok_or_else(|| RepoError::not_found("Location", location_id))?;
        let exits = world.list_exits_from(location_id).await?;
        let actors = world.list_actors_in_location(location_id).await?;

        let mut items = Vec::new();
        let mut frontier: VecDeque<(ItemOwner, usize)> = VecDeque::new();
        frontier.push_back((ItemOwner::Location(location_id), 0));
        for actor in &actors {
            frontier.push_back((ItemOwner::Actor(actor.id), 1));
        }
        while let Some((owner, depth)) = frontier.pop_front() {
            if depth > MAX_CONTAINMENT_DEPTH {
                tracing::warn!(owner = %owner, "Containment deeper than limit, ignoring contents");
                continue;
            }
            for item in world.list_items_owned_by(owner).await? {
                frontier.push_back((ItemOwner::Item(item.id), depth + 1));
                items.push(item);
            }
        }

        let mut templates = Vec::new();
        for template_id in &location.template_ids {
            match world.get_template(*template_id).await? {
                Some(template) => templates.push(template),
                None => tracing::warn!(
                    location_id = %location_id,
                    template_id = %template_id,
                    "Location references a missing creature template"
                ),
            }
        }

        Ok(Self {
            location,
            exits,
            actors,
            items,
            templates,
        })
    }

    pub fn location_id(&self) -> LocationId {
        self.location.id
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn exit(&self, id: ExitId) -> Option<&Exit> {
        self.exits.iter().find(|e| e.id == id)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn occupant_ids(&self) -> Vec<ActorId> {
        self.actors.iter().map(|a| a.id).collect()
    }

    /// Items directly owned by `owner`.
    pub fn contents(&self, owner: ItemOwner) -> impl Iterator<Item = &Item> + '_ {
        self.items.iter().filter(move |i| i.owner == owner)
    }

    /// Non-hidden items directly owned by `owner`.
    pub fn visible_contents(&self, owner: ItemOwner) -> impl Iterator<Item = &Item> + '_ {
        self.contents(owner).filter(|i| !i.hidden)
    }

    /// Whether any item enclosing `item` is hidden.
    pub fn is_enclosed_by_hidden(&self, item: &Item) -> bool {
        let mut owner = item.owner;
        for _ in 0..MAX_CONTAINMENT_DEPTH {
            match owner {
                ItemOwner::Item(container_id) => match self.item(container_id) {
                    Some(container) if container.hidden => return true,
                    Some(container) => owner = container.owner,
                    None => return false,
                },
                _ => return false,
            }
        }
        false
    }

    /// Total weight of `item` and everything inside it.
    pub fn weight_of(&self, item: &Item) -> u32 {
        let mut total = 0u32;
        let mut stack = vec![(item, 0usize)];
        while let Some((current, depth)) = stack.pop() {
            total = total.saturating_add(current.weight);
            if depth < MAX_CONTAINMENT_DEPTH {
                stack.extend(
                    self.contents(ItemOwner::Item(current.id))
                        .map(|child| (child, depth + 1)),
                );
            }
        }
        total
    }

    /// Total weight an owner carries, nested contents included.
    pub fn load_of(&self, owner: ItemOwner) -> u32 {
        self.contents(owner)
            .map(|item| self.weight_of(item))
            .fold(0u32, u32::saturating_add)
    }

    /// Lines an actor sees when looking around.
    pub fn look_around(&self, viewer: Option<ActorId>) -> Vec<String> {
        let mut lines = Vec::new();

        let description = if !self.location.long_description.is_empty() {
            self.location.long_description.clone()
        } else if !self.location.short_description.is_empty() {
            self.location.short_description.clone()
        } else {
            self.location.label.clone()
        };
        lines.push(description);

        for exit in self.exits.iter().filter(|e| !e.hidden) {
            let what = if exit.short_description.is_empty() {
                exit.label.as_str()
            } else {
                exit.short_description.as_str()
            };
            lines.push(format!("To the {}: {}", exit.direction, what));
        }

        for actor in self.actors.iter().filter(|a| Some(a.id) != viewer) {
            if actor.is_dead() {
                lines.push(format!("{} lies here, motionless.", actor.label));
            } else {
                lines.push(format!("{} is here.", actor.label));
            }
        }

        for item in self.visible_contents(ItemOwner::Location(self.location.id)) {
            lines.push(format!("There is {} here.", item.with_article()));
        }

        lines
    }

    /// Resolver context from an actor's point of view, or the game master's
    /// when `viewer` is `None`.
    pub fn to_context(&self, viewer: Option<&Actor>) -> WorldContext {
        let mut context = WorldContext::new(self.location.clone());

        match viewer {
            Some(actor) => {
                context.exits = self.exits.iter().filter(|e| !e.hidden).cloned().collect();
                context.actors = self
                    .actors
                    .iter()
                    .filter(|a| a.id != actor.id)
                    .cloned()
                    .collect();
                context.items = self.open_items(ItemOwner::Location(self.location.id));
                context.inventory = self.open_items(ItemOwner::Actor(actor.id));
            }
            None => {
                context.exits = self.exits.clone();
                context.actors = self.actors.clone();
                context.items = self.items.clone();
                context.templates = self.templates.clone();
            }
        }

        context
    }

    /// Visible items owned by `owner` plus the visible contents of those, one
    /// level down.
    fn open_items(&self, owner: ItemOwner) -> Vec<Item> {
        let mut items = Vec::new();
        for item in self.visible_contents(owner) {
            items.push(item.clone());
            items.extend(self.visible_contents(ItemOwner::Item(item.id)).cloned());
        }
        items
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::infrastructure::world_store::InMemoryWorldRepo;

    #[tokio::test]
    async fn snapshot_collects_nested_and_carried_items() {
        let world = InMemoryWorldRepo::new();
        let hall = Location::new("Hall").with_description("A hall.", "A long, echoing hall.");
        world.save_location(&hall).await.unwrap();
        let mira = Actor::new("Mira", hall.id);
        world.save_actor(&mira).await.unwrap();
        let chest = Item::new("chest", ItemOwner::Location(hall.id)).with_capacity(10);
        let ring = Item::new("ring", ItemOwner::Item(chest.id)).hidden();
        let bag = Item::new("bag", ItemOwner::Actor(mira.id)).with_capacity(3);
        for item in [&chest, &ring, &bag] {
            world.save_item(item).await.unwrap();
        }

        let snapshot = LocationSnapshot::load(&world, hall.id).await.unwrap();

        assert_eq!(snapshot.items.len(), 3);
        let context = snapshot.to_context(Some(&mira));
        assert_eq!(context.items.len(), 1, "hidden ring is not in the actor view");
        assert_eq!(context.inventory.len(), 1);
        assert_eq!(snapshot.to_context(None).items.len(), 3);
    }

    #[tokio::test]
    async fn look_around_lists_exits_people_and_floor_items() {
        let world = InMemoryWorldRepo::new();
        let hall = Location::new("Hall").with_description("A hall.", "A long, echoing hall.");
        let cellar = Location::new("Cellar");
        world.save_location(&hall).await.unwrap();
        world.save_location(&cellar).await.unwrap();
        let stairs = Exit::new("stairs", "down", hall.id, cellar.id).with_description("dark steps");
        let secret = Exit::new("panel", "west", hall.id, cellar.id).hidden();
        world.save_exit(&stairs).await.unwrap();
        world.save_exit(&secret).await.unwrap();
        let mira = Actor::new("Mira", hall.id);
        let tom = Actor::new("Tom", hall.id);
        world.save_actor(&mira).await.unwrap();
        world.save_actor(&tom).await.unwrap();
        world
            .save_item(&Item::new("apple", ItemOwner::Location(hall.id)))
            .await
            .unwrap();

        let snapshot = LocationSnapshot::load(&world, hall.id).await.unwrap();

        assert_eq!(
            snapshot.look_around(Some(mira.id)),
            vec![
                "A long, echoing hall.".to_string(),
                "To the down: dark steps".to_string(),
                "Tom is here.".to_string(),
                "There is an apple here.".to_string(),
            ]
        );
    }

    #[test]
    fn weight_includes_contents() {
        let loc = LocationId::new();
        let chest = Item::new("chest", ItemOwner::Location(loc))
            .with_capacity(10)
            .with_weight(5);
        let gold = Item::new("gold", ItemOwner::Item(chest.id)).with_weight(3);
        let snapshot = LocationSnapshot {
            location: Location::new("Vault"),
            exits: Vec::new(),
            actors: Vec::new(),
            items: vec![chest.clone(), gold],
            templates: Vec::new(),
        };

        assert_eq!(snapshot.weight_of(&chest), 8);
        assert_eq!(snapshot.load_of(ItemOwner::Location(loc)), 8);
    }
}

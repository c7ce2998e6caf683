//! In-memory world graph backed by `DashMap`s.
//!
//! Each entity kind lives in its own map keyed by id. Relationship queries scan
//! the relevant map and sort the result so callers see a stable order.

use async_trait::async_trait;
use dashmap::DashMap;
use imagind_domain::containment::{self, ContainmentGraph};
use imagind_domain::{
    Actor, ActorId, CreatureTemplate, CreatureTemplateId, Exit, ExitId, Item, ItemId, ItemOwner,
    Location, LocationId,
};

use crate::infrastructure::ports::{RepoError, WorldRepo};

#[derive(Default)]
pub struct InMemoryWorldRepo {
    actors: DashMap<ActorId, Actor>,
    locations: DashMap<LocationId, Location>,
    exits: DashMap<ExitId, Exit>,
    items: DashMap<ItemId, Item>,
    templates: DashMap<CreatureTemplateId, CreatureTemplate>,
}

impl InMemoryWorldRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn require_location(&self, id: LocationId) -> Result<(), RepoError> {
        if self.locations.contains_key(&id) {
            Ok(())
        } else {
            Err(RepoError::not_found("Location", id))
        }
    }
}

impl ContainmentGraph for InMemoryWorldRepo {
    fn owner_of_item(&self, item_id: ItemId) -> Option<ItemOwner> {
        self.items.get(&item_id).map(|item| item.owner)
    }

    fn location_of_actor(&self, actor_id: ActorId) -> Option<LocationId> {
        self.actors.get(&actor_id).map(|actor| actor.location_id)
    }
}

#[async_trait]
impl WorldRepo for InMemoryWorldRepo {
    async fn get_actor(&self, id: ActorId) -> Result<Option<Actor>, RepoError> {
        Ok(self.actors.get(&id).map(|a| a.clone()))
    }

    async fn save_actor(&self, actor: &Actor) -> Result<(), RepoError> {
        self.require_location(actor.location_id)?;
        self.actors.insert(actor.id, actor.clone());
        Ok(())
    }

    async fn list_actors_in_location(
        &self,
        location_id: LocationId,
    ) -> Result<Vec<Actor>, RepoError> {
        let mut actors: Vec<Actor> = self
            .actors
            .iter()
            .filter(|a| a.location_id == location_id)
            .map(|a| a.clone())
            .collect();
        actors.sort_by(|a, b| a.label.cmp(&b.label).then(a.id.cmp(&b.id)));
        Ok(actors)
    }

    async fn list_active_autonomous_actors(&self) -> Result<Vec<Actor>, RepoError> {
        let mut actors: Vec<Actor> = self
            .actors
            .iter()
            .filter(|a| a.is_active_autonomous())
            .map(|a| a.clone())
            .collect();
        actors.sort_by(|a, b| a.label.cmp(&b.label).then(a.id.cmp(&b.id)));
        Ok(actors)
    }

    async fn move_actor(
        &self,
        actor_id: ActorId,
        expected_location: LocationId,
        destination: LocationId,
    ) -> Result<(), RepoError> {
        self.require_location(destination)?;
        let mut actor = self
            .actors
            .get_mut(&actor_id)
            .ok_or_else(|| RepoError::not_found("Actor", actor_id))?;
        if actor.location_id != expected_location {
            return Err(RepoError::constraint(format!(
                "actor {} is no longer in location {}",
                actor_id, expected_location
            )));
        }
        actor.location_id = destination;
        Ok(())
    }

    async fn get_location(&self, id: LocationId) -> Result<Option<Location>, RepoError> {
        Ok(self.locations.get(&id).map(|l| l.clone()))
    }

    async fn save_location(&self, location: &Location) -> Result<(), RepoError> {
        self.locations.insert(location.id, location.clone());
        Ok(())
    }

    async fn get_exit(&self, id: ExitId) -> Result<Option<Exit>, RepoError> {
        Ok(self.exits.get(&id).map(|e| e.clone()))
    }

    async fn save_exit(&self, exit: &Exit) -> Result<(), RepoError> {
        self.require_location(exit.location_id)?;
        self.require_location(exit.destination_id)?;
        self.exits.insert(exit.id, exit.clone());
        Ok(())
    }

    async fn list_exits_from(&self, location_id: LocationId) -> Result<Vec<Exit>, RepoError> {
        let mut exits: Vec<Exit> = self
            .exits
            .iter()
            .filter(|e| e.location_id == location_id)
            .map(|e| e.clone())
            .collect();
        exits.sort_by(|a, b| a.direction.cmp(&b.direction).then(a.id.cmp(&b.id)));
        Ok(exits)
    }

    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, RepoError> {
        Ok(self.items.get(&id).map(|i| i.clone()))
    }

    async fn save_item(&self, item: &Item) -> Result<(), RepoError> {
        let existing_owner = self.items.get(&item.id).map(|i| i.owner);
        if existing_owner != Some(item.owner) {
            containment::ensure_can_own(self, item.id, item.owner)?;
        }
        self.items.insert(item.id, item.clone());
        Ok(())
    }

    async fn list_items_owned_by(&self, owner: ItemOwner) -> Result<Vec<Item>, RepoError> {
        let mut items: Vec<Item> = self
            .items
            .iter()
            .filter(|i| i.owner == owner)
            .map(|i| i.clone())
            .collect();
        items.sort_by(|a, b| a.label.cmp(&b.label).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn transfer_item(
        &self,
        item_id: ItemId,
        expected_owner: ItemOwner,
        new_owner: ItemOwner,
    ) -> Result<(), RepoError> {
        // Walk the new owner's chain before taking the entry lock; the walk
        // reads other item entries.
        let placement = containment::resolve_placement(self, new_owner)?;
        self.require_location(placement.root)?;
        if placement.chain.contains(&ItemOwner::Item(item_id)) {
            return Err(RepoError::constraint(format!(
                "moving item {} into {} would create a containment cycle",
                item_id, new_owner
            )));
        }

        let mut item = self
            .items
            .get_mut(&item_id)
            .ok_or_else(|| RepoError::not_found("Item", item_id))?;
        if item.owner != expected_owner {
            return Err(RepoError::constraint(format!(
                "item {} is owned by {}, expected {}",
                item_id, item.owner, expected_owner
            )));
        }
        item.owner = new_owner;
        Ok(())
    }

    async fn get_template(
        &self,
        id: CreatureTemplateId,
    ) -> Result<Option<CreatureTemplate>, RepoError> {
        Ok(self.templates.get(&id).map(|t| t.clone()))
    }

    async fn save_template(&self, template: &CreatureTemplate) -> Result<(), RepoError> {
        self.templates.insert(template.id, template.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn room(repo: &InMemoryWorldRepo, label: &str) -> LocationId {
        let location = Location::new(label);
        let id = location.id;
        repo.save_location(&location).await.unwrap();
        id
    }

    #[tokio::test]
    async fn transfer_is_compare_and_set() {
        let repo = InMemoryWorldRepo::new();
        let hall = room(&repo, "Hall").await;
        let mira = Actor::new("Mira", hall);
        let tom = Actor::new("Tom", hall);
        repo.save_actor(&mira).await.unwrap();
        repo.save_actor(&tom).await.unwrap();
        let coin = Item::new("coin", ItemOwner::Location(hall));
        repo.save_item(&coin).await.unwrap();

        repo.transfer_item(coin.id, ItemOwner::Location(hall), ItemOwner::Actor(mira.id))
            .await
            .unwrap();
        let second = repo
            .transfer_item(coin.id, ItemOwner::Location(hall), ItemOwner::Actor(tom.id))
            .await;

        assert!(second.unwrap_err().is_constraint_violation());
        let stored = repo.get_item(coin.id).await.unwrap().unwrap();
        assert_eq!(stored.owner, ItemOwner::Actor(mira.id));
    }

    #[tokio::test]
    async fn transfer_into_own_content_is_rejected() {
        let repo = InMemoryWorldRepo::new();
        let hall = room(&repo, "Hall").await;
        let chest = Item::new("chest", ItemOwner::Location(hall)).with_capacity(10);
        let pouch = Item::new("pouch", ItemOwner::Item(chest.id)).with_capacity(2);
        repo.save_item(&chest).await.unwrap();
        repo.save_item(&pouch).await.unwrap();

        let result = repo
            .transfer_item(chest.id, ItemOwner::Location(hall), ItemOwner::Item(pouch.id))
            .await;

        assert!(result.unwrap_err().is_constraint_violation());
    }

    #[tokio::test]
    async fn move_actor_checks_expected_location() {
        let repo = InMemoryWorldRepo::new();
        let hall = room(&repo, "Hall").await;
        let cellar = room(&repo, "Cellar").await;
        let mira = Actor::new("Mira", hall);
        repo.save_actor(&mira).await.unwrap();

        assert!(repo
            .move_actor(mira.id, cellar, hall)
            .await
            .unwrap_err()
            .is_constraint_violation());
        repo.move_actor(mira.id, hall, cellar).await.unwrap();

        let in_cellar = repo.list_actors_in_location(cellar).await.unwrap();
        assert_eq!(in_cellar.len(), 1);
        assert!(repo.list_actors_in_location(hall).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn only_living_activated_autonomous_actors_are_listed() {
        let repo = InMemoryWorldRepo::new();
        let hall = room(&repo, "Hall").await;
        let rat = Actor::new("Rat", hall).autonomous();
        let mut dead = Actor::new("Dead Rat", hall).autonomous();
        dead.health = 0;
        let mut dormant = Actor::new("Dormant Rat", hall).autonomous();
        dormant.activated = false;
        let player = Actor::new("Mira", hall);
        for actor in [&rat, &dead, &dormant, &player] {
            repo.save_actor(actor).await.unwrap();
        }

        let active = repo.list_active_autonomous_actors().await.unwrap();

        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, rat.id);
    }
}

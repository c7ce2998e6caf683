//! Repository port traits for world-graph and event-log access.

use async_trait::async_trait;
use imagind_domain::{
    Actor, ActorId, CreatureTemplate, CreatureTemplateId, Exit, ExitId, GameEvent, Item, ItemId,
    ItemOwner, Location, LocationId,
};

use super::error::RepoError;

// =============================================================================
// World Graph
// =============================================================================

/// Entity storage plus the relationship traversals the engine needs.
///
/// Every traversal is an explicit call; nothing here loads relations lazily.
/// `transfer_item` and `move_actor` are compare-and-set: they fail with
/// [`RepoError::ConstraintViolation`] when the stored owner or location no
/// longer matches the expected one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorldRepo: Send + Sync {
    // Actors
    async fn get_actor(&self, id: ActorId) -> Result<Option<Actor>, RepoError>;
    async fn save_actor(&self, actor: &Actor) -> Result<(), RepoError>;
    async fn list_actors_in_location(
        &self,
        location_id: LocationId,
    ) -> Result<Vec<Actor>, RepoError>;
    /// Autonomous, activated, and alive.
    async fn list_active_autonomous_actors(&self) -> Result<Vec<Actor>, RepoError>;
    async fn move_actor(
        &self,
        actor_id: ActorId,
        expected_location: LocationId,
        destination: LocationId,
    ) -> Result<(), RepoError>;

    // Locations
    async fn get_location(&self, id: LocationId) -> Result<Option<Location>, RepoError>;
    async fn save_location(&self, location: &Location) -> Result<(), RepoError>;

    // Exits
    async fn get_exit(&self, id: ExitId) -> Result<Option<Exit>, RepoError>;
    async fn save_exit(&self, exit: &Exit) -> Result<(), RepoError>;
    async fn list_exits_from(&self, location_id: LocationId) -> Result<Vec<Exit>, RepoError>;

    // Items
    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, RepoError>;
    async fn save_item(&self, item: &Item) -> Result<(), RepoError>;
    async fn list_items_owned_by(&self, owner: ItemOwner) -> Result<Vec<Item>, RepoError>;
    /// Walk the owner chain of an item up to its root location.
    async fn transfer_item(
        &self,
        item_id: ItemId,
        expected_owner: ItemOwner,
        new_owner: ItemOwner,
    ) -> Result<(), RepoError>;

    // Creature templates
    async fn get_template(
        &self,
        id: CreatureTemplateId,
    ) -> Result<Option<CreatureTemplate>, RepoError>;
    async fn save_template(&self, template: &CreatureTemplate) -> Result<(), RepoError>;
}

// =============================================================================
// Event Log
// =============================================================================

/// Append-only event storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventLogRepo: Send + Sync {
    async fn append(&self, events: &[GameEvent]) -> Result<(), RepoError>;

    /// The `limit` most recent events `observer` witnessed, oldest first.
    async fn recent_for_observer(
        &self,
        observer: ActorId,
        limit: usize,
    ) -> Result<Vec<GameEvent>, RepoError>;
}

//! Small world shared by the use-case tests.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use imagind_domain::{
    Actor, CommandInvocation, CommandKind, Exit, Item, ItemOwner, Location,
};
use serde_json::Value;

use crate::infrastructure::clock::SteppingClock;
use crate::infrastructure::locks::LocationLocks;
use crate::infrastructure::ports::{IntentResolverPort, WorldRepo};
use crate::infrastructure::world_store::InMemoryWorldRepo;
use crate::use_cases::referee::Referee;

/// Hall --north--> Garden, with Mira (a player) and Tom (idle) in the hall.
pub struct TestWorld {
    pub world: Arc<InMemoryWorldRepo>,
    pub hall: Location,
    pub garden: Location,
    pub north: Exit,
    pub mira: Actor,
    pub tom: Actor,
}

impl TestWorld {
    pub async fn new() -> Self {
        let world = Arc::new(InMemoryWorldRepo::new());
        let hall = Location::new("Hall").with_description("A hall.", "A long, echoing hall.");
        let garden =
            Location::new("Garden").with_description("A garden.", "A garden full of roses.");
        world.save_location(&hall).await.unwrap();
        world.save_location(&garden).await.unwrap();

        let north = Exit::new("door", "north", hall.id, garden.id);
        world.save_exit(&north).await.unwrap();

        let mira = Actor::new("Mira", hall.id).with_combat_stats(10, 3, 0);
        let tom = Actor::new("Tom", hall.id);
        world.save_actor(&mira).await.unwrap();
        world.save_actor(&tom).await.unwrap();

        Self {
            world,
            hall,
            garden,
            north,
            mira,
            tom,
        }
    }

    pub async fn add_item(&self, item: Item) -> Item {
        self.world.save_item(&item).await.unwrap();
        item
    }

    pub fn floor(&self) -> ItemOwner {
        ItemOwner::Location(self.hall.id)
    }

    pub fn referee(&self, resolver: impl IntentResolverPort + 'static) -> Referee {
        Referee::new(
            self.world.clone(),
            Arc::new(resolver),
            Arc::new(LocationLocks::new()),
            Arc::new(SteppingClock::new(
                Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            )),
        )
    }
}

pub fn invocation(kind: CommandKind, arguments: Value) -> CommandInvocation {
    CommandInvocation::new(kind.as_str(), arguments)
}

//! Containment graph walks
//!
//! Items point at one owner: a location, an actor, or another item. Actors
//! point at their location. Every walk here is bounded by
//! [`MAX_CONTAINMENT_DEPTH`] so a corrupted graph yields an error instead of a
//! hang.

use crate::{ActorId, DomainError, ItemId, ItemOwner, LocationId};

/// Upper bound on owner hops between an item and its root location.
pub const MAX_CONTAINMENT_DEPTH: usize = 16;

/// Read access to the ownership edges of the world graph.
pub trait ContainmentGraph {
    fn owner_of_item(&self, item_id: ItemId) -> Option<ItemOwner>;
    fn location_of_actor(&self, actor_id: ActorId) -> Option<LocationId>;
}

/// Where an owner chain ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub root: LocationId,
    /// Owners visited on the way, nearest first; the root location is last.
    pub chain: Vec<ItemOwner>,
}

/// Follow owners from `start` until a location is reached.
pub fn resolve_placement<G: ContainmentGraph + ?Sized>(
    graph: &G,
    start: ItemOwner,
) -> Result<Placement, DomainError> {
    let mut chain = Vec::new();
    let mut current = start;
    let mut seen_items: Vec<ItemId> = Vec::new();

    for _ in 0..=MAX_CONTAINMENT_DEPTH {
        chain.push(current);
        match current {
            ItemOwner::Location(root) => return Ok(Placement { root, chain }),
            ItemOwner::Actor(actor_id) => {
                let location = graph
                    .location_of_actor(actor_id)
                    .ok_or_else(|| DomainError::not_found("Actor", actor_id.to_string()))?;
                current = ItemOwner::Location(location);
            }
            ItemOwner::Item(item_id) => {
                if seen_items.contains(&item_id) {
                    return Err(DomainError::containment_cycle(item_id));
                }
                seen_items.push(item_id);
                current = graph
                    .owner_of_item(item_id)
                    .ok_or_else(|| DomainError::not_found("Item", item_id.to_string()))?;
            }
        }
    }

    Err(DomainError::containment_too_deep(start, MAX_CONTAINMENT_DEPTH))
}

/// Check that giving `item_id` to `new_owner` keeps containment a tree.
///
/// Fails when the new owner is the item itself, sits inside the item, or when
/// its own chain does not terminate.
pub fn ensure_can_own<G: ContainmentGraph + ?Sized>(
    graph: &G,
    item_id: ItemId,
    new_owner: ItemOwner,
) -> Result<(), DomainError> {
    let placement = resolve_placement(graph, new_owner)?;
    if placement
        .chain
        .iter()
        .any(|owner| *owner == ItemOwner::Item(item_id))
    {
        return Err(DomainError::containment_cycle(item_id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Graph {
        items: HashMap<ItemId, ItemOwner>,
        actors: HashMap<ActorId, LocationId>,
    }

    impl ContainmentGraph for Graph {
        fn owner_of_item(&self, item_id: ItemId) -> Option<ItemOwner> {
            self.items.get(&item_id).copied()
        }

        fn location_of_actor(&self, actor_id: ActorId) -> Option<LocationId> {
            self.actors.get(&actor_id).copied()
        }
    }

    #[test]
    fn item_in_bag_carried_by_actor_roots_at_actor_location() {
        let mut graph = Graph::default();
        let room = LocationId::new();
        let actor = ActorId::new();
        let bag = ItemId::new();
        let coin = ItemId::new();
        graph.actors.insert(actor, room);
        graph.items.insert(bag, ItemOwner::Actor(actor));
        graph.items.insert(coin, ItemOwner::Item(bag));

        let placement = resolve_placement(&graph, ItemOwner::Item(bag)).unwrap();
        assert_eq!(placement.root, room);
        assert_eq!(
            placement.chain,
            vec![
                ItemOwner::Item(bag),
                ItemOwner::Actor(actor),
                ItemOwner::Location(room)
            ]
        );
        let coin_placement = resolve_placement(&graph, graph.items[&coin]).unwrap();
        assert_eq!(coin_placement.root, room);
    }

    #[test]
    fn cycle_is_detected_instead_of_looping() {
        let mut graph = Graph::default();
        let a = ItemId::new();
        let b = ItemId::new();
        graph.items.insert(a, ItemOwner::Item(b));
        graph.items.insert(b, ItemOwner::Item(a));

        let err = resolve_placement(&graph, ItemOwner::Item(a)).unwrap_err();
        assert!(matches!(err, DomainError::ContainmentCycle(_)));
    }

    #[test]
    fn long_chain_stops_at_depth_limit() {
        let mut graph = Graph::default();
        let ids: Vec<ItemId> = (0..=MAX_CONTAINMENT_DEPTH + 1).map(|_| ItemId::new()).collect();
        for pair in ids.windows(2) {
            graph.items.insert(pair[0], ItemOwner::Item(pair[1]));
        }
        let last = *ids.last().unwrap();
        graph.items.insert(last, ItemOwner::Location(LocationId::new()));

        let err = resolve_placement(&graph, ItemOwner::Item(ids[0])).unwrap_err();
        assert!(matches!(err, DomainError::ContainmentTooDeep { .. }));
    }

    #[test]
    fn putting_a_box_inside_its_own_content_is_rejected() {
        let mut graph = Graph::default();
        let room = LocationId::new();
        let chest = ItemId::new();
        let pouch = ItemId::new();
        graph.items.insert(chest, ItemOwner::Location(room));
        graph.items.insert(pouch, ItemOwner::Item(chest));

        assert!(ensure_can_own(&graph, chest, ItemOwner::Item(pouch)).is_err());
        assert!(ensure_can_own(&graph, chest, ItemOwner::Item(chest)).is_err());
        assert!(ensure_can_own(&graph, pouch, ItemOwner::Location(room)).is_ok());
    }
}

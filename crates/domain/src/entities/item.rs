//! Item entity - objects that can be carried, dropped, or put inside each other
//!
//! Ownership is a single edge from the item to its owner. Following those edges
//! always ends at a location; see [`crate::containment`] for the walk.

use serde::{Deserialize, Serialize};

use crate::{ActorId, ItemId, LocationId};

/// The single owner of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ItemOwner {
    Location(LocationId),
    Actor(ActorId),
    Item(ItemId),
}

impl ItemOwner {
    pub fn as_location(&self) -> Option<LocationId> {
        match self {
            Self::Location(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_actor(&self) -> Option<ActorId> {
        match self {
            Self::Actor(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_item(&self) -> Option<ItemId> {
        match self {
            Self::Item(id) => Some(*id),
            _ => None,
        }
    }
}

impl std::fmt::Display for ItemOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Location(id) => write!(f, "location:{}", id),
            Self::Actor(id) => write!(f, "actor:{}", id),
            Self::Item(id) => write!(f, "item:{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub label: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Total weight this item can hold; zero means it is not a container
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub hidden: bool,
    pub owner: ItemOwner,
}

fn default_weight() -> u32 {
    1
}

impl Item {
    pub fn new(label: impl Into<String>, owner: ItemOwner) -> Self {
        Self {
            id: ItemId::new(),
            label: label.into(),
            short_description: String::new(),
            long_description: String::new(),
            weight: default_weight(),
            capacity: 0,
            hidden: false,
            owner,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.short_description = description.clone();
        self.long_description = description;
        self
    }

    pub fn is_container(&self) -> bool {
        self.capacity > 0
    }

    /// Label with its indefinite article, e.g. "an apple".
    pub fn with_article(&self) -> String {
        format!("{} {}", indefinite_article(&self.label), self.label)
    }
}

/// "a" or "an" for the given noun, by its first letter.
pub fn indefinite_article(noun: &str) -> &'static str {
    match noun.trim_start().chars().next() {
        Some(c) if "aeiouAEIOU".contains(c) => "an",
        _ => "a",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn articles_follow_first_letter() {
        let loc = ItemOwner::Location(LocationId::new());
        assert_eq!(Item::new("apple", loc).with_article(), "an apple");
        assert_eq!(Item::new("sword", loc).with_article(), "a sword");
    }

    #[test]
    fn owner_serializes_with_kind_tag() {
        let actor = ActorId::new();
        let json = serde_json::to_value(ItemOwner::Actor(actor)).unwrap();
        assert_eq!(json["kind"], "actor");
        assert_eq!(json["id"], actor.to_string());
        let back: ItemOwner = serde_json::from_value(json).unwrap();
        assert_eq!(back, ItemOwner::Actor(actor));
    }
}

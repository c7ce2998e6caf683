//! Location entity - the roots of the containment graph

use serde::{Deserialize, Serialize};

use crate::{CreatureTemplateId, LocationId};

/// A place actors can stand in.
///
/// Exits, items, and actors present are relationships answered by the world
/// store; the location itself only carries what nothing else points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub label: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    /// Creature templates that may be spawned here
    #[serde(default)]
    pub template_ids: Vec<CreatureTemplateId>,
}

impl Location {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: LocationId::new(),
            label: label.into(),
            short_description: String::new(),
            long_description: String::new(),
            template_ids: Vec::new(),
        }
    }

    pub fn with_description(mut self, short: impl Into<String>, long: impl Into<String>) -> Self {
        self.short_description = short.into();
        self.long_description = long.into();
        self
    }

    pub fn allows_template(&self, template_id: CreatureTemplateId) -> bool {
        self.template_ids.contains(&template_id)
    }
}

//! Exit entity - one-way passage from a source location to a destination

use serde::{Deserialize, Serialize};

use crate::{ExitId, LocationId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exit {
    pub id: ExitId,
    /// Name of the passage itself ("oak door", "narrow stair")
    pub label: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    pub direction: String,
    /// Source location
    pub location_id: LocationId,
    pub destination_id: LocationId,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub notes: String,
}

impl Exit {
    pub fn new(
        label: impl Into<String>,
        direction: impl Into<String>,
        location_id: LocationId,
        destination_id: LocationId,
    ) -> Self {
        Self {
            id: ExitId::new(),
            label: label.into(),
            short_description: String::new(),
            long_description: String::new(),
            direction: direction.into(),
            location_id,
            destination_id,
            locked: false,
            hidden: false,
            notes: String::new(),
        }
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.short_description = description.clone();
        self.long_description = description;
        self
    }

    /// Whether an actor may walk through right now.
    pub fn is_passable(&self) -> bool {
        !self.locked && !self.hidden
    }
}

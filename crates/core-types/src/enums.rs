use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two catalog entities that own shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Venue,
    Artist,
}

impl EntityKind {
    /// Returns the entity on the other end of a show.
    pub fn counterpart(&self) -> Self {
        match self {
            EntityKind::Venue => EntityKind::Artist,
            EntityKind::Artist => EntityKind::Venue,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Venue => "venue",
            EntityKind::Artist => "artist",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "venue" | "venues" => Ok(EntityKind::Venue),
            "artist" | "artists" => Ok(EntityKind::Artist),
            other => Err(CoreError::UnknownKind(other.to_string())),
        }
    }
}

//! Core type definitions shared across the workspace
//!
//! This module contains the identifier types and small enums used by the
//! dock tree, the master panel and the workspace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a panel living in the workspace.
///
/// A panel keeps its ID for its whole lifetime, even as it moves between
/// the dock tree and the master panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PanelId(pub Uuid);

impl PanelId {
    /// Creates a new random panel ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a panel ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Name of the host slot the panel's viewer is mounted into.
    #[must_use]
    pub fn slot_name(&self) -> String {
        format!("vd-slot-{}", self.0.simple())
    }
}

impl Default for PanelId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Panel({})", self.0)
    }
}

/// Identifier of one event listener registered on a viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({})", self.0)
    }
}

/// Orientation of a split container.
///
/// Horizontal splits lay children out left to right, vertical splits top
/// to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Children arranged left to right.
    Horizontal,
    /// Children arranged top to bottom.
    Vertical,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "horizontal"),
            Self::Vertical => write!(f, "vertical"),
        }
    }
}

/// Which side of the workspace the master panel is mounted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Master panel first, dock second.
    #[default]
    Left,
    /// Dock first, master panel second.
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(format!("unknown side: {other}")),
        }
    }
}

/// Role of a panel, which is also its container membership.
///
/// Master panels live in the master panel and broadcast their selections;
/// detail panels live in the dock tree and receive filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelRole {
    /// Broadcasts filter selections.
    Master,
    /// Receives propagated filters.
    #[default]
    Detail,
}

impl PanelRole {
    /// Returns the role for a `master` flag.
    #[must_use]
    pub const fn from_master(master: bool) -> Self {
        if master { Self::Master } else { Self::Detail }
    }

    /// Returns true for [`PanelRole::Master`].
    #[must_use]
    pub const fn is_master(self) -> bool {
        matches!(self, Self::Master)
    }
}

impl fmt::Display for PanelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Master => write!(f, "master"),
            Self::Detail => write!(f, "detail"),
        }
    }
}

/// A region of the top-level workspace split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// The vertical master panel.
    Master,
    /// The dock tree holding detail panels.
    Detail,
}

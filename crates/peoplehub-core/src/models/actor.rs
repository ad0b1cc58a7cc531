//! Actors and roles.
//!
//! The role attached to an [`Actor`] is the only authorization input the
//! assistant pipeline consults. Actors are always loaded from the `profiles`
//! table; nothing the model writes can change them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DomainError;

/// Dashboard role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular staff member.
    Employee,
    /// Team manager; reviews leave and publishes announcements.
    Manager,
    /// Human resources; full access including payroll.
    Hr,
}

impl Role {
    /// All roles, lowest privilege first.
    pub const ALL: [Role; 3] = [Role::Employee, Role::Manager, Role::Hr];

    /// Returns the lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Manager => "manager",
            Self::Hr => "hr",
        }
    }

    /// Managers and HR may act on other people's records.
    pub fn is_privileged(self) -> bool {
        matches!(self, Self::Manager | Self::Hr)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "employee" => Ok(Self::Employee),
            "manager" => Ok(Self::Manager),
            "hr" => Ok(Self::Hr),
            other => Err(DomainError::invalid("role", other)),
        }
    }
}

/// The authenticated caller of an assistant turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Profile ID.
    pub id: String,
    /// Role resolved from storage.
    pub role: Role,
}

impl Actor {
    /// Creates an actor.
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self { id: id.into(), role }
    }
}

/// A row of the `profiles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique identifier (also the actor ID).
    pub id: String,
    /// Display name.
    pub full_name: String,
    /// Work email.
    pub email: String,
    /// Dashboard role.
    pub role: Role,
    /// Department name, if any.
    pub department: Option<String>,
}

impl Profile {
    /// The actor this profile authenticates as.
    pub fn actor(&self) -> Actor {
        Actor::new(self.id.clone(), self.role)
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Logical OVN database held by a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Northbound,
    Southbound,
}

/// Static, role-indexed facts about a database.
#[derive(Debug)]
pub struct RoleSpec {
    /// Short tag used in container names and helper aliases ("nb"/"sb")
    pub tag: &'static str,
    /// Schema name as written in the first record of the database file
    pub schema_name: &'static str,
    /// Table holding the single global configuration row
    pub global_table: &'static str,
    /// Control utility for this database
    pub ctl: &'static str,
}

const NORTHBOUND: RoleSpec = RoleSpec {
    tag: "nb",
    schema_name: "OVN_Northbound",
    global_table: "NB_Global",
    ctl: "ovn-nbctl",
};

const SOUTHBOUND: RoleSpec = RoleSpec {
    tag: "sb",
    schema_name: "OVN_Southbound",
    global_table: "SB_Global",
    ctl: "ovn-sbctl",
};

impl Role {
    pub const ALL: [Role; 2] = [Role::Northbound, Role::Southbound];

    pub fn spec(self) -> &'static RoleSpec {
        match self {
            Role::Northbound => &NORTHBOUND,
            Role::Southbound => &SOUTHBOUND,
        }
    }

    pub fn tag(self) -> &'static str {
        self.spec().tag
    }

    pub fn from_schema_name(name: &str) -> Option<Role> {
        Role::ALL
            .into_iter()
            .find(|role| role.spec().schema_name == name)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Northbound => write!(f, "northbound"),
            Role::Southbound => write!(f, "southbound"),
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "n" | "nb" | "north" | "northbound" => Ok(Role::Northbound),
            "s" | "sb" | "south" | "southbound" => Ok(Role::Southbound),
            _ => Err(Error::InvalidRole(s.to_string())),
        }
    }
}

/// Which roles to keep during discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleFilter {
    Northbound,
    Southbound,
    #[default]
    All,
}

impl RoleFilter {
    pub fn matches(self, role: Role) -> bool {
        match self {
            RoleFilter::Northbound => role == Role::Northbound,
            RoleFilter::Southbound => role == Role::Southbound,
            RoleFilter::All => true,
        }
    }
}

impl From<Role> for RoleFilter {
    fn from(role: Role) -> Self {
        match role {
            Role::Northbound => RoleFilter::Northbound,
            Role::Southbound => RoleFilter::Southbound,
        }
    }
}

impl fmt::Display for RoleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleFilter::Northbound => write!(f, "northbound"),
            RoleFilter::Southbound => write!(f, "southbound"),
            RoleFilter::All => write!(f, "all"),
        }
    }
}

impl FromStr for RoleFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" | "both" | "a" => Ok(RoleFilter::All),
            other => other
                .parse::<Role>()
                .map(RoleFilter::from)
                .map_err(|_| Error::InvalidFilter(s.to_string())),
        }
    }
}

/// On-disk storage format of an OVSDB file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    Standalone,
    Clustered,
}

impl fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageFormat::Standalone => write!(f, "standalone"),
            StorageFormat::Clustered => write!(f, "clustered"),
        }
    }
}

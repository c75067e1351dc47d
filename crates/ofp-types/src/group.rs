//! Group table enumerations.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Group identifier, unique per switch.
pub type GroupId = u32;

/// OpenFlow group type (`ofp_group_type`).
///
/// The type decides how the switch uses the buckets:
/// every bucket (All), one selected bucket (Select), the single bucket
/// (Indirect) or the first live bucket (FastFailover).
///
/// # Examples
///
/// ```
/// use ofp_types::GroupType;
///
/// let gt: GroupType = "select".parse().unwrap();
/// assert_eq!(gt, GroupType::Select);
/// assert_eq!(gt.wire_code(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupType {
    /// Multicast: execute all buckets.
    #[default]
    All,
    /// Execute one bucket chosen by the switch.
    Select,
    /// Execute the one defined bucket.
    Indirect,
    /// Execute the first live bucket.
    FastFailover,
}

impl GroupType {
    /// Returns the `OFPGT_*` code carried in the group mod.
    pub const fn wire_code(&self) -> u8 {
        match self {
            GroupType::All => 0,
            GroupType::Select => 1,
            GroupType::Indirect => 2,
            GroupType::FastFailover => 3,
        }
    }

    /// Creates a group type from its `OFPGT_*` code.
    pub fn from_wire_code(code: u8) -> Result<Self, ParseError> {
        match code {
            0 => Ok(GroupType::All),
            1 => Ok(GroupType::Select),
            2 => Ok(GroupType::Indirect),
            3 => Ok(GroupType::FastFailover),
            other => Err(ParseError::UnknownGroupTypeCode(other)),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            GroupType::All => "all",
            GroupType::Select => "select",
            GroupType::Indirect => "indirect",
            GroupType::FastFailover => "fast_failover",
        }
    }
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GroupType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(GroupType::All),
            "select" => Ok(GroupType::Select),
            "indirect" => Ok(GroupType::Indirect),
            "fast_failover" | "ff" => Ok(GroupType::FastFailover),
            _ => Err(ParseError::InvalidGroupType(s.to_string())),
        }
    }
}

/// OpenFlow group mod command (`ofp_group_mod_command`).
///
/// Code 4 is unassigned in OpenFlow 1.5, so `RemoveBucket` is 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupCommand {
    Add,
    Modify,
    Delete,
    InsertBucket,
    RemoveBucket,
}

impl GroupCommand {
    /// Returns the `OFPGC_*` code carried in the group mod.
    pub const fn wire_code(&self) -> u16 {
        match self {
            GroupCommand::Add => 0,
            GroupCommand::Modify => 1,
            GroupCommand::Delete => 2,
            GroupCommand::InsertBucket => 3,
            GroupCommand::RemoveBucket => 5,
        }
    }

    pub fn from_wire_code(code: u16) -> Result<Self, ParseError> {
        match code {
            0 => Ok(GroupCommand::Add),
            1 => Ok(GroupCommand::Modify),
            2 => Ok(GroupCommand::Delete),
            3 => Ok(GroupCommand::InsertBucket),
            5 => Ok(GroupCommand::RemoveBucket),
            other => Err(ParseError::UnknownGroupCommandCode(other)),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            GroupCommand::Add => "add",
            GroupCommand::Modify => "modify",
            GroupCommand::Delete => "delete",
            GroupCommand::InsertBucket => "insert_bucket",
            GroupCommand::RemoveBucket => "remove_bucket",
        }
    }

    /// Returns true when the message's bucket list replaces the group's
    /// buckets on the switch, rather than editing them in place.
    pub const fn replaces_buckets(&self) -> bool {
        matches!(self, GroupCommand::Add | GroupCommand::Modify)
    }
}

impl fmt::Display for GroupCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GroupCommand {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "add" => Ok(GroupCommand::Add),
            "modify" | "mod" => Ok(GroupCommand::Modify),
            "delete" | "del" => Ok(GroupCommand::Delete),
            "insert_bucket" => Ok(GroupCommand::InsertBucket),
            "remove_bucket" => Ok(GroupCommand::RemoveBucket),
            _ => Err(ParseError::InvalidGroupCommand(s.to_string())),
        }
    }
}

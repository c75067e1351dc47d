//! Install state of a group entry and its transitions.

use ofp_types::GroupCommand;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a group stands relative to the switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallState {
    /// Not present on the switch.
    #[default]
    Uninstalled,
    /// Present on the switch with the entry's buckets.
    Installed,
    /// Deleted and deregistered; the entry must not be used again.
    Deleted,
}

impl InstallState {
    /// Command that pushes the full bucket list from this state.
    ///
    /// Returns `None` for a deleted entry.
    pub fn install_command(self) -> Option<GroupCommand> {
        match self {
            InstallState::Uninstalled => Some(GroupCommand::Add),
            InstallState::Installed => Some(GroupCommand::Modify),
            InstallState::Deleted => None,
        }
    }

    /// Whether a bucket change must be pushed to the switch right away.
    pub fn needs_resync(self) -> bool {
        self == InstallState::Installed
    }

    /// State after the switch accepted `command`.
    ///
    /// Bucket insert/remove only edit an installed group, so they keep
    /// the state as is.
    pub fn after(self, command: GroupCommand) -> InstallState {
        match (self, command) {
            (InstallState::Deleted, _) => InstallState::Deleted,
            (_, GroupCommand::Add | GroupCommand::Modify) => InstallState::Installed,
            (_, GroupCommand::Delete) => InstallState::Uninstalled,
            (state, GroupCommand::InsertBucket | GroupCommand::RemoveBucket) => state,
        }
    }

    pub fn is_installed(self) -> bool {
        self == InstallState::Installed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InstallState::Uninstalled => "uninstalled",
            InstallState::Installed => "installed",
            InstallState::Deleted => "deleted",
        }
    }
}

impl fmt::Display for InstallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Collaborator interfaces toward the switch session.

use ofp_types::{GroupId, GroupMod};

/// Switch-side services a group entry relies on.
///
/// Calls block until the session has an answer; errors carry the session's
/// own description and are wrapped by the caller.
pub trait GroupSwitch: Send + Sync {
    /// Transmits one group mod.
    fn send(&self, message: &GroupMod) -> Result<(), String>;

    /// Drops `group_id` from the switch's group registry.
    fn delete_group(&self, group_id: GroupId) -> Result<(), String>;
}

/// Raw transport toward one switch, used by [`GroupTable`](super::GroupTable).
pub trait MessageSender: Send + Sync {
    fn send(&self, message: &GroupMod) -> Result<(), String>;
}

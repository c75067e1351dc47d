//! Group mods staged for an atomic bundle.

use ofp_types::{GroupCommand, GroupId, GroupMod};

/// A built group mod waiting to be added to a bundle.
///
/// The bundle transport assigns transaction ids when it orders the batch,
/// so the envelope lets it rewrite the xid before taking the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBundleMessage {
    message: GroupMod,
}

impl GroupBundleMessage {
    pub fn new(message: GroupMod) -> Self {
        Self { message }
    }

    /// Rewrites the transaction id and returns the updated message.
    pub fn reset_xid(&mut self, xid: u32) -> &GroupMod {
        self.message.set_xid(xid);
        &self.message
    }

    pub fn xid(&self) -> u32 {
        self.message.xid()
    }

    pub fn message(&self) -> &GroupMod {
        &self.message
    }

    pub fn into_message(self) -> GroupMod {
        self.message
    }

    pub fn group_id(&self) -> GroupId {
        self.message.group_id
    }

    pub fn command(&self) -> GroupCommand {
        self.message.command
    }
}

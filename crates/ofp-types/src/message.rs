//! OpenFlow message header and the group mod message.

use crate::bucket::{Bucket, BucketId};
use crate::group::{GroupCommand, GroupId, GroupType};
use crate::{OFP15_VERSION, OFPG_BUCKET_ALL};
use serde::{Deserialize, Serialize};

/// OpenFlow message type codes used by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    GroupMod,
}

impl MessageType {
    /// Returns the `OFPT_*` code.
    pub const fn wire_code(&self) -> u8 {
        match self {
            MessageType::GroupMod => 15,
        }
    }
}

/// Common OpenFlow header fields. The length is filled in by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfpHeader {
    pub version: u8,
    pub message_type: MessageType,
    pub xid: u32,
}

impl OfpHeader {
    pub fn new(message_type: MessageType) -> Self {
        Self {
            version: OFP15_VERSION,
            message_type,
            xid: 0,
        }
    }
}

/// `OFPT_GROUP_MOD` message.
///
/// `command_bucket_id` is `None` unless the command is an insert or
/// remove bucket request; see [`GroupMod::wire_command_bucket_id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMod {
    pub header: OfpHeader,
    pub command: GroupCommand,
    pub group_type: GroupType,
    pub group_id: GroupId,
    pub command_bucket_id: Option<BucketId>,
    pub buckets: Vec<Bucket>,
}

impl GroupMod {
    /// Creates an ADD for group 0 of type ALL with no buckets.
    pub fn new() -> Self {
        Self {
            header: OfpHeader::new(MessageType::GroupMod),
            command: GroupCommand::Add,
            group_type: GroupType::All,
            group_id: 0,
            command_bucket_id: None,
            buckets: Vec::new(),
        }
    }

    pub fn add_bucket(&mut self, bucket: Bucket) {
        self.buckets.push(bucket);
    }

    pub fn xid(&self) -> u32 {
        self.header.xid
    }

    pub fn set_xid(&mut self, xid: u32) {
        self.header.xid = xid;
    }

    pub fn bucket_ids(&self) -> Vec<BucketId> {
        self.buckets.iter().map(|b| b.bucket_id).collect()
    }

    /// Value of the command bucket id field on the wire; unset is `OFPG_BUCKET_ALL`.
    pub fn wire_command_bucket_id(&self) -> BucketId {
        self.command_bucket_id.unwrap_or(OFPG_BUCKET_ALL)
    }
}

impl Default for GroupMod {
    fn default() -> Self {
        Self::new()
    }
}

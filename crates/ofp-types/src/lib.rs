//! OpenFlow 1.5 message model for group table control.
//!
//! This crate provides the in-memory representation of the OpenFlow
//! structures the group controller builds and hands to a switch session:
//!
//! - [`GroupType`] and [`GroupCommand`]: group table enumerations with their wire codes
//! - [`Bucket`] and [`BucketProperty`]: one alternative action list within a group
//! - [`Action`] and [`Instruction`]: forwarding actions and the instructions wrapping them
//! - [`GroupMod`]: the `OFPT_GROUP_MOD` message itself
//!
//! Byte-level encoding belongs to the session layer and is not part of this crate.

mod action;
mod bucket;
mod group;
mod message;

pub use action::{Action, ActionType, Instruction, SetField, OFPCML_NO_BUFFER, OFPP_CONTROLLER};
pub use bucket::{Bucket, BucketId, BucketProperty};
pub use group::{GroupCommand, GroupId, GroupType};
pub use message::{GroupMod, MessageType, OfpHeader};

/// OpenFlow protocol version byte for 1.5.
pub const OFP15_VERSION: u8 = 0x06;

/// Last usable group number.
pub const OFPG_MAX: GroupId = 0xffff_ff00;
/// Reserved group id representing all groups (group delete only).
pub const OFPG_ALL: GroupId = 0xffff_fffc;
/// Reserved wildcard group id.
pub const OFPG_ANY: GroupId = 0xffff_ffff;

/// Last usable bucket id.
pub const OFPG_BUCKET_MAX: BucketId = 0xffff_ff00;
/// Command bucket id meaning "the last bucket in the group".
pub const OFPG_BUCKET_LAST: BucketId = 0xffff_fffe;
/// Command bucket id meaning "all buckets in the group".
pub const OFPG_BUCKET_ALL: BucketId = 0xffff_ffff;

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid group type: {0}")]
    InvalidGroupType(String),

    #[error("invalid group command: {0}")]
    InvalidGroupCommand(String),

    #[error("unknown group type code: {0}")]
    UnknownGroupTypeCode(u8),

    #[error("unknown group command code: {0}")]
    UnknownGroupCommandCode(u16),
}

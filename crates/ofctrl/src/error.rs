//! Error types for group table operations.

use ofp_types::GroupId;
use thiserror::Error;

/// Error type for group operations.
///
/// Collaborator failures are carried unmodified in `reason`; nothing in
/// this crate retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    /// The switch session failed to send a group mod.
    #[error("failed to send group mod for group {group_id}: {reason}")]
    Transmission { group_id: GroupId, reason: String },

    /// The switch registry failed to drop the group.
    #[error("failed to deregister group {group_id}: {reason}")]
    Registry { group_id: GroupId, reason: String },

    #[error("group {0} already exists")]
    GroupExists(GroupId),

    #[error("invalid group id: {0:#x}")]
    InvalidGroupId(GroupId),

    /// A remove bucket command needs at least one held bucket to target.
    #[error("group {0} holds no bucket to remove")]
    NoBucketToRemove(GroupId),

    #[error("group {0} has been deleted")]
    Deleted(GroupId),
}

impl GroupError {
    pub fn transmission(group_id: GroupId, reason: impl Into<String>) -> Self {
        GroupError::Transmission {
            group_id,
            reason: reason.into(),
        }
    }

    pub fn registry(group_id: GroupId, reason: impl Into<String>) -> Self {
        GroupError::Registry {
            group_id,
            reason: reason.into(),
        }
    }

    /// Returns the group the error refers to.
    pub fn group_id(&self) -> GroupId {
        match self {
            GroupError::Transmission { group_id, .. } | GroupError::Registry { group_id, .. } => {
                *group_id
            }
            GroupError::GroupExists(id)
            | GroupError::InvalidGroupId(id)
            | GroupError::NoBucketToRemove(id)
            | GroupError::Deleted(id) => *id,
        }
    }

    /// Returns true if the switch session rejected the send.
    pub fn is_transmission(&self) -> bool {
        matches!(self, GroupError::Transmission { .. })
    }
}

/// Result type for group operations.
pub type GroupResult<T> = Result<T, GroupError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_transmission_display() {
        let err = GroupError::transmission(5, "connection reset");
        assert_eq!(
            err.to_string(),
            "failed to send group mod for group 5: connection reset"
        );
        assert!(err.is_transmission());
        assert_eq!(err.group_id(), 5);
    }

    #[test]
    fn test_registry_is_not_transmission() {
        let err = GroupError::registry(9, "unknown group");
        assert!(!err.is_transmission());
        assert_eq!(err.group_id(), 9);
    }

    #[test]
    fn test_invalid_group_id_hex() {
        let err = GroupError::InvalidGroupId(0xffff_fffc);
        assert_eq!(err.to_string(), "invalid group id: 0xfffffffc");
    }
}

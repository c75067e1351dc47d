//! Group mod construction.
//!
//! The rules below follow the OpenFlow 1.5 group table definition; a
//! switch rejects or misreads a group mod that breaks them.
//!
//! | Command | Buckets | command_bucket_id |
//! |---------|---------|-------------------|
//! | ADD, MODIFY | full list | unset |
//! | INSERT_BUCKET | held buckets | `OFPG_BUCKET_LAST` |
//! | REMOVE_BUCKET | none | id of the first held bucket |
//! | DELETE | none | unset |

use crate::error::{GroupError, GroupResult};
use ofp_types::{Bucket, GroupCommand, GroupId, GroupMod, GroupType, OFPG_BUCKET_LAST};

/// Builds the group mod for `command` from a group's current content.
///
/// # Errors
///
/// Returns [`GroupError::NoBucketToRemove`] for a remove bucket command
/// on an empty bucket list.
pub fn build_group_mod(
    group_id: GroupId,
    group_type: GroupType,
    buckets: &[Bucket],
    command: GroupCommand,
) -> GroupResult<GroupMod> {
    let (held, command_bucket_id) = match command {
        GroupCommand::Delete => return Ok(build_group_delete(group_id)),
        GroupCommand::RemoveBucket => {
            // The bucket list stays empty; the target travels in command_bucket_id.
            let first = buckets
                .first()
                .ok_or(GroupError::NoBucketToRemove(group_id))?;
            (Vec::new(), Some(first.bucket_id))
        }
        GroupCommand::Add | GroupCommand::Modify | GroupCommand::InsertBucket => {
            let bucket_id = (!command.replaces_buckets()).then_some(OFPG_BUCKET_LAST);
            (buckets.to_vec(), bucket_id)
        }
    };

    let mut group_mod = GroupMod::new();
    group_mod.group_id = group_id;
    group_mod.group_type = group_type;
    group_mod.command = command;
    group_mod.command_bucket_id = command_bucket_id;
    group_mod.buckets = held;
    Ok(group_mod)
}

/// Builds a delete for `group_id`. Type and buckets are left at their defaults.
pub fn build_group_delete(group_id: GroupId) -> GroupMod {
    let mut group_mod = GroupMod::new();
    group_mod.group_id = group_id;
    group_mod.command = GroupCommand::Delete;
    group_mod
}

#[cfg(test)]
mod tests {
    use super::*;
    use ofp_types::Action;
    use pretty_assertions::assert_eq;

    fn buckets(ids: &[u32]) -> Vec<Bucket> {
        ids.iter()
            .map(|&id| Bucket::new(id).with_action(Action::output(id + 10)))
            .collect()
    }

    #[test]
    fn test_add_carries_full_list() {
        let held = buckets(&[1, 2, 3]);
        let gm = build_group_mod(5, GroupType::Select, &held, GroupCommand::Add).unwrap();

        assert_eq!(gm.command, GroupCommand::Add);
        assert_eq!(gm.group_id, 5);
        assert_eq!(gm.group_type, GroupType::Select);
        assert_eq!(gm.buckets, held);
        assert_eq!(gm.command_bucket_id, None);
    }

    #[test]
    fn test_modify_carries_full_list() {
        let held = buckets(&[4, 2]);
        let gm = build_group_mod(8, GroupType::All, &held, GroupCommand::Modify).unwrap();

        assert_eq!(gm.command, GroupCommand::Modify);
        assert_eq!(gm.bucket_ids(), vec![4, 2]);
        assert_eq!(gm.command_bucket_id, None);
    }

    #[test]
    fn test_insert_bucket_appends_at_end() {
        for count in [0, 1, 4] {
            let ids: Vec<u32> = (1..=count).collect();
            let held = buckets(&ids);
            let gm =
                build_group_mod(3, GroupType::Indirect, &held, GroupCommand::InsertBucket).unwrap();

            assert_eq!(gm.command_bucket_id, Some(OFPG_BUCKET_LAST));
            assert_eq!(gm.buckets, held);
        }
    }

    #[test]
    fn test_remove_bucket_targets_first_and_clears_list() {
        let held = buckets(&[9, 1, 2]);
        let gm =
            build_group_mod(3, GroupType::FastFailover, &held, GroupCommand::RemoveBucket).unwrap();

        assert_eq!(gm.command, GroupCommand::RemoveBucket);
        assert_eq!(gm.command_bucket_id, Some(9));
        assert!(gm.buckets.is_empty());
        assert_eq!(gm.group_type, GroupType::FastFailover);
    }

    #[test]
    fn test_remove_bucket_without_buckets() {
        let err = build_group_mod(3, GroupType::Select, &[], GroupCommand::RemoveBucket).unwrap_err();
        assert_eq!(err, GroupError::NoBucketToRemove(3));
    }

    #[test]
    fn test_delete_ignores_buckets() {
        let held = buckets(&[1, 2]);
        let gm = build_group_mod(5, GroupType::Select, &held, GroupCommand::Delete).unwrap();

        assert_eq!(gm, build_group_delete(5));
        assert!(gm.buckets.is_empty());
        assert_eq!(gm.command_bucket_id, None);
        assert_eq!(gm.group_type, GroupType::All);
    }

    #[test]
    fn test_type_codes_follow_group_type() {
        for (gt, code) in [
            (GroupType::All, 0),
            (GroupType::Select, 1),
            (GroupType::Indirect, 2),
            (GroupType::FastFailover, 3),
        ] {
            let gm = build_group_mod(1, gt, &[], GroupCommand::Add).unwrap();
            assert_eq!(gm.group_type.wire_code(), code);
        }
    }
}

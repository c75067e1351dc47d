//! Group entry lifecycle.

use super::builder::{build_group_delete, build_group_mod};
use super::bundle::GroupBundleMessage;
use super::state::InstallState;
use super::switch::GroupSwitch;
use crate::audit::{AuditCategory, AuditOutcome, AuditRecord};
use crate::error::{GroupError, GroupResult};
use crate::target::FlowTarget;
use crate::{audit_log, debug_log};
use ofp_types::{Action, ActionType, Bucket, GroupCommand, GroupId, GroupMod, GroupType};
use std::fmt;
use std::sync::Arc;

const SOURCE: &str = "GroupEntry";

/// One group on one switch.
///
/// The entry decides which group mod to send from its [`InstallState`]:
/// the first install sends ADD, later installs and bucket changes on an
/// installed group send MODIFY with the complete bucket list.
///
/// Methods take `&mut self` and do no locking of their own; share an entry
/// across threads behind a `Mutex`.
pub struct GroupEntry {
    switch: Arc<dyn GroupSwitch>,
    id: GroupId,
    group_type: GroupType,
    buckets: Vec<Bucket>,
    state: InstallState,
}

impl GroupEntry {
    /// Creates an uninstalled entry with no buckets.
    pub fn new(id: GroupId, group_type: GroupType, switch: Arc<dyn GroupSwitch>) -> Self {
        Self {
            switch,
            id,
            group_type,
            buckets: Vec::new(),
            state: InstallState::Uninstalled,
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn group_type(&self) -> GroupType {
        self.group_type
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn state(&self) -> InstallState {
        self.state
    }

    pub fn is_installed(&self) -> bool {
        self.state.is_installed()
    }

    /// Appends buckets, keeping their order after the existing ones.
    ///
    /// An installed group is re-sent right away as a MODIFY carrying every
    /// bucket. A failed resend is returned; the local list keeps the new
    /// buckets either way.
    pub fn add_buckets<I>(&mut self, buckets: I) -> GroupResult<()>
    where
        I: IntoIterator<Item = Bucket>,
    {
        self.ensure_live()?;
        let before = self.buckets.len();
        self.buckets.extend(buckets);
        self.audit_buckets("add_buckets", self.buckets.len() - before);
        self.resync("add_buckets")
    }

    /// Replaces the bucket list, with the same resend rule as [`add_buckets`](Self::add_buckets).
    pub fn reset_buckets<I>(&mut self, buckets: I) -> GroupResult<()>
    where
        I: IntoIterator<Item = Bucket>,
    {
        self.ensure_live()?;
        self.buckets = buckets.into_iter().collect();
        self.audit_buckets("reset_buckets", self.buckets.len());
        self.resync("reset_buckets")
    }

    /// Sends ADD (first time) or MODIFY with the full bucket list.
    ///
    /// # Errors
    ///
    /// [`GroupError::Transmission`] if the switch send fails; the state is
    /// left unchanged. [`GroupError::Deleted`] after a completed delete.
    pub fn install(&mut self) -> GroupResult<()> {
        let command = self
            .state
            .install_command()
            .ok_or(GroupError::Deleted(self.id))?;
        let message = build_group_mod(self.id, self.group_type, &self.buckets, command)?;
        self.transmit(&message, "install")?;
        self.state = self.state.after(command);
        Ok(())
    }

    /// Removes the group from the switch and from the switch's registry.
    ///
    /// A DELETE is only sent when the group is installed. Deregistration
    /// always happens; if it fails the entry stays usable for a retry.
    pub fn delete(&mut self) -> GroupResult<()> {
        self.ensure_live()?;

        if self.state.is_installed() {
            let message = build_group_delete(self.id);
            self.transmit(&message, "delete")?;
            self.state = self.state.after(GroupCommand::Delete);
        }

        if let Err(e) = self.switch.delete_group(self.id) {
            let err = GroupError::registry(self.id, e);
            audit_log!(
                AuditRecord::new(AuditCategory::ResourceDelete, SOURCE, "delete")
                    .with_outcome(AuditOutcome::Failure)
                    .with_object_id(self.id.to_string())
                    .with_object_type("group")
                    .with_error(err.to_string())
            );
            return Err(err);
        }

        self.state = InstallState::Deleted;
        audit_log!(
            AuditRecord::new(AuditCategory::ResourceDelete, SOURCE, "delete")
                .with_outcome(AuditOutcome::Success)
                .with_object_id(self.id.to_string())
                .with_object_type("group")
        );
        Ok(())
    }

    /// Builds the group mod `command` would send, without sending it.
    pub fn group_mod(&self, command: GroupCommand) -> GroupResult<GroupMod> {
        build_group_mod(self.id, self.group_type, &self.buckets, command)
    }

    /// Builds a group mod for an externally committed bundle.
    ///
    /// The install state is not touched. Once the bundle commits, report the
    /// command back through [`confirm_bundled`](Self::confirm_bundled).
    pub fn bundle_message(&self, command: GroupCommand) -> GroupResult<GroupBundleMessage> {
        self.ensure_live()?;
        let message = self.group_mod(command)?;
        // Outcome stays InProgress until the caller confirms the commit.
        audit_log!(
            AuditRecord::new(AuditCategory::SwitchOperation, SOURCE, "bundle_message")
                .with_object_id(self.id.to_string())
                .with_object_type("group")
                .with_details(serde_json::json!({
                    "command": command.as_str(),
                    "bucket_ids": message.bucket_ids(),
                    "command_bucket_id": message.wire_command_bucket_id(),
                }))
        );
        Ok(GroupBundleMessage::new(message))
    }

    /// Applies the state transition of a committed bundled `command`.
    pub fn confirm_bundled(&mut self, command: GroupCommand) -> GroupResult<()> {
        self.ensure_live()?;
        let before = self.state;
        self.state = self.state.after(command);
        audit_log!(
            AuditRecord::new(AuditCategory::ResourceModify, SOURCE, "confirm_bundled")
                .with_outcome(AuditOutcome::Success)
                .with_object_id(self.id.to_string())
                .with_object_type("group")
                .with_details(serde_json::json!({
                    "command": command.as_str(),
                    "state_before": before.as_str(),
                    "state_after": self.state.as_str(),
                }))
        );
        Ok(())
    }

    fn ensure_live(&self) -> GroupResult<()> {
        if self.state == InstallState::Deleted {
            return Err(GroupError::Deleted(self.id));
        }
        Ok(())
    }

    fn audit_buckets(&self, action: &str, changed: usize) {
        let bucket_ids: Vec<_> = self.buckets.iter().map(|b| b.bucket_id).collect();
        audit_log!(
            AuditRecord::new(AuditCategory::ResourceModify, SOURCE, action)
                .with_outcome(AuditOutcome::Success)
                .with_object_id(self.id.to_string())
                .with_object_type("group")
                .with_details(serde_json::json!({
                    "changed": changed,
                    "bucket_ids": bucket_ids,
                    "state": self.state.as_str(),
                }))
        );
    }

    fn resync(&mut self, action: &str) -> GroupResult<()> {
        if !self.state.needs_resync() {
            return Ok(());
        }
        debug_log!(SOURCE, group_id = self.id, trigger = action, "Resyncing installed group");
        self.install()
    }

    fn transmit(&self, message: &GroupMod, action: &str) -> GroupResult<()> {
        let details = serde_json::json!({
            "command": message.command.as_str(),
            "group_type": self.group_type.as_str(),
            "bucket_ids": message.bucket_ids(),
            "command_bucket_id": message.wire_command_bucket_id(),
        });

        if let Err(e) = self.switch.send(message) {
            let err = GroupError::transmission(self.id, e);
            audit_log!(
                AuditRecord::new(AuditCategory::SwitchOperation, SOURCE, action)
                    .with_outcome(AuditOutcome::Failure)
                    .with_object_id(self.id.to_string())
                    .with_object_type("group")
                    .with_error(err.to_string())
                    .with_details(details)
            );
            return Err(err);
        }

        audit_log!(
            AuditRecord::new(AuditCategory::SwitchOperation, SOURCE, action)
                .with_outcome(AuditOutcome::Success)
                .with_object_id(self.id.to_string())
                .with_object_type("group")
                .with_details(details)
        );
        Ok(())
    }
}

impl FlowTarget for GroupEntry {
    fn type_name(&self) -> &'static str {
        "group"
    }

    fn action_type(&self) -> ActionType {
        ActionType::Group
    }

    fn action_message(&self) -> Action {
        Action::group(self.id)
    }
}

impl fmt::Debug for GroupEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupEntry")
            .field("id", &self.id)
            .field("group_type", &self.group_type)
            .field("buckets", &self.buckets)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::capture::AuditCapture;
    use ofp_types::{Instruction, OFPG_BUCKET_ALL, OFPG_BUCKET_LAST};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockSwitch {
        sent: Mutex<Vec<GroupMod>>,
        deregistered: Mutex<Vec<GroupId>>,
        fail_send: AtomicBool,
        fail_deregister: AtomicBool,
    }

    impl MockSwitch {
        fn sent(&self) -> Vec<GroupMod> {
            self.sent.lock().unwrap().clone()
        }

        fn deregistered(&self) -> Vec<GroupId> {
            self.deregistered.lock().unwrap().clone()
        }
    }

    impl GroupSwitch for MockSwitch {
        fn send(&self, message: &GroupMod) -> Result<(), String> {
            if self.fail_send.load(Ordering::SeqCst) {
                return Err("connection closed".to_string());
            }
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }

        fn delete_group(&self, group_id: GroupId) -> Result<(), String> {
            if self.fail_deregister.load(Ordering::SeqCst) {
                return Err("registry unavailable".to_string());
            }
            self.deregistered.lock().unwrap().push(group_id);
            Ok(())
        }
    }

    fn create_test_bucket(id: u32) -> Bucket {
        Bucket::new(id).with_action(Action::output(id))
    }

    fn create_test_entry(id: GroupId, group_type: GroupType) -> (GroupEntry, Arc<MockSwitch>) {
        let switch = Arc::new(MockSwitch::default());
        let entry = GroupEntry::new(id, group_type, switch.clone());
        (entry, switch)
    }

    // 1. Bucket list handling

    #[test]
    fn test_new_entry_is_empty_and_uninstalled() {
        let (entry, switch) = create_test_entry(1, GroupType::All);
        assert_eq!(entry.id(), 1);
        assert_eq!(entry.group_type(), GroupType::All);
        assert!(entry.buckets().is_empty());
        assert_eq!(entry.state(), InstallState::Uninstalled);
        assert!(switch.sent().is_empty());
    }

    #[test]
    fn test_add_buckets_concatenates_before_install() {
        let (mut entry, switch) = create_test_entry(1, GroupType::Select);
        entry.add_buckets([create_test_bucket(1), create_test_bucket(2)]).unwrap();
        entry.add_buckets(Vec::<Bucket>::new()).unwrap();
        entry.add_buckets([create_test_bucket(3)]).unwrap();

        let ids: Vec<u32> = entry.buckets().iter().map(|b| b.bucket_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(switch.sent().is_empty());
    }

    #[test]
    fn test_reset_buckets_keeps_only_last_set() {
        let (mut entry, switch) = create_test_entry(1, GroupType::Select);
        entry.add_buckets([create_test_bucket(1), create_test_bucket(2)]).unwrap();
        entry.reset_buckets([create_test_bucket(7)]).unwrap();
        entry.reset_buckets([create_test_bucket(8), create_test_bucket(9)]).unwrap();

        assert_eq!(entry.buckets(), &[create_test_bucket(8), create_test_bucket(9)]);
        assert!(switch.sent().is_empty());
    }

    #[test]
    fn test_bucket_changes_are_audited() {
        let (mut entry, _switch) = create_test_entry(1, GroupType::Select);
        let capture = AuditCapture::default();
        capture.run(|| {
            entry.add_buckets([create_test_bucket(1), create_test_bucket(2)]).unwrap();
            entry.reset_buckets([create_test_bucket(3)]).unwrap();
        });

        let events = capture.events();
        assert_eq!(capture.actions(), vec!["add_buckets", "reset_buckets"]);
        assert_eq!(events[0].category, "RESOURCE_MODIFY");
        assert_eq!(events[0].record["object_id"], "1");
        assert_eq!(events[0].record["details"]["bucket_ids"], serde_json::json!([1, 2]));
        assert_eq!(events[1].record["details"]["bucket_ids"], serde_json::json!([3]));
        assert_eq!(events[1].record["details"]["state"], "uninstalled");
    }

    // 2. Install and resync

    #[test]
    fn test_first_install_sends_add() {
        let (mut entry, switch) = create_test_entry(5, GroupType::Select);
        entry.add_buckets([create_test_bucket(1), create_test_bucket(2)]).unwrap();
        entry.install().unwrap();

        let sent = switch.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].command, GroupCommand::Add);
        assert_eq!(sent[0].group_id, 5);
        assert_eq!(sent[0].group_type, GroupType::Select);
        assert_eq!(sent[0].bucket_ids(), vec![1, 2]);
        assert!(entry.is_installed());
    }

    #[test]
    fn test_second_install_sends_modify() {
        let (mut entry, switch) = create_test_entry(5, GroupType::Indirect);
        entry.add_buckets([create_test_bucket(1)]).unwrap();
        entry.install().unwrap();
        entry.install().unwrap();

        let sent = switch.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].command, GroupCommand::Modify);
        assert_eq!(sent[1].bucket_ids(), vec![1]);
        assert_eq!(sent[1].command_bucket_id, None);
    }

    #[test]
    fn test_add_buckets_when_installed_resends_full_list() {
        let (mut entry, switch) = create_test_entry(5, GroupType::Select);
        entry.add_buckets([create_test_bucket(1), create_test_bucket(2)]).unwrap();
        entry.install().unwrap();
        entry.add_buckets([create_test_bucket(3)]).unwrap();

        let sent = switch.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].command, GroupCommand::Modify);
        assert_eq!(sent[1].bucket_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn test_reset_buckets_when_installed_resends() {
        let (mut entry, switch) = create_test_entry(2, GroupType::FastFailover);
        entry.add_buckets([create_test_bucket(1)]).unwrap();
        entry.install().unwrap();
        entry.reset_buckets([create_test_bucket(4)]).unwrap();

        let sent = switch.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].command, GroupCommand::Modify);
        assert_eq!(sent[1].bucket_ids(), vec![4]);
    }

    #[test]
    fn test_install_failure_keeps_state() {
        let (mut entry, switch) = create_test_entry(5, GroupType::All);
        switch.fail_send.store(true, Ordering::SeqCst);

        let err = entry.install().unwrap_err();
        assert!(err.is_transmission());
        assert_eq!(
            err,
            GroupError::transmission(5, "connection closed")
        );
        assert_eq!(entry.state(), InstallState::Uninstalled);

        // A later install still starts with ADD.
        switch.fail_send.store(false, Ordering::SeqCst);
        entry.install().unwrap();
        assert_eq!(switch.sent()[0].command, GroupCommand::Add);
    }

    #[test]
    fn test_resync_failure_is_returned() {
        let (mut entry, switch) = create_test_entry(5, GroupType::Select);
        entry.install().unwrap();
        switch.fail_send.store(true, Ordering::SeqCst);

        let result = entry.add_buckets([create_test_bucket(1)]);
        assert!(matches!(result, Err(GroupError::Transmission { group_id: 5, .. })));
        assert_eq!(entry.buckets().len(), 1);
        assert!(entry.is_installed());
    }

    // 3. Delete

    #[test]
    fn test_delete_installed_sends_delete_without_buckets() {
        let (mut entry, switch) = create_test_entry(5, GroupType::Select);
        entry.add_buckets([create_test_bucket(1), create_test_bucket(2)]).unwrap();
        entry.install().unwrap();
        entry.delete().unwrap();

        let sent = switch.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].command, GroupCommand::Delete);
        assert_eq!(sent[1].group_id, 5);
        assert!(sent[1].buckets.is_empty());
        assert_eq!(switch.deregistered(), vec![5]);
        assert!(!entry.is_installed());
        assert_eq!(entry.state(), InstallState::Deleted);
    }

    #[test]
    fn test_delete_uninstalled_only_deregisters() {
        let (mut entry, switch) = create_test_entry(6, GroupType::All);
        entry.add_buckets([create_test_bucket(1)]).unwrap();
        entry.delete().unwrap();

        assert!(switch.sent().is_empty());
        assert_eq!(switch.deregistered(), vec![6]);
    }

    #[test]
    fn test_delete_send_failure_skips_deregistration() {
        let (mut entry, switch) = create_test_entry(5, GroupType::All);
        entry.install().unwrap();
        switch.fail_send.store(true, Ordering::SeqCst);

        assert!(entry.delete().unwrap_err().is_transmission());
        assert!(entry.is_installed());
        assert!(switch.deregistered().is_empty());
    }

    #[test]
    fn test_delete_registry_failure_allows_retry() {
        let (mut entry, switch) = create_test_entry(5, GroupType::All);
        entry.install().unwrap();
        switch.fail_deregister.store(true, Ordering::SeqCst);

        let err = entry.delete().unwrap_err();
        assert_eq!(err, GroupError::registry(5, "registry unavailable"));
        assert_eq!(entry.state(), InstallState::Uninstalled);

        switch.fail_deregister.store(false, Ordering::SeqCst);
        entry.delete().unwrap();
        // The DELETE went out once; the retry only deregisters.
        assert_eq!(switch.sent().len(), 2);
        assert_eq!(switch.deregistered(), vec![5]);
    }

    #[test]
    fn test_operations_after_delete_fail() {
        let (mut entry, _switch) = create_test_entry(5, GroupType::All);
        entry.delete().unwrap();

        assert_eq!(entry.install(), Err(GroupError::Deleted(5)));
        assert_eq!(entry.add_buckets([create_test_bucket(1)]), Err(GroupError::Deleted(5)));
        assert_eq!(entry.reset_buckets(Vec::<Bucket>::new()), Err(GroupError::Deleted(5)));
        assert_eq!(entry.delete(), Err(GroupError::Deleted(5)));
        assert!(entry.bundle_message(GroupCommand::Add).is_err());
    }

    // 4. Bundles

    #[test]
    fn test_bundle_message_leaves_state_alone() {
        let (mut entry, switch) = create_test_entry(3, GroupType::Select);
        entry.add_buckets([create_test_bucket(1), create_test_bucket(2)]).unwrap();

        let mut bundled = entry.bundle_message(GroupCommand::Add).unwrap();
        bundled.reset_xid(100);

        assert_eq!(bundled.message().command, GroupCommand::Add);
        assert_eq!(bundled.message().bucket_ids(), vec![1, 2]);
        assert_eq!(bundled.xid(), 100);
        assert!(switch.sent().is_empty());
        assert_eq!(entry.state(), InstallState::Uninstalled);

        entry.confirm_bundled(GroupCommand::Add).unwrap();
        assert!(entry.is_installed());
    }

    #[test]
    fn test_bundle_bucket_commands() {
        let (mut entry, _switch) = create_test_entry(3, GroupType::Select);
        entry.add_buckets([create_test_bucket(4), create_test_bucket(5)]).unwrap();

        let insert = entry.bundle_message(GroupCommand::InsertBucket).unwrap();
        assert_eq!(insert.message().command_bucket_id, Some(OFPG_BUCKET_LAST));
        assert_eq!(insert.message().bucket_ids(), vec![4, 5]);

        let remove = entry.bundle_message(GroupCommand::RemoveBucket).unwrap();
        assert_eq!(remove.message().command_bucket_id, Some(4));
        assert!(remove.message().buckets.is_empty());
    }

    #[test]
    fn test_bundle_staging_is_audited_in_progress() {
        let (mut entry, _switch) = create_test_entry(3, GroupType::Select);
        entry.add_buckets([create_test_bucket(1)]).unwrap();

        let capture = AuditCapture::default();
        capture.run(|| {
            entry.bundle_message(GroupCommand::Add).unwrap();
            entry.confirm_bundled(GroupCommand::Add).unwrap();
        });

        let events = capture.events();
        assert_eq!(capture.actions(), vec!["bundle_message", "confirm_bundled"]);
        assert_eq!(events[0].record["outcome"], "in_progress");
        assert_eq!(
            events[0].record["details"]["command_bucket_id"],
            serde_json::json!(OFPG_BUCKET_ALL)
        );
        assert_eq!(events[1].record["outcome"], "success");
    }

    #[test]
    fn test_bundle_remove_bucket_on_empty_group() {
        let (entry, _switch) = create_test_entry(3, GroupType::Select);
        assert_eq!(
            entry.bundle_message(GroupCommand::RemoveBucket),
            Err(GroupError::NoBucketToRemove(3))
        );
    }

    #[test]
    fn test_confirm_bundled_delete() {
        let (mut entry, _switch) = create_test_entry(3, GroupType::All);
        entry.confirm_bundled(GroupCommand::Add).unwrap();
        entry.confirm_bundled(GroupCommand::Delete).unwrap();
        assert_eq!(entry.state(), InstallState::Uninstalled);
    }

    // 5. Flow target

    #[test]
    fn test_group_as_flow_target() {
        let (entry, _switch) = create_test_entry(42, GroupType::Select);

        assert_eq!(entry.type_name(), "group");
        assert_eq!(entry.action_type(), ActionType::Group);
        assert_eq!(entry.action_message(), Action::group(42));
        assert_eq!(
            entry.flow_instr(),
            Instruction::ApplyActions {
                actions: vec![Action::group(42)]
            }
        );
    }

    #[test]
    fn test_debug_omits_switch() {
        let (entry, _switch) = create_test_entry(42, GroupType::Select);
        let debug = format!("{:?}", entry);
        assert!(debug.contains("id: 42"));
        assert!(debug.contains("Uninstalled"));
    }
}

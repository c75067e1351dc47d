//! Per-switch group registry.

use super::entry::GroupEntry;
use super::switch::{GroupSwitch, MessageSender};
use crate::audit::{AuditCategory, AuditOutcome, AuditRecord};
use crate::error::{GroupError, GroupResult};
use crate::{audit_log, debug_log, info_log, warn_log};
use ofp_types::{GroupId, GroupMod, GroupType, OFPG_MAX};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

const SOURCE: &str = "GroupTable";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupTableConfig {
    /// Label used in log and audit records.
    pub switch_name: String,
    /// Highest group id `new_group` accepts; never above `OFPG_MAX`.
    pub max_group_id: GroupId,
}

impl Default for GroupTableConfig {
    fn default() -> Self {
        Self {
            switch_name: "ofswitch".to_string(),
            max_group_id: OFPG_MAX,
        }
    }
}

impl GroupTableConfig {
    /// Parses a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupTableStats {
    pub groups_created: u64,
    pub groups_removed: u64,
    pub group_mods_sent: u64,
    pub send_failures: u64,
    pub sent_by_command: HashMap<String, u64>,
}

#[derive(Debug, Default)]
struct Inner {
    groups: HashMap<GroupId, GroupType>,
    stats: GroupTableStats,
}

/// Registry of the groups defined on one switch.
///
/// The table hands out [`GroupEntry`] values bound to itself, forwards their
/// group mods to the switch transport and drops ids when entries are deleted.
pub struct GroupTable {
    config: GroupTableConfig,
    sender: Arc<dyn MessageSender>,
    inner: Mutex<Inner>,
}

impl GroupTable {
    pub fn new(config: GroupTableConfig, sender: Arc<dyn MessageSender>) -> Arc<Self> {
        info_log!(
            SOURCE,
            switch = %config.switch_name,
            max_group_id = config.max_group_id,
            "Group table created"
        );
        Arc::new(Self {
            config,
            sender,
            inner: Mutex::new(Inner::default()),
        })
    }

    pub fn config(&self) -> &GroupTableConfig {
        &self.config
    }

    /// Registers `id` and returns an uninstalled entry for it.
    ///
    /// # Errors
    ///
    /// [`GroupError::InvalidGroupId`] for ids above the configured maximum
    /// (reserved ids included), [`GroupError::GroupExists`] for a registered id.
    pub fn new_group(self: &Arc<Self>, id: GroupId, group_type: GroupType) -> GroupResult<GroupEntry> {
        if id > self.config.max_group_id.min(OFPG_MAX) {
            let err = GroupError::InvalidGroupId(id);
            self.audit_create_failure(id, &err);
            return Err(err);
        }

        {
            let mut inner = self.lock();
            if inner.groups.contains_key(&id) {
                drop(inner);
                let err = GroupError::GroupExists(id);
                self.audit_create_failure(id, &err);
                return Err(err);
            }
            inner.groups.insert(id, group_type);
            inner.stats.groups_created += 1;
        }

        audit_log!(
            AuditRecord::new(AuditCategory::ResourceCreate, SOURCE, "new_group")
                .with_outcome(AuditOutcome::Success)
                .with_object_id(id.to_string())
                .with_object_type("group")
                .with_details(serde_json::json!({
                    "switch": self.config.switch_name,
                    "group_type": group_type.as_str(),
                }))
        );

        let switch: Arc<dyn GroupSwitch> = self.clone();
        Ok(GroupEntry::new(id, group_type, switch))
    }

    pub fn contains(&self, id: GroupId) -> bool {
        self.lock().groups.contains_key(&id)
    }

    pub fn group_type(&self, id: GroupId) -> Option<GroupType> {
        self.lock().groups.get(&id).copied()
    }

    /// Registered ids in ascending order.
    pub fn group_ids(&self) -> Vec<GroupId> {
        let mut ids: Vec<GroupId> = self.lock().groups.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.lock().groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().groups.is_empty()
    }

    pub fn stats(&self) -> GroupTableStats {
        self.lock().stats.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn audit_create_failure(&self, id: GroupId, err: &GroupError) {
        audit_log!(
            AuditRecord::new(AuditCategory::ResourceCreate, SOURCE, "new_group")
                .with_outcome(AuditOutcome::Failure)
                .with_object_id(id.to_string())
                .with_object_type("group")
                .with_error(err.to_string())
                .with_details(serde_json::json!({
                    "switch": self.config.switch_name,
                }))
        );
    }
}

impl GroupSwitch for GroupTable {
    fn send(&self, message: &GroupMod) -> Result<(), String> {
        let result = self.sender.send(message);

        let mut inner = self.lock();
        match &result {
            Ok(()) => {
                inner.stats.group_mods_sent += 1;
                *inner
                    .stats
                    .sent_by_command
                    .entry(message.command.as_str().to_string())
                    .or_insert(0) += 1;
                debug_log!(
                    SOURCE,
                    switch = %self.config.switch_name,
                    group_id = message.group_id,
                    command = %message.command,
                    "Group mod sent"
                );
            }
            Err(e) => {
                inner.stats.send_failures += 1;
                warn_log!(
                    SOURCE,
                    switch = %self.config.switch_name,
                    group_id = message.group_id,
                    command = %message.command,
                    error = %e,
                    "Group mod send failed"
                );
            }
        }

        result
    }

    /// Drops `group_id` from the registry. Unknown ids are a no-op.
    fn delete_group(&self, group_id: GroupId) -> Result<(), String> {
        let removed = {
            let mut inner = self.lock();
            let removed = inner.groups.remove(&group_id);
            if removed.is_some() {
                inner.stats.groups_removed += 1;
            }
            removed
        };

        let Some(group_type) = removed else {
            debug_log!(
                SOURCE,
                switch = %self.config.switch_name,
                group_id = group_id,
                "Group not registered, nothing to remove"
            );
            return Ok(());
        };

        audit_log!(
            AuditRecord::new(AuditCategory::ResourceDelete, SOURCE, "delete_group")
                .with_outcome(AuditOutcome::Success)
                .with_object_id(group_id.to_string())
                .with_object_type("group")
                .with_details(serde_json::json!({
                    "switch": self.config.switch_name,
                    "group_type": group_type.as_str(),
                }))
        );
        Ok(())
    }
}

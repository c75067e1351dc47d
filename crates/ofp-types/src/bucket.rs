//! Group buckets.

use crate::action::Action;
use crate::group::GroupId;
use serde::{Deserialize, Serialize};

/// Bucket identifier, used by insert/remove bucket commands.
pub type BucketId = u32;

/// OpenFlow 1.5 bucket property (`ofp_group_bucket_prop_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketProperty {
    /// Relative weight, select groups only.
    Weight(u16),
    /// Port whose liveness gates the bucket, fast failover groups.
    WatchPort(u32),
    /// Group whose liveness gates the bucket, fast failover groups.
    WatchGroup(GroupId),
}

/// One action list within a group.
///
/// # Examples
///
/// ```
/// use ofp_types::{Action, Bucket};
///
/// let bucket = Bucket::new(1)
///     .with_action(Action::output(2))
///     .with_weight(50);
/// assert_eq!(bucket.bucket_id, 1);
/// assert_eq!(bucket.weight(), Some(50));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub bucket_id: BucketId,
    pub actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<BucketProperty>,
}

impl Bucket {
    pub fn new(bucket_id: BucketId) -> Self {
        Self {
            bucket_id,
            actions: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn add_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn add_property(&mut self, property: BucketProperty) {
        self.properties.push(property);
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.add_action(action);
        self
    }

    pub fn with_weight(mut self, weight: u16) -> Self {
        self.add_property(BucketProperty::Weight(weight));
        self
    }

    pub fn with_watch_port(mut self, port: u32) -> Self {
        self.add_property(BucketProperty::WatchPort(port));
        self
    }

    pub fn with_watch_group(mut self, group_id: GroupId) -> Self {
        self.add_property(BucketProperty::WatchGroup(group_id));
        self
    }

    /// Returns the weight property, if set.
    pub fn weight(&self) -> Option<u16> {
        self.properties.iter().find_map(|p| match p {
            BucketProperty::Weight(w) => Some(*w),
            _ => None,
        })
    }
}

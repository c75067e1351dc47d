//! OpenFlow group table control.
//!
//! This crate manages group table entries on a logical switch: it keeps a
//! group's identity and buckets, builds the OpenFlow 1.5 group mods that
//! install, update and remove it, and tracks install state so repeated
//! changes go out with the right command.
//!
//! # Key Components
//!
//! - [`group::GroupEntry`]: one group and its lifecycle
//! - [`group::build_group_mod`]: command-specific group mod construction
//! - [`group::GroupBundleMessage`]: a group mod staged for an atomic bundle
//! - [`group::GroupTable`]: per-switch registry of group ids
//! - [`target::FlowTarget`]: rendering a group (or port) as a flow action
//!
//! # Example
//!
//! ```ignore
//! use ofctrl::group::{GroupTable, GroupTableConfig};
//! use ofp_types::{Action, Bucket, GroupType};
//!
//! let table = GroupTable::new(GroupTableConfig::default(), sender);
//! let mut group = table.new_group(5, GroupType::Select)?;
//! group.add_buckets([Bucket::new(1).with_action(Action::output(1))])?;
//! group.install()?; // ADD
//! group.add_buckets([Bucket::new(2).with_action(Action::output(2))])?; // MODIFY
//! group.delete()?;
//! ```

pub mod audit;
pub mod error;
pub mod group;
pub mod target;

pub use error::{GroupError, GroupResult};
pub use group::{
    GroupBundleMessage, GroupEntry, GroupSwitch, GroupTable, GroupTableConfig, InstallState,
    MessageSender,
};
pub use target::{FlowTarget, OutputPort};

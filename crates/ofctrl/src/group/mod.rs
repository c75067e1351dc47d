//! OpenFlow group table entries.
//!
//! A [`GroupEntry`] owns one group's id, type and ordered bucket list and
//! keeps track of whether the switch holds it. Group mods are produced by
//! [`build_group_mod`], which both the direct install/delete path and the
//! bundle path go through, so the two never disagree on field contents.
//!
//! [`GroupTable`] is the per-switch registry entries are created from and
//! deregistered from on delete.

mod builder;
mod bundle;
mod entry;
mod state;
mod switch;
mod table;

pub use builder::{build_group_delete, build_group_mod};
pub use bundle::GroupBundleMessage;
pub use entry::GroupEntry;
pub use state::InstallState;
pub use switch::{GroupSwitch, MessageSender};
pub use table::{GroupTable, GroupTableConfig, GroupTableStats};

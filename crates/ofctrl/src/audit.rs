//! Structured audit logging for group table changes.
//!
//! Every change pushed to a switch (group mods, registry updates, bucket
//! edits) produces an [`AuditRecord`] that is emitted through `tracing`
//! under the `audit` target. Records serialize to JSON so they can be
//! shipped to a log pipeline as-is.
//!
//! # Severity mapping
//!
//! | Outcome | Level |
//! |---------|-------|
//! | Success | info |
//! | InProgress | debug |
//! | Failure | warn |
//!
//! The plain logging macros ([`debug_log!`], [`info_log!`], [`warn_log!`])
//! tag each event with the emitting component.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Audit event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditCategory {
    /// Group registered on a switch
    ResourceCreate,
    /// Group buckets or install state changed
    ResourceModify,
    /// Group removed from a switch
    ResourceDelete,
    /// OpenFlow message sent to a switch, or staged for a bundle
    SwitchOperation,
}

impl fmt::Display for AuditCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditCategory::ResourceCreate => write!(f, "RESOURCE_CREATE"),
            AuditCategory::ResourceModify => write!(f, "RESOURCE_MODIFY"),
            AuditCategory::ResourceDelete => write!(f, "RESOURCE_DELETE"),
            AuditCategory::SwitchOperation => write!(f, "SWITCH_OPERATION"),
        }
    }
}

/// Outcome of an audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Success,
    Failure,
    /// Staged but not yet confirmed, e.g. a group mod handed to a bundle
    InProgress,
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditOutcome::Success => write!(f, "success"),
            AuditOutcome::Failure => write!(f, "failure"),
            AuditOutcome::InProgress => write!(f, "in_progress"),
        }
    }
}

/// One audit event.
///
/// Built with the `with_*` methods and handed to [`audit_log!`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// UTC time the record was created
    pub timestamp: DateTime<Utc>,

    pub category: AuditCategory,

    /// Component emitting the record, e.g. "GroupEntry"
    pub source: String,

    /// Operation performed, e.g. "install"
    pub action: String,

    pub outcome: AuditOutcome,

    /// Affected object, e.g. the group id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,

    /// Kind of the affected object, e.g. "group"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditRecord {
    /// Creates a record stamped now, with outcome `InProgress`.
    pub fn new(
        category: AuditCategory,
        source: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            category,
            source: source.into(),
            action: action.into(),
            outcome: AuditOutcome::InProgress,
            object_id: None,
            object_type: None,
            details: None,
            error: None,
        }
    }

    pub fn with_outcome(mut self, outcome: AuditOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn with_object_id(mut self, id: impl Into<String>) -> Self {
        self.object_id = Some(id.into());
        self
    }

    pub fn with_object_type(mut self, obj_type: impl Into<String>) -> Self {
        self.object_type = Some(obj_type.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Sets the error message and marks the outcome as `Failure`.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self.outcome = AuditOutcome::Failure;
        self
    }

    /// Serializes the record, falling back to an error object.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!(r#"{{"error":"serialization_failed","message":"{}"}}"#, e))
    }
}

/// Debug-level event tagged with its source component.
///
/// ```ignore
/// debug_log!("GroupTable", group_id = 5, "registered");
/// ```
#[macro_export]
macro_rules! debug_log {
    ($source:expr, $($arg:tt)*) => {
        tracing::debug!(
            source = $source,
            $($arg)*
        )
    };
}

/// Info-level event tagged with its source component.
#[macro_export]
macro_rules! info_log {
    ($source:expr, $($arg:tt)*) => {
        tracing::info!(
            source = $source,
            $($arg)*
        )
    };
}

/// Warn-level event tagged with its source component.
#[macro_export]
macro_rules! warn_log {
    ($source:expr, $($arg:tt)*) => {
        tracing::warn!(
            source = $source,
            $($arg)*
        )
    };
}

/// Emits an [`AuditRecord`] on the `audit` target at the level matching
/// its outcome.
///
/// ```ignore
/// audit_log!(
///     AuditRecord::new(AuditCategory::ResourceCreate, "GroupTable", "new_group")
///         .with_outcome(AuditOutcome::Success)
///         .with_object_id("5")
///         .with_object_type("group")
/// );
/// ```
#[macro_export]
macro_rules! audit_log {
    ($record:expr) => {{
        let record: $crate::audit::AuditRecord = $record;
        let json = record.to_json();
        let object_id = record.object_id.as_deref().unwrap_or("");
        match record.outcome {
            $crate::audit::AuditOutcome::Success => tracing::info!(
                target: "audit",
                category = %record.category,
                source = %record.source,
                action = %record.action,
                object_id = object_id,
                audit_json = %json,
                "{} {} succeeded",
                record.source,
                record.action
            ),
            $crate::audit::AuditOutcome::InProgress => tracing::debug!(
                target: "audit",
                category = %record.category,
                source = %record.source,
                action = %record.action,
                object_id = object_id,
                audit_json = %json,
                "{} {} in progress",
                record.source,
                record.action
            ),
            $crate::audit::AuditOutcome::Failure => tracing::warn!(
                target: "audit",
                category = %record.category,
                source = %record.source,
                action = %record.action,
                object_id = object_id,
                error = record.error.as_deref().unwrap_or(""),
                audit_json = %json,
                "{} {} failed",
                record.source,
                record.action
            ),
        }
    }};
}

//! Entity lifecycle tracking
//!
//! Ledger entities are never hard-deleted; they are deactivated with a
//! timestamp, an actor, and a reason. `Lifecycle` is a value embedded in
//! each entity struct rather than inherited behavior, so every entity
//! carries its own audit state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::StaffId;

/// Active/deactivated state with deactivation audit fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    pub is_active: bool,
    pub deactivated_at: Option<DateTime<Utc>>,
    pub deactivated_by: Option<StaffId>,
    pub deactivation_reason: Option<String>,
}

impl Lifecycle {
    /// Creates an active lifecycle
    pub fn active() -> Self {
        Self {
            is_active: true,
            deactivated_at: None,
            deactivated_by: None,
            deactivation_reason: None,
        }
    }

    /// Deactivates the entity, recording who did it and why
    pub fn deactivate(&mut self, by: StaffId, reason: impl Into<String>) {
        self.is_active = false;
        self.deactivated_at = Some(Utc::now());
        self.deactivated_by = Some(by);
        self.deactivation_reason = Some(reason.into());
    }

    /// Reactivates the entity, clearing the deactivation audit fields
    pub fn reactivate(&mut self) {
        self.is_active = true;
        self.deactivated_at = None;
        self.deactivated_by = None;
        self.deactivation_reason = None;
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deactivate_records_audit_fields() {
        let staff = StaffId::new();
        let mut lifecycle = Lifecycle::active();

        lifecycle.deactivate(staff, "branch closed");

        assert!(!lifecycle.is_active);
        assert_eq!(lifecycle.deactivated_by, Some(staff));
        assert_eq!(lifecycle.deactivation_reason.as_deref(), Some("branch closed"));
        assert!(lifecycle.deactivated_at.is_some());
    }

    #[test]
    fn test_reactivate_clears_audit_fields() {
        let mut lifecycle = Lifecycle::active();
        lifecycle.deactivate(StaffId::new(), "mistake");
        lifecycle.reactivate();

        assert!(lifecycle.is_active);
        assert!(lifecycle.deactivated_at.is_none());
        assert!(lifecycle.deactivated_by.is_none());
        assert!(lifecycle.deactivation_reason.is_none());
    }
}

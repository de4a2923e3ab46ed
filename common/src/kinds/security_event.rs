//! セキュリティイベント

use crate::record::{ActionContext, Record, RecordFilter};
use crate::timestamp::Timestamp;
use crate::types::{variant_enum, Choice, Severity};
use serde::{Deserialize, Serialize};

variant_enum! {
    pub enum SecurityEventType {
        Login => "login",
        Logout => "logout",
        FailedLogin => "failed_login",
        PermissionChange => "permission_change",
        DataAccess => "data_access",
        SystemChange => "system_change",
        Alert => "alert",
        BreachAttempt => "breach_attempt",
    }
}

variant_enum! {
    pub enum SecurityEventStatus {
        Active => "active",
        Resolved => "resolved",
        Investigating => "investigating",
    }
}

variant_enum! {
    pub enum SecurityEventTransition {
        Resolve => "resolve",
        Investigate => "investigate",
        /// 却下（resolved として扱う）
        Dismiss => "dismiss",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: SecurityEventType,
    pub severity: Severity,
    pub timestamp: Timestamp,
    pub user: String,
    pub ip_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub description: String,
    /// イベント種類ごとの詳細（表示専用）
    #[serde(default)]
    pub details: serde_json::Map<String, serde_json::Value>,
    pub status: SecurityEventStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl Record for SecurityEvent {
    type Transition = SecurityEventTransition;
    type Filter = SecurityEventFilter;

    const KIND: &'static str = "security event";

    fn id(&self) -> &str {
        &self.id
    }

    fn timestamp(&self) -> Option<Timestamp> {
        Some(self.timestamp)
    }

    fn searchable_text(&self) -> Vec<&str> {
        vec![self.description.as_str(), self.user.as_str(), self.ip_address.as_str()]
    }

    fn priority_rank(&self) -> u8 {
        self.severity.rank()
    }

    fn type_rank(&self) -> u8 {
        self.severity.rank()
    }

    fn apply_transition(
        &mut self,
        transition: SecurityEventTransition,
        _ctx: &ActionContext,
    ) -> bool {
        let target = match transition {
            SecurityEventTransition::Resolve | SecurityEventTransition::Dismiss => {
                SecurityEventStatus::Resolved
            }
            SecurityEventTransition::Investigate => SecurityEventStatus::Investigating,
        };
        if self.status == target {
            return false;
        }
        self.status = target;
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecurityEventFilter {
    pub severity: Choice<Severity>,
    pub event_type: Choice<SecurityEventType>,
    pub status: Choice<SecurityEventStatus>,
}

impl RecordFilter<SecurityEvent> for SecurityEventFilter {
    fn admits(&self, event: &SecurityEvent) -> bool {
        self.severity.admits(&event.severity)
            && self.event_type.admits(&event.event_type)
            && self.status.admits(&event.status)
    }

    fn is_active(&self) -> bool {
        !(self.severity.is_all() && self.event_type.is_all() && self.status.is_all())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySummary {
    pub total: usize,
    pub critical_active: usize,
    pub high_active: usize,
}

impl SecuritySummary {
    pub fn from_records(events: &[SecurityEvent]) -> Self {
        let active_with = |severity: Severity| {
            events
                .iter()
                .filter(|e| e.severity == severity && e.status == SecurityEventStatus::Active)
                .count()
        };
        Self {
            total: events.len(),
            critical_active: active_with(Severity::Critical),
            high_active: active_with(Severity::High),
        }
    }
}

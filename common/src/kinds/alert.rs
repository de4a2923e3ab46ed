//! アラート
//!
//! ## 状態遷移
//! - acknowledge → acknowledged
//! - resolve → resolved（対応者と対応日時を記録）
//! - dismiss → dismissed
//!
//! resolve 以外の遷移では対応者・対応日時をクリアする。
//! すでに遷移先の状態にある場合は何も変更しない。

use crate::record::{ActionContext, Record, RecordFilter};
use crate::timestamp::Timestamp;
use crate::types::{variant_enum, Choice, Priority};
use serde::{Deserialize, Serialize};

variant_enum! {
    /// アラート種類
    pub enum AlertType {
        Critical => "critical",
        Warning => "warning",
        Info => "info",
        Success => "success",
    }
}

impl AlertType {
    /// ソート用の順位（critical=4 … success=1）
    pub fn rank(&self) -> u8 {
        match self {
            AlertType::Critical => 4,
            AlertType::Warning => 3,
            AlertType::Info => 2,
            AlertType::Success => 1,
        }
    }
}

variant_enum! {
    pub enum AlertCategory {
        System => "system",
        Security => "security",
        Performance => "performance",
        Maintenance => "maintenance",
        Detection => "detection",
        Network => "network",
    }
}

variant_enum! {
    pub enum AlertStatus {
        Active => "active",
        Acknowledged => "acknowledged",
        Resolved => "resolved",
        Dismissed => "dismissed",
    }
}

variant_enum! {
    pub enum AlertTransition {
        Acknowledge => "acknowledge",
        Resolve => "resolve",
        Dismiss => "dismiss",
    }
}

impl AlertTransition {
    pub fn target(&self) -> AlertStatus {
        match self {
            AlertTransition::Acknowledge => AlertStatus::Acknowledged,
            AlertTransition::Resolve => AlertStatus::Resolved,
            AlertTransition::Dismiss => AlertStatus::Dismissed,
        }
    }
}

/// アラート
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub category: AlertCategory,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub timestamp: Timestamp,
    pub status: AlertStatus,
    pub priority: Priority,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_devices: Vec<String>,
    #[serde(default)]
    pub action_required: bool,
    #[serde(default)]
    pub auto_resolve: bool,
    #[serde(default)]
    pub escalated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Alert {
    /// 必須項目だけで作成（状態は active）
    pub fn new(
        id: impl Into<String>,
        alert_type: AlertType,
        category: AlertCategory,
        title: impl Into<String>,
        priority: Priority,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            alert_type,
            category,
            title: title.into(),
            description: String::new(),
            location: None,
            timestamp,
            status: AlertStatus::Active,
            priority,
            source: String::new(),
            affected_devices: Vec::new(),
            action_required: false,
            auto_resolve: false,
            escalated: false,
            assigned_to: None,
            resolved_by: None,
            resolved_at: None,
            notes: None,
        }
    }
}

impl Record for Alert {
    type Transition = AlertTransition;
    type Filter = AlertFilter;

    const KIND: &'static str = "alert";

    fn id(&self) -> &str {
        &self.id
    }

    fn timestamp(&self) -> Option<Timestamp> {
        Some(self.timestamp)
    }

    fn searchable_text(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.description.as_str()];
        if let Some(location) = &self.location {
            fields.push(location);
        }
        fields
    }

    fn priority_rank(&self) -> u8 {
        self.priority.rank()
    }

    fn type_rank(&self) -> u8 {
        self.alert_type.rank()
    }

    fn apply_transition(&mut self, transition: AlertTransition, ctx: &ActionContext) -> bool {
        let target = transition.target();
        if self.status == target {
            return false;
        }

        self.status = target;
        if target == AlertStatus::Resolved {
            self.resolved_by = Some(ctx.actor.clone());
            self.resolved_at = Some(ctx.now);
        } else {
            self.resolved_by = None;
            self.resolved_at = None;
        }
        true
    }
}

/// アラートのカテゴリフィルタ
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertFilter {
    pub alert_type: Choice<AlertType>,
    pub status: Choice<AlertStatus>,
    pub category: Choice<AlertCategory>,
    pub priority: Choice<Priority>,
}

impl RecordFilter<Alert> for AlertFilter {
    fn admits(&self, alert: &Alert) -> bool {
        self.alert_type.admits(&alert.alert_type)
            && self.status.admits(&alert.status)
            && self.category.admits(&alert.category)
            && self.priority.admits(&alert.priority)
    }

    fn is_active(&self) -> bool {
        !(self.alert_type.is_all()
            && self.status.is_all()
            && self.category.is_all()
            && self.priority.is_all())
    }
}

/// ダッシュボード上部の件数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub total: usize,
    pub active: usize,
    pub critical_active: usize,
}

impl AlertSummary {
    pub fn from_records(alerts: &[Alert]) -> Self {
        Self {
            total: alerts.len(),
            active: alerts.iter().filter(|a| a.status == AlertStatus::Active).count(),
            critical_active: alerts
                .iter()
                .filter(|a| a.alert_type == AlertType::Critical && a.status == AlertStatus::Active)
                .count(),
        }
    }
}

//! 通知
//!
//! 状態は既読フラグとスター付きフラグの2つ。

use crate::record::{ActionContext, Record, RecordFilter};
use crate::timestamp::Timestamp;
use crate::types::{variant_enum, Choice, Priority, ReadState};
use serde::{Deserialize, Serialize};

variant_enum! {
    pub enum NotificationType {
        Alert => "alert",
        System => "system",
        Maintenance => "maintenance",
        Update => "update",
        Security => "security",
        Report => "report",
    }
}

impl NotificationType {
    /// ソート用の順位（alert が最上位、report が最下位）
    pub fn rank(&self) -> u8 {
        match self {
            NotificationType::Alert => 6,
            NotificationType::Security => 5,
            NotificationType::Maintenance => 4,
            NotificationType::System => 3,
            NotificationType::Update => 2,
            NotificationType::Report => 1,
        }
    }
}

variant_enum! {
    /// 配信チャネル
    pub enum Channel {
        Email => "email",
        Sms => "sms",
        Push => "push",
        Slack => "slack",
        Webhook => "webhook",
    }
}

variant_enum! {
    pub enum NotificationTransition {
        MarkRead => "read",
        MarkUnread => "unread",
        Star => "star",
        Unstar => "unstar",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    #[serde(default)]
    pub message: String,
    pub timestamp: Timestamp,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub starred: bool,
    pub priority: Priority,
    pub channel: Channel,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

impl Record for Notification {
    type Transition = NotificationTransition;
    type Filter = NotificationFilter;

    const KIND: &'static str = "notification";

    fn id(&self) -> &str {
        &self.id
    }

    fn timestamp(&self) -> Option<Timestamp> {
        Some(self.timestamp)
    }

    fn searchable_text(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.message.as_str()]
    }

    fn priority_rank(&self) -> u8 {
        self.priority.rank()
    }

    fn type_rank(&self) -> u8 {
        self.notification_type.rank()
    }

    fn apply_transition(
        &mut self,
        transition: NotificationTransition,
        _ctx: &ActionContext,
    ) -> bool {
        let (flag, value) = match transition {
            NotificationTransition::MarkRead => (&mut self.read, true),
            NotificationTransition::MarkUnread => (&mut self.read, false),
            NotificationTransition::Star => (&mut self.starred, true),
            NotificationTransition::Unstar => (&mut self.starred, false),
        };
        let changed = *flag != value;
        *flag = value;
        changed
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationFilter {
    pub notification_type: Choice<NotificationType>,
    pub read: Choice<ReadState>,
    pub priority: Choice<Priority>,
}

impl RecordFilter<Notification> for NotificationFilter {
    fn admits(&self, n: &Notification) -> bool {
        self.notification_type.admits(&n.notification_type)
            && self.read.admits(&ReadState::of(n.read))
            && self.priority.admits(&n.priority)
    }

    fn is_active(&self) -> bool {
        !(self.notification_type.is_all() && self.read.is_all() && self.priority.is_all())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSummary {
    pub total: usize,
    pub unread: usize,
    pub starred: usize,
}

impl NotificationSummary {
    pub fn from_records(notifications: &[Notification]) -> Self {
        Self {
            total: notifications.len(),
            unread: notifications.iter().filter(|n| !n.read).count(),
            starred: notifications.iter().filter(|n| n.starred).count(),
        }
    }
}

//! ログインセッション

use crate::record::{ActionContext, Record, RecordFilter};
use crate::timestamp::Timestamp;
use crate::types::{variant_enum, Choice};
use serde::{Deserialize, Serialize};

variant_enum! {
    pub enum SessionStatus {
        Active => "active",
        Idle => "idle",
        Expired => "expired",
    }
}

impl SessionStatus {
    /// ソート用の順位（active が最上位）
    pub fn rank(&self) -> u8 {
        match self {
            SessionStatus::Active => 3,
            SessionStatus::Idle => 2,
            SessionStatus::Expired => 1,
        }
    }
}

variant_enum! {
    pub enum SessionTransition {
        /// 強制ログアウト（expired へ）
        Terminate => "terminate",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub id: String,
    pub user: String,
    #[serde(default)]
    pub role: String,
    pub ip_address: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub device: String,
    pub login_time: Timestamp,
    pub last_activity: Timestamp,
    pub status: SessionStatus,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Record for UserSession {
    type Transition = SessionTransition;
    type Filter = UserSessionFilter;

    const KIND: &'static str = "user session";

    fn id(&self) -> &str {
        &self.id
    }

    fn timestamp(&self) -> Option<Timestamp> {
        Some(self.last_activity)
    }

    fn searchable_text(&self) -> Vec<&str> {
        vec![
            self.user.as_str(),
            self.role.as_str(),
            self.ip_address.as_str(),
            self.location.as_str(),
            self.device.as_str(),
        ]
    }

    fn type_rank(&self) -> u8 {
        self.status.rank()
    }

    fn apply_transition(&mut self, transition: SessionTransition, _ctx: &ActionContext) -> bool {
        match transition {
            SessionTransition::Terminate => {
                if self.status == SessionStatus::Expired {
                    return false;
                }
                self.status = SessionStatus::Expired;
                true
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserSessionFilter {
    pub status: Choice<SessionStatus>,
}

impl RecordFilter<UserSession> for UserSessionFilter {
    fn admits(&self, session: &UserSession) -> bool {
        self.status.admits(&session.status)
    }

    fn is_active(&self) -> bool {
        !self.status.is_all()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub total: usize,
    pub active: usize,
    pub idle: usize,
}

impl SessionSummary {
    pub fn from_records(sessions: &[UserSession]) -> Self {
        let count = |status: SessionStatus| sessions.iter().filter(|s| s.status == status).count();
        Self {
            total: sessions.len(),
            active: count(SessionStatus::Active),
            idle: count(SessionStatus::Idle),
        }
    }
}

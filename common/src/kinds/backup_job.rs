//! バックアップジョブ

use crate::record::{ActionContext, Record, RecordFilter};
use crate::timestamp::Timestamp;
use crate::types::{variant_enum, Choice};
use serde::{Deserialize, Serialize};

variant_enum! {
    pub enum BackupType {
        Full => "full",
        Incremental => "incremental",
        Differential => "differential",
    }
}

variant_enum! {
    pub enum BackupStatus {
        Scheduled => "scheduled",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
    }
}

variant_enum! {
    pub enum Frequency {
        Daily => "daily",
        Weekly => "weekly",
        Monthly => "monthly",
    }
}

variant_enum! {
    /// 保存先
    pub enum Destination {
        Local => "local",
        Cloud => "cloud",
        Both => "both",
    }
}

variant_enum! {
    pub enum BackupTransition {
        Start => "start",
        Stop => "stop",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub frequency: Frequency,
    /// 実行時刻 "HH:MM"
    pub time: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupJob {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub backup_type: BackupType,
    pub status: BackupStatus,
    #[serde(default)]
    pub progress: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub schedule: Schedule,
    /// 保持日数
    #[serde(default)]
    pub retention: u32,
    pub destination: Destination,
}

impl Record for BackupJob {
    type Transition = BackupTransition;
    type Filter = BackupJobFilter;

    const KIND: &'static str = "backup job";

    fn id(&self) -> &str {
        &self.id
    }

    fn timestamp(&self) -> Option<Timestamp> {
        self.start_time
    }

    fn searchable_text(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn apply_transition(&mut self, transition: BackupTransition, ctx: &ActionContext) -> bool {
        match transition {
            BackupTransition::Start => {
                if self.status == BackupStatus::Running {
                    return false;
                }
                self.status = BackupStatus::Running;
                self.progress = 0.0;
                self.start_time = Some(ctx.now);
                true
            }
            BackupTransition::Stop => {
                if self.status == BackupStatus::Scheduled && self.progress == 0.0 {
                    return false;
                }
                self.status = BackupStatus::Scheduled;
                self.progress = 0.0;
                true
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackupJobFilter {
    pub backup_type: Choice<BackupType>,
    pub status: Choice<BackupStatus>,
}

impl RecordFilter<BackupJob> for BackupJobFilter {
    fn admits(&self, job: &BackupJob) -> bool {
        self.backup_type.admits(&job.backup_type) && self.status.admits(&job.status)
    }

    fn is_active(&self) -> bool {
        !(self.backup_type.is_all() && self.status.is_all())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSummary {
    pub total: usize,
    pub running: usize,
    pub failed: usize,
}

impl BackupSummary {
    pub fn from_records(jobs: &[BackupJob]) -> Self {
        Self {
            total: jobs.len(),
            running: jobs.iter().filter(|j| j.status == BackupStatus::Running).count(),
            failed: jobs.iter().filter(|j| j.status == BackupStatus::Failed).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(status: BackupStatus, start: Option<&str>) -> BackupJob {
        BackupJob {
            id: "2".into(),
            name: "Weekly Full Backup".into(),
            backup_type: BackupType::Full,
            status,
            progress: 0.0,
            start_time: start.map(|s| Timestamp::parse(s).unwrap()),
            end_time: None,
            size: None,
            schedule: Schedule {
                frequency: Frequency::Weekly,
                time: "01:00".into(),
                enabled: true,
            },
            retention: 90,
            destination: Destination::Both,
        }
    }

    #[test]
    fn test_start_stamps_start_time() {
        let ctx = ActionContext::new("tester", Timestamp::parse("2025-01-08 11:00:00").unwrap());
        let mut j = job(BackupStatus::Scheduled, None);
        assert!(j.timestamp().is_none());

        assert!(j.apply_transition(BackupTransition::Start, &ctx));
        assert_eq!(j.status, BackupStatus::Running);
        assert_eq!(j.timestamp(), Some(ctx.now));
        assert!(!j.apply_transition(BackupTransition::Start, &ctx));
    }

    #[test]
    fn test_stop_resets_progress() {
        let ctx = ActionContext::now("tester");
        let mut j = job(BackupStatus::Running, Some("2025-01-08 10:30:00"));
        j.progress = 65.0;
        assert!(j.apply_transition(BackupTransition::Stop, &ctx));
        assert_eq!(j.status, BackupStatus::Scheduled);
        assert_eq!(j.progress, 0.0);
        assert!(!j.apply_transition(BackupTransition::Stop, &ctx));
    }

    #[test]
    fn test_deserialize_schedule() {
        let json = r#"{"id":"1","name":"Daily Analytics Backup","type":"incremental",
            "status":"completed","progress":100,"startTime":"2025-01-08 02:00:00",
            "endTime":"2025-01-08 02:15:00","size":"245 MB",
            "schedule":{"frequency":"daily","time":"02:00","enabled":true},
            "retention":30,"destination":"cloud"}"#;
        let j: BackupJob = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(j.schedule.frequency, Frequency::Daily);
        assert_eq!(j.progress, 100.0);
        assert_eq!(j.destination, Destination::Cloud);
    }
}

//! 表形式への変換
//!
//! 端末表示・CSV・Excel の列定義を種別ごとに1か所で持つ。

use crate::kinds::{
    Alert, BackupJob, DataSource, ExportJob, Notification, SecurityEvent, UserSession,
};
use crate::timestamp::Timestamp;

/// 表の1行として出力できるレコード
pub trait Tabular {
    /// 見出し
    fn columns() -> &'static [&'static str];

    /// 列順の値（columns と同じ長さ）
    fn row(&self) -> Vec<String>;
}

fn opt_text(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

fn opt_time(value: &Option<Timestamp>) -> String {
    value.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string())
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

impl Tabular for Alert {
    fn columns() -> &'static [&'static str] {
        &[
            "ID",
            "Type",
            "Category",
            "Priority",
            "Status",
            "Title",
            "Location",
            "Timestamp",
            "Source",
            "Resolved By",
            "Resolved At",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.alert_type.to_string(),
            self.category.to_string(),
            self.priority.to_string(),
            self.status.to_string(),
            self.title.clone(),
            opt_text(&self.location),
            self.timestamp.to_string(),
            self.source.clone(),
            opt_text(&self.resolved_by),
            opt_time(&self.resolved_at),
        ]
    }
}

impl Tabular for Notification {
    fn columns() -> &'static [&'static str] {
        &["ID", "Type", "Priority", "Read", "Starred", "Title", "Channel", "Source", "Timestamp"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.notification_type.to_string(),
            self.priority.to_string(),
            yes_no(self.read),
            yes_no(self.starred),
            self.title.clone(),
            self.channel.to_string(),
            self.source.clone(),
            self.timestamp.to_string(),
        ]
    }
}

impl Tabular for DataSource {
    fn columns() -> &'static [&'static str] {
        &[
            "ID",
            "Name",
            "Type",
            "Status",
            "Size",
            "Records",
            "Last Updated",
            "Retention",
            "Location",
            "Encrypted",
            "Compressed",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.source_type.to_string(),
            self.status.to_string(),
            self.size.clone(),
            self.records.to_string(),
            self.last_updated.to_string(),
            format!("{} days", self.retention),
            self.location.to_string(),
            yes_no(self.encrypted),
            yes_no(self.compressed),
        ]
    }
}

impl Tabular for SecurityEvent {
    fn columns() -> &'static [&'static str] {
        &[
            "ID",
            "Type",
            "Severity",
            "Status",
            "User",
            "IP Address",
            "Location",
            "Description",
            "Timestamp",
            "Assigned To",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.event_type.to_string(),
            self.severity.to_string(),
            self.status.to_string(),
            self.user.clone(),
            self.ip_address.clone(),
            opt_text(&self.location),
            self.description.clone(),
            self.timestamp.to_string(),
            opt_text(&self.assigned_to),
        ]
    }
}

impl Tabular for ExportJob {
    fn columns() -> &'static [&'static str] {
        &[
            "ID",
            "Name",
            "Type",
            "Format",
            "Status",
            "Progress",
            "Created At",
            "Completed At",
            "File Size",
            "Download URL",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.category.to_string(),
            self.format.to_string(),
            self.status.to_string(),
            format!("{:.0}%", self.progress),
            self.created_at.to_string(),
            opt_time(&self.completed_at),
            opt_text(&self.file_size),
            opt_text(&self.download_url),
        ]
    }
}

impl Tabular for BackupJob {
    fn columns() -> &'static [&'static str] {
        &[
            "ID",
            "Name",
            "Type",
            "Status",
            "Progress",
            "Start Time",
            "End Time",
            "Size",
            "Frequency",
            "Destination",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.backup_type.to_string(),
            self.status.to_string(),
            format!("{:.0}%", self.progress),
            opt_time(&self.start_time),
            opt_time(&self.end_time),
            opt_text(&self.size),
            format!("{} {}", self.schedule.frequency, self.schedule.time),
            self.destination.to_string(),
        ]
    }
}

impl Tabular for UserSession {
    fn columns() -> &'static [&'static str] {
        &[
            "ID",
            "User",
            "Role",
            "Status",
            "IP Address",
            "Location",
            "Device",
            "Login Time",
            "Last Activity",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.user.clone(),
            self.role.clone(),
            self.status.to_string(),
            self.ip_address.clone(),
            self.location.clone(),
            self.device.clone(),
            self.login_time.to_string(),
            self.last_activity.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::builtin;

    fn assert_widths<T: Tabular>(records: &[T]) {
        for record in records {
            assert_eq!(record.row().len(), T::columns().len());
        }
    }

    #[test]
    fn test_rows_match_columns() {
        assert_widths(&builtin::<Alert>().unwrap());
        assert_widths(&builtin::<Notification>().unwrap());
        assert_widths(&builtin::<DataSource>().unwrap());
        assert_widths(&builtin::<SecurityEvent>().unwrap());
        assert_widths(&builtin::<ExportJob>().unwrap());
        assert_widths(&builtin::<BackupJob>().unwrap());
        assert_widths(&builtin::<UserSession>().unwrap());
    }

    #[test]
    fn test_missing_values_render_as_dash() {
        let jobs = builtin::<BackupJob>().unwrap();
        let weekly = jobs.iter().find(|j| j.id == "2").unwrap();
        let row = weekly.row();
        assert_eq!(row[5], "-");
        assert_eq!(row[8], "weekly 01:00");
    }
}

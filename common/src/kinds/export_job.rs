//! エクスポートジョブ
//!
//! ユーザーがテンプレートから作成するレコード。
//! pending → processing → completed / failed と進む。
//!
//! ## 変更履歴
//! - 2026-10-18: 初期作成

use crate::error::{Error, Result};
use crate::record::{ActionContext, Record, RecordFilter};
use crate::timestamp::Timestamp;
use crate::types::{variant_enum, Choice};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

variant_enum! {
    pub enum ExportCategory {
        Analytics => "analytics",
        Reports => "reports",
        Media => "media",
        System => "system",
        Logs => "logs",
    }
}

variant_enum! {
    /// 出力ファイル形式
    pub enum ExportFileFormat {
        Csv => "csv",
        Json => "json",
        Pdf => "pdf",
        Xlsx => "xlsx",
        Zip => "zip",
    }
}

variant_enum! {
    pub enum ExportStatus {
        Pending => "pending",
        Processing => "processing",
        Completed => "completed",
        Failed => "failed",
    }
}

/// エクスポートジョブの状態遷移
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExportTransition {
    /// pending → processing
    Start,
    /// 進捗を加算（processing のときのみ、100で頭打ち）
    Advance(f64),
    /// 完了（ファイルサイズMB）
    Complete(f64),
    Fail,
}

impl FromStr for ExportTransition {
    type Err = String;

    /// `start` / `fail` / `advance=20` / `complete=2.4`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim().to_lowercase();
        let (name, arg) = match trimmed.split_once('=') {
            Some((name, arg)) => (name.trim().to_string(), Some(arg.trim().to_string())),
            None => (trimmed.clone(), None),
        };
        let number = |arg: Option<String>| -> std::result::Result<f64, String> {
            let raw = arg.ok_or_else(|| format!("{} requires a value, e.g. {}=10", name, name))?;
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .ok_or_else(|| format!("Invalid number: {}", raw))
        };

        match name.as_str() {
            "start" => Ok(ExportTransition::Start),
            "fail" => Ok(ExportTransition::Fail),
            "advance" => number(arg).map(ExportTransition::Advance),
            "complete" => number(arg).map(ExportTransition::Complete),
            _ => Err(format!("Unknown value: {}. Use start, advance=N, complete=MB, fail", s)),
        }
    }
}

impl fmt::Display for ExportTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportTransition::Start => write!(f, "start"),
            ExportTransition::Advance(delta) => write!(f, "advance={}", delta),
            ExportTransition::Complete(size) => write!(f, "complete={}", size),
            ExportTransition::Fail => write!(f, "fail"),
        }
    }
}

/// 対象期間（日付文字列）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportJob {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category: ExportCategory,
    pub format: ExportFileFormat,
    pub status: ExportStatus,
    #[serde(default)]
    pub progress: f64,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default)]
    pub description: String,
    pub data_range: DataRange,
    #[serde(default)]
    pub filters: Map<String, Value>,
}

impl ExportJob {
    /// テンプレートと入力内容から pending のジョブを作成
    pub fn from_request(
        request: &ExportRequest,
        id: impl Into<String>,
        now: Timestamp,
    ) -> Result<Self> {
        let template = find_template(&request.template_id)
            .ok_or_else(|| Error::UnknownTemplate(request.template_id.clone()))?;

        if request.name.trim().is_empty() {
            return Err(Error::InvalidRequest("name is required".into()));
        }
        let start = Timestamp::parse(&request.start)
            .map_err(|_| Error::InvalidRequest(format!("invalid start date: {}", request.start)))?;
        let end = Timestamp::parse(&request.end)
            .map_err(|_| Error::InvalidRequest(format!("invalid end date: {}", request.end)))?;
        if start > end {
            return Err(Error::InvalidRequest(format!(
                "start date {} is after end date {}",
                request.start, request.end
            )));
        }

        let filters = json!({
            "locations": request.locations,
            "includeMetadata": request.include_metadata,
            "includeCharts": request.include_charts,
            "compression": request.compression,
            "encryption": request.encryption,
        });

        Ok(Self {
            id: id.into(),
            name: request.name.trim().to_string(),
            category: template.category,
            format: request.format.unwrap_or(template.format),
            status: ExportStatus::Pending,
            progress: 0.0,
            created_at: now,
            completed_at: None,
            file_size: None,
            download_url: None,
            description: request.description.clone(),
            data_range: DataRange {
                start: request.start.trim().to_string(),
                end: request.end.trim().to_string(),
            },
            filters: match filters {
                Value::Object(map) => map,
                _ => Map::new(),
            },
        })
    }

    /// ダウンロードURL（名前を小文字化し空白の連続を `-` に置換）
    pub fn download_path(&self) -> String {
        let slug = self.name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-");
        format!("/exports/{}.{}", slug, self.format)
    }
}

impl Record for ExportJob {
    type Transition = ExportTransition;
    type Filter = ExportJobFilter;

    const KIND: &'static str = "export job";

    fn id(&self) -> &str {
        &self.id
    }

    fn timestamp(&self) -> Option<Timestamp> {
        Some(self.created_at)
    }

    fn searchable_text(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }

    fn apply_transition(&mut self, transition: ExportTransition, ctx: &ActionContext) -> bool {
        match transition {
            ExportTransition::Start => {
                if self.status != ExportStatus::Pending {
                    return false;
                }
                self.status = ExportStatus::Processing;
                true
            }
            ExportTransition::Advance(delta) => {
                if self.status != ExportStatus::Processing {
                    return false;
                }
                let next = (self.progress + delta.max(0.0)).min(100.0);
                let changed = next != self.progress;
                self.progress = next;
                changed
            }
            ExportTransition::Complete(size_mb) => {
                if self.status == ExportStatus::Completed {
                    return false;
                }
                self.status = ExportStatus::Completed;
                self.progress = 100.0;
                self.completed_at = Some(ctx.now);
                self.file_size = Some(format!("{:.1} MB", size_mb));
                self.download_url = Some(self.download_path());
                true
            }
            ExportTransition::Fail => {
                if self.status == ExportStatus::Failed {
                    return false;
                }
                self.status = ExportStatus::Failed;
                true
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportJobFilter {
    pub category: Choice<ExportCategory>,
    pub status: Choice<ExportStatus>,
}

impl RecordFilter<ExportJob> for ExportJobFilter {
    fn admits(&self, job: &ExportJob) -> bool {
        self.category.admits(&job.category) && self.status.admits(&job.status)
    }

    fn is_active(&self) -> bool {
        !(self.category.is_all() && self.status.is_all())
    }
}

/// 新規エクスポートの入力内容
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub template_id: String,
    pub name: String,
    pub description: String,
    pub start: String,
    pub end: String,
    /// 未指定ならテンプレートの形式
    pub format: Option<ExportFileFormat>,
    pub locations: Vec<String>,
    pub include_metadata: bool,
    pub include_charts: bool,
    pub compression: bool,
    pub encryption: bool,
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            template_id: String::new(),
            name: String::new(),
            description: String::new(),
            start: String::new(),
            end: String::new(),
            format: None,
            locations: Vec::new(),
            include_metadata: true,
            include_charts: false,
            compression: true,
            encryption: false,
        }
    }
}

/// エクスポートテンプレート
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "type")]
    pub category: ExportCategory,
    pub format: ExportFileFormat,
    pub fields: &'static [&'static str],
}

pub const EXPORT_TEMPLATES: &[ExportTemplate] = &[
    ExportTemplate {
        id: "people-analytics",
        name: "People Analytics Report",
        description: "Comprehensive people detection and demographic data",
        category: ExportCategory::Analytics,
        format: ExportFileFormat::Xlsx,
        fields: &["timestamp", "location", "count", "age_group", "gender", "dwell_time"],
    },
    ExportTemplate {
        id: "vehicle-analytics",
        name: "Vehicle Traffic Report",
        description: "Vehicle detection, classification, and traffic flow data",
        category: ExportCategory::Analytics,
        format: ExportFileFormat::Csv,
        fields: &["timestamp", "location", "vehicle_type", "speed", "direction", "license_plate"],
    },
    ExportTemplate {
        id: "screen-performance",
        name: "Screen Performance Report",
        description: "LED screen uptime, performance metrics, and hardware status",
        category: ExportCategory::Reports,
        format: ExportFileFormat::Pdf,
        fields: &["screen_id", "uptime", "temperature", "power_consumption", "errors"],
    },
    ExportTemplate {
        id: "system-logs",
        name: "System Logs Export",
        description: "Complete system logs and audit trail",
        category: ExportCategory::Logs,
        format: ExportFileFormat::Json,
        fields: &["timestamp", "level", "source", "message", "user", "ip_address"],
    },
    ExportTemplate {
        id: "media-content",
        name: "Media Content Archive",
        description: "All uploaded media files and metadata",
        category: ExportCategory::Media,
        format: ExportFileFormat::Zip,
        fields: &["filename", "upload_date", "file_size", "format", "screens_assigned"],
    },
    ExportTemplate {
        id: "combined-analytics",
        name: "Combined Analytics Dashboard",
        description: "All analytics data in a comprehensive report",
        category: ExportCategory::Analytics,
        format: ExportFileFormat::Pdf,
        fields: &["all_metrics", "charts", "summaries", "trends"],
    },
];

pub fn find_template(id: &str) -> Option<&'static ExportTemplate> {
    EXPORT_TEMPLATES.iter().find(|t| t.id == id)
}

/// 作成時刻（ミリ秒）をIDにする。使用済みなら1ずつずらす
pub fn next_job_id<F: Fn(&str) -> bool>(is_taken: F, now: Timestamp) -> String {
    let mut candidate = now.timestamp_millis();
    while is_taken(&candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub total: usize,
    pub completed: usize,
    pub processing: usize,
    pub failed: usize,
}

impl ExportSummary {
    pub fn from_records(jobs: &[ExportJob]) -> Self {
        let count = |status: ExportStatus| jobs.iter().filter(|j| j.status == status).count();
        Self {
            total: jobs.len(),
            completed: count(ExportStatus::Completed),
            processing: count(ExportStatus::Processing),
            failed: count(ExportStatus::Failed),
        }
    }
}

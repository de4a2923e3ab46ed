//! データソース（データ管理画面）

use crate::record::{ActionContext, Record, RecordFilter};
use crate::timestamp::Timestamp;
use crate::types::{variant_enum, Choice, Variant};
use regex::Regex;
use serde::{Deserialize, Serialize};

variant_enum! {
    pub enum DataSourceType {
        Analytics => "analytics",
        Media => "media",
        Logs => "logs",
        System => "system",
        Backup => "backup",
    }
}

variant_enum! {
    pub enum DataSourceStatus {
        Active => "active",
        Inactive => "inactive",
        Error => "error",
        Syncing => "syncing",
    }
}

variant_enum! {
    pub enum StorageLocation {
        Local => "local",
        Cloud => "cloud",
        Hybrid => "hybrid",
    }
}

variant_enum! {
    pub enum DataSourceTransition {
        Sync => "sync",
        Encrypt => "encrypt",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: DataSourceType,
    pub status: DataSourceStatus,
    /// 表示用サイズ（"2.4 GB" など）
    pub size: String,
    #[serde(default)]
    pub records: u64,
    pub last_updated: Timestamp,
    /// 保持日数
    #[serde(default)]
    pub retention: u32,
    pub location: StorageLocation,
    #[serde(default)]
    pub encrypted: bool,
    #[serde(default)]
    pub compressed: bool,
    #[serde(default)]
    pub description: String,
}

impl DataSource {
    /// サイズをMB単位で取得（解釈できない場合は0）
    pub fn size_mb(&self) -> f64 {
        parse_size_mb(&self.size).unwrap_or(0.0)
    }
}

/// "2.4 GB" / "892 MB" 形式のサイズをMBに換算
pub fn parse_size_mb(size: &str) -> Option<f64> {
    lazy_static::lazy_static! {
        static ref SIZE_RE: Regex =
            Regex::new(r"(?i)^\s*(\d+(?:\.\d+)?)\s*(KB|MB|GB|TB)\s*$").unwrap();
    }

    let caps = SIZE_RE.captures(size)?;
    let value: f64 = caps[1].parse().ok()?;
    let multiplier = match caps[2].to_uppercase().as_str() {
        "KB" => 1.0 / 1024.0,
        "GB" => 1024.0,
        "TB" => 1024.0 * 1024.0,
        _ => 1.0,
    };
    Some(value * multiplier)
}

impl Record for DataSource {
    type Transition = DataSourceTransition;
    type Filter = DataSourceFilter;

    const KIND: &'static str = "data source";

    fn id(&self) -> &str {
        &self.id
    }

    fn timestamp(&self) -> Option<Timestamp> {
        Some(self.last_updated)
    }

    fn searchable_text(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }

    fn apply_transition(&mut self, transition: DataSourceTransition, _ctx: &ActionContext) -> bool {
        match transition {
            DataSourceTransition::Sync => {
                if self.status == DataSourceStatus::Syncing {
                    return false;
                }
                self.status = DataSourceStatus::Syncing;
                true
            }
            DataSourceTransition::Encrypt => {
                if self.encrypted {
                    return false;
                }
                self.encrypted = true;
                true
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSourceFilter {
    pub source_type: Choice<DataSourceType>,
    pub status: Choice<DataSourceStatus>,
}

impl RecordFilter<DataSource> for DataSourceFilter {
    fn admits(&self, source: &DataSource) -> bool {
        self.source_type.admits(&source.source_type) && self.status.admits(&source.status)
    }

    fn is_active(&self) -> bool {
        !(self.source_type.is_all() && self.status.is_all())
    }
}

/// 種類別の集計
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeBreakdown {
    pub source_type: DataSourceType,
    pub count: usize,
    pub size_mb: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceSummary {
    pub total: usize,
    pub active: usize,
    pub total_size_mb: f64,
    pub total_records: u64,
    pub by_type: Vec<TypeBreakdown>,
}

impl DataSourceSummary {
    pub fn from_records(sources: &[DataSource]) -> Self {
        let by_type = DataSourceType::ALL
            .iter()
            .map(|&source_type| {
                let matching: Vec<&DataSource> =
                    sources.iter().filter(|s| s.source_type == source_type).collect();
                TypeBreakdown {
                    source_type,
                    count: matching.len(),
                    size_mb: matching.iter().map(|s| s.size_mb()).sum(),
                }
            })
            .collect();

        Self {
            total: sources.len(),
            active: sources.iter().filter(|s| s.status == DataSourceStatus::Active).count(),
            total_size_mb: sources.iter().map(|s| s.size_mb()).sum(),
            total_records: sources.iter().map(|s| s.records).sum(),
            by_type,
        }
    }
}

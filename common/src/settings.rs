//! 有効/無効を切り替える設定項目
//!
//! セキュリティポリシー・データポリシー・通知チャネル・通知ルールは
//! 一覧操作の対象ではなく、項目ごとに有効フラグを反転するだけの設定。
//!
//! ## 変更履歴
//! - 2026-10-18: 初期作成

use crate::error::Result;
use crate::kinds::notification::Channel;
use crate::timestamp::Timestamp;
use crate::types::{variant_enum, Severity};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 有効フラグを持つ設定項目
pub trait Setting: Clone + Serialize + DeserializeOwned {
    /// 設定の種類名（表示用）
    const TITLE: &'static str;
    const SEED_JSON: &'static str;

    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);
}

/// 指定IDの有効フラグを反転し、反転後の値を返す（見つからなければ None）
pub fn toggle<S: Setting>(items: &mut [S], id: &str) -> Option<bool> {
    let item = items.iter_mut().find(|item| item.id() == id)?;
    let enabled = !item.enabled();
    item.set_enabled(enabled);
    tracing::debug!(setting = S::TITLE, id, enabled, "設定切り替え");
    Some(enabled)
}

pub fn enabled_count<S: Setting>(items: &[S]) -> usize {
    items.iter().filter(|item| item.enabled()).count()
}

pub fn builtin<S: Setting>() -> Result<Vec<S>> {
    Ok(serde_json::from_str(S::SEED_JSON)?)
}

pub fn load<S: Setting>(path: &Path) -> Result<Vec<S>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save<S: Setting>(items: &[S], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, serde_json::to_string_pretty(items)?)?;
    Ok(())
}

variant_enum! {
    pub enum PolicyCategory {
        Authentication => "authentication",
        Authorization => "authorization",
        Data => "data",
        Network => "network",
        Monitoring => "monitoring",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRule {
    pub condition: String,
    pub action: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityPolicy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub enabled: bool,
    pub category: PolicyCategory,
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
    pub last_modified: Timestamp,
    #[serde(default)]
    pub modified_by: String,
}

variant_enum! {
    pub enum DataPolicyType {
        Retention => "retention",
        Backup => "backup",
        Archival => "archival",
        Deletion => "deletion",
        Encryption => "encryption",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPolicyRule {
    pub condition: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPolicy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub enabled: bool,
    #[serde(rename = "type")]
    pub policy_type: DataPolicyType,
    #[serde(default)]
    pub rules: Vec<DataPolicyRule>,
    pub last_modified: Timestamp,
    #[serde(default)]
    pub applies_to: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationChannel {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub channel_type: Channel,
    pub enabled: bool,
    /// チャネルごとの接続設定（表示専用）
    #[serde(default)]
    pub config: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleConditions {
    #[serde(default, rename = "type")]
    pub types: Vec<String>,
    #[serde(default, rename = "priority")]
    pub priorities: Vec<String>,
    #[serde(default, rename = "source")]
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSchedule {
    pub enabled: bool,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub days: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Throttling {
    pub enabled: bool,
    pub max_per_hour: u32,
    pub cooldown_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub enabled: bool,
    #[serde(default)]
    pub conditions: RuleConditions,
    /// 送信先チャネルのID
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub schedule: RuleSchedule,
    #[serde(default)]
    pub throttling: Throttling,
}

macro_rules! impl_setting {
    ($ty:ty, $title:literal, $file:literal) => {
        impl Setting for $ty {
            const TITLE: &'static str = $title;
            const SEED_JSON: &'static str = include_str!(concat!("../data/", $file));

            fn id(&self) -> &str {
                &self.id
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn enabled(&self) -> bool {
                self.enabled
            }

            fn set_enabled(&mut self, enabled: bool) {
                self.enabled = enabled;
            }
        }
    };
}

impl_setting!(SecurityPolicy, "Security Policies", "security_policies.json");
impl_setting!(DataPolicy, "Data Policies", "data_policies.json");
impl_setting!(NotificationChannel, "Notification Channels", "notification_channels.json");
impl_setting!(NotificationRule, "Notification Rules", "notification_rules.json");

/// 有効件数 / 全件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnabledCount {
    pub enabled: usize,
    pub total: usize,
}

impl EnabledCount {
    pub fn of<S: Setting>(items: &[S]) -> Self {
        Self {
            enabled: enabled_count(items),
            total: items.len(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsSummary {
    pub security_policies: EnabledCount,
    pub data_policies: EnabledCount,
    pub channels: EnabledCount,
    pub rules: EnabledCount,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_settings_parse() {
        let policies = builtin::<SecurityPolicy>().expect("セキュリティポリシー読み込み失敗");
        assert_eq!(policies.len(), 4);
        assert_eq!(policies[1].rules[1].severity, Severity::Critical);

        let data = builtin::<DataPolicy>().expect("データポリシー読み込み失敗");
        assert_eq!(data[2].rules[0].schedule.as_deref(), Some("daily_at_midnight"));
        assert_eq!(data[3].applies_to.len(), 3);

        let channels = builtin::<NotificationChannel>().expect("チャネル読み込み失敗");
        assert_eq!(channels[3].channel_type, Channel::Slack);

        let rules = builtin::<NotificationRule>().expect("ルール読み込み失敗");
        assert_eq!(rules[1].throttling.cooldown_minutes, 30);
        assert_eq!(rules[0].conditions.sources.len(), 2);
    }

    #[test]
    fn test_toggle_flips_only_target() {
        let mut channels = builtin::<NotificationChannel>().unwrap();
        assert_eq!(enabled_count(&channels), 3);

        assert_eq!(toggle(&mut channels, "slack"), Some(true));
        assert_eq!(enabled_count(&channels), 4);
        assert_eq!(toggle(&mut channels, "email"), Some(false));
        assert_eq!(toggle(&mut channels, "email"), Some(true));
        assert_eq!(enabled_count(&channels), 4);
    }

    #[test]
    fn test_toggle_unknown_id() {
        let mut rules = builtin::<NotificationRule>().unwrap();
        let before = rules.clone();
        assert_eq!(toggle(&mut rules, "99"), None);
        assert_eq!(rules, before);
    }

    #[test]
    fn test_enabled_count_of() {
        let mut policies = builtin::<SecurityPolicy>().unwrap();
        toggle(&mut policies, "4");
        assert_eq!(EnabledCount::of(&policies), EnabledCount { enabled: 3, total: 4 });
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/data_policies.json");
        let mut policies = builtin::<DataPolicy>().unwrap();
        toggle(&mut policies, "1");

        save(&policies, &path).expect("保存失敗");
        let loaded: Vec<DataPolicy> = load(&path).expect("読み込み失敗");
        assert_eq!(loaded, policies);
        assert!(!loaded[0].enabled);
    }
}

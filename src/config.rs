use crate::error::{HapoError, Result};
use hapo_intel_common::SelectionPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 実行者名を上書きする環境変数
pub const ACTOR_ENV: &str = "HAPO_INTEL_ACTOR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 状態遷移の実行者として記録する名前
    pub actor: String,
    pub live_interval_ms: u64,
    pub job_start_delay_ms: u64,
    pub job_tick_ms: u64,
    pub selection_policy: SelectionPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            actor: "Current User".into(),
            live_interval_ms: 2000,
            job_start_delay_ms: 1000,
            job_tick_ms: 500,
            selection_policy: SelectionPolicy::PruneHidden,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 設定ファイルを読み込む（存在しなければデフォルト）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| HapoError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("hapo-intel").join("config.json"))
    }

    fn validate(&self) -> Result<()> {
        if self.live_interval_ms == 0 || self.job_tick_ms == 0 {
            return Err(HapoError::Config("間隔は1ms以上を指定してください".into()));
        }
        Ok(())
    }

    /// 実行者名（環境変数を優先）
    pub fn effective_actor(&self) -> String {
        match std::env::var(ACTOR_ENV) {
            Ok(actor) if !actor.trim().is_empty() => actor.trim().to_string(),
            _ => self.actor.clone(),
        }
    }

    pub fn live_interval(&self) -> Duration {
        Duration::from_millis(self.live_interval_ms)
    }

    pub fn set_actor(&mut self, actor: String) -> Result<()> {
        if actor.trim().is_empty() {
            return Err(HapoError::InvalidArgument("実行者名が空です".into()));
        }
        self.actor = actor.trim().to_string();
        self.save()
    }

    pub fn set_selection_policy(&mut self, policy: SelectionPolicy) -> Result<()> {
        self.selection_policy = policy;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).expect("読み込み失敗");
        assert_eq!(config, Config::default());
        assert_eq!(config.actor, "Current User");
        assert_eq!(config.live_interval(), Duration::from_millis(2000));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"actor":"Ops","selection_policy":"keep"}"#).unwrap();

        let config = Config::load_from(&path).expect("読み込み失敗");
        assert_eq!(config.actor, "Ops");
        assert_eq!(config.selection_policy, SelectionPolicy::Keep);
        assert_eq!(config.job_tick_ms, 500);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            actor: "Night Shift".into(),
            live_interval_ms: 3000,
            ..Default::default()
        };
        config.save_to(&path).expect("保存失敗");
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"live_interval_ms":0}"#).unwrap();
        assert!(matches!(Config::load_from(&path), Err(HapoError::Config(_))));
    }
}

//! エクスポートジョブの作成と進捗シミュレーション
//!
//! 作成したジョブは pending で先頭に追加され、開始待ちの後に processing へ進む。
//! 以降は tick ごとに 0〜20% ずつ進み、100% で 1.0〜6.0 MB のファイルとして完了する。

use crate::config::Config;
use crate::error::{HapoError, Result};
use hapo_intel_common::kinds::export_job::{
    next_job_id, ExportJob, ExportRequest, ExportStatus, ExportTransition,
};
use hapo_intel_common::{Action, ActionContext, RecordListController, Timestamp};
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobTiming {
    pub start_delay: Duration,
    pub tick: Duration,
}

impl From<&Config> for JobTiming {
    fn from(config: &Config) -> Self {
        Self {
            start_delay: Duration::from_millis(config.job_start_delay_ms),
            tick: Duration::from_millis(config.job_tick_ms),
        }
    }
}

/// リクエストからジョブを作成して先頭に追加し、IDを返す
pub fn create_job(
    controller: &mut RecordListController<ExportJob>,
    request: &ExportRequest,
    now: Timestamp,
) -> Result<String> {
    let id = next_job_id(|candidate| controller.contains(candidate), now);
    let job = ExportJob::from_request(request, id.clone(), now)?;
    controller.insert_front(job)?;
    tracing::info!(%id, name = %request.name, "export job created");
    Ok(id)
}

fn job_not_found(id: &str) -> HapoError {
    HapoError::InvalidArgument(format!("ジョブが見つかりません: {}", id))
}

fn transition(
    controller: &mut RecordListController<ExportJob>,
    id: &str,
    step: ExportTransition,
    actor: &str,
) -> Result<f64> {
    let report = controller.apply(&[id], Action::Transition(step), &ActionContext::now(actor));
    if report.matched == 0 {
        return Err(job_not_found(id));
    }
    Ok(controller.get(id).map(|job| job.progress).unwrap_or_default())
}

pub fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);
    let template = "{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}";
    let style = ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    bar.set_style(style);
    bar
}

/// ジョブを完了まで進める
pub async fn run_job<G: Rng>(
    controller: &mut RecordListController<ExportJob>,
    id: &str,
    timing: JobTiming,
    actor: &str,
    rng: &mut G,
    bar: Option<&ProgressBar>,
) -> Result<ExportJob> {
    match controller.get(id) {
        None => return Err(job_not_found(id)),
        Some(job) if job.status != ExportStatus::Pending => {
            return Err(HapoError::InvalidArgument(format!(
                "開始できないジョブです: {} ({})",
                id, job.status
            )));
        }
        Some(_) => {}
    }

    if let Some(bar) = bar {
        bar.set_message("開始待ち");
    }
    tokio::time::sleep(timing.start_delay).await;
    transition(controller, id, ExportTransition::Start, actor)?;
    // 待機中に削除・失敗した場合は進めない
    match controller.get(id).map(|job| job.status) {
        Some(ExportStatus::Processing) => {}
        Some(status) => {
            return Err(HapoError::InvalidArgument(format!(
                "開始できないジョブです: {} ({})",
                id, status
            )));
        }
        None => return Err(job_not_found(id)),
    }
    tracing::info!(%id, "export job processing");
    if let Some(bar) = bar {
        bar.set_message("処理中");
    }

    loop {
        tokio::time::sleep(timing.tick).await;
        let delta = rng.gen_range(0.0..20.0);
        let progress = transition(controller, id, ExportTransition::Advance(delta), actor)?;
        if let Some(bar) = bar {
            bar.set_position(progress as u64);
        }
        if progress >= 100.0 {
            break;
        }
    }

    let size_mb = rng.gen_range(1.0..6.0);
    transition(controller, id, ExportTransition::Complete(size_mb), actor)?;
    let job = controller
        .get(id)
        .cloned()
        .ok_or_else(|| job_not_found(id))?;

    if let Some(bar) = bar {
        bar.finish_with_message(format!("完了 {}", job.file_size.as_deref().unwrap_or("-")));
    }
    tracing::info!(%id, size = ?job.file_size, "export job completed");
    Ok(job)
}

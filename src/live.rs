//! ライブ指標
//!
//! 一定間隔で現在の人数・車両数・平均速度を更新する。
//! 値は watch チャネルで配信し、最後に書かれた値だけが残る。
//! ハンドルを破棄するとタスクは停止する。

use anyhow::Context;
use rand::Rng;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveMetrics {
    pub current_people: u32,
    pub current_vehicles: u32,
    pub average_speed: u32,
}

impl LiveMetrics {
    pub fn initial() -> Self {
        Self {
            current_people: 47,
            current_vehicles: 23,
            average_speed: 58,
        }
    }

    pub fn random<G: Rng + ?Sized>(rng: &mut G) -> Self {
        Self {
            current_people: rng.gen_range(10..60),
            current_vehicles: rng.gen_range(5..30),
            average_speed: rng.gen_range(40..70),
        }
    }
}

/// 実行中のライブ更新タスク
pub struct LiveFeed {
    receiver: watch::Receiver<LiveMetrics>,
    live: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl LiveFeed {
    /// 更新タスクを起動（tokio ランタイム内で呼ぶこと）
    pub fn spawn(interval: Duration) -> Self {
        let (sender, receiver) = watch::channel(LiveMetrics::initial());
        let live = Arc::new(AtomicBool::new(true));
        let task_live = Arc::clone(&live);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // 初回の tick は即時に完了する
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if !task_live.load(Ordering::Relaxed) {
                    continue;
                }
                let metrics = LiveMetrics::random(&mut rand::thread_rng());
                if sender.send(metrics).is_err() {
                    tracing::debug!("live feed receivers dropped");
                    break;
                }
            }
        });

        tracing::debug!(interval_ms = interval.as_millis() as u64, "live feed started");

        Self {
            receiver,
            live,
            handle: Some(handle),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<LiveMetrics> {
        self.receiver.clone()
    }

    pub fn latest(&self) -> LiveMetrics {
        *self.receiver.borrow()
    }

    /// 更新の一時停止・再開
    pub fn set_live(&self, live: bool) {
        self.live.store(live, Ordering::Relaxed);
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Relaxed)
    }

    /// タスクを停止して終了を待つ
    pub async fn stop(mut self) -> anyhow::Result<()> {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            match handle.await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => {}
                Err(e) => return Err(e).context("live feed task failed"),
            }
        }
        tracing::debug!("live feed stopped");
        Ok(())
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

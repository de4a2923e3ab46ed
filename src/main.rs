use clap::Parser;
use hapo_intel::commands::{act, export_view, interactive, list};
use hapo_intel::{cli, config, dashboard, error, jobs, live, render, settings, with_record_kind};
use hapo_intel_common::kinds::export_job::{ExportFileFormat, ExportRequest};
use hapo_intel_common::kinds::ExportJob;
use hapo_intel_common::seed::builtin;
use hapo_intel_common::settings::{
    DataPolicy, NotificationChannel, NotificationRule, SecurityPolicy,
};
use hapo_intel_common::{RecordListController, Timestamp};
use cli::{Cli, Commands, SettingsSet};
use config::Config;
use error::{HapoError, Result};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::List { kind, filters, sort, seed } => {
            with_record_kind!(kind, list(seed.as_deref(), &filters, &sort, &config))?;
        }

        Commands::Act { kind, action, ids, filters, sort, seed, output } => {
            with_record_kind!(
                kind,
                act(&action, &ids, seed.as_deref(), &filters, &sort, output.as_deref(), &config)
            )?;
        }

        Commands::Summary { seed_dir } => {
            println!("📊 hapo-intel - ダッシュボード\n");
            let summary = dashboard::DashboardSummary::load(seed_dir.as_deref())?;
            render::print_summary(&summary);
        }

        Commands::Export { kind, filters, sort, seed, format, output, title } => {
            println!("📄 hapo-intel - エクスポート\n");
            with_record_kind!(
                kind,
                export_view(
                    seed.as_deref(),
                    &filters,
                    &sort,
                    format,
                    output.as_deref(),
                    title.as_deref(),
                    &config
                )
            )?;
            println!("\n✅ エクスポート完了");
        }

        Commands::Session { kind, seed, output } => {
            with_record_kind!(kind, interactive(seed.as_deref(), output.as_deref(), &config))?;
        }

        Commands::Live { ticks, interval_ms } => {
            let interval = interval_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.live_interval());
            if interval.is_zero() {
                let message = "間隔は1ms以上を指定してください".to_string();
                return Err(HapoError::InvalidArgument(message));
            }

            println!("📡 hapo-intel - ライブ指標（{}ms間隔）\n", interval.as_millis());
            let feed = live::LiveFeed::spawn(interval);
            let mut updates = feed.subscribe();

            for tick in 1..=ticks {
                if updates.changed().await.is_err() {
                    break;
                }
                let metrics = *updates.borrow_and_update();
                println!(
                    "[{}] {} 人数: {}  車両: {}  平均速度: {} km/h",
                    tick,
                    chrono::Local::now().format("%H:%M:%S"),
                    metrics.current_people,
                    metrics.current_vehicles,
                    metrics.average_speed
                );
            }

            feed.stop()
                .await
                .map_err(|e| HapoError::Interaction(format!("{:#}", e)))?;
        }

        Commands::Job { template, name, start, end, format, description, locations } => {
            println!("📦 hapo-intel - エクスポートジョブ\n");

            let format: Option<ExportFileFormat> = format
                .map(|f| f.parse())
                .transpose()
                .map_err(HapoError::InvalidArgument)?;
            let request = ExportRequest {
                template_id: template,
                name,
                description,
                start,
                end,
                format,
                locations,
                ..Default::default()
            };

            let mut jobs_list: RecordListController<ExportJob> =
                RecordListController::new(builtin::<ExportJob>()?)?;
            let id = jobs::create_job(&mut jobs_list, &request, Timestamp::now())?;
            println!("✔ ジョブを作成: {} ({})", request.name, id);

            let bar = jobs::progress_bar();
            let job = jobs::run_job(
                &mut jobs_list,
                &id,
                jobs::JobTiming::from(&config),
                &config.effective_actor(),
                &mut rand::thread_rng(),
                Some(&bar),
            )
            .await?;

            println!("\n✅ 完了: {}", job.download_url.as_deref().unwrap_or("-"));
        }

        Commands::Settings { set, toggle, seed, output } => {
            let seed = seed.as_deref();
            let output = output.as_deref();
            match set {
                SettingsSet::SecurityPolicies => {
                    settings::run::<SecurityPolicy>(seed, &toggle, output)?
                }
                SettingsSet::DataPolicies => settings::run::<DataPolicy>(seed, &toggle, output)?,
                SettingsSet::Channels => {
                    settings::run::<NotificationChannel>(seed, &toggle, output)?
                }
                SettingsSet::Rules => settings::run::<NotificationRule>(seed, &toggle, output)?,
            }
        }

        Commands::Config { set_actor, set_selection_policy, show } => {
            let mut config = config;

            if let Some(actor) = set_actor {
                config.set_actor(actor)?;
                println!("✔ 実行者を設定しました");
            }

            if let Some(policy) = set_selection_policy {
                config.set_selection_policy(policy)?;
                println!("✔ 選択の扱いを設定しました: {}", policy);
            }

            if show {
                println!("設定:");
                println!("  実行者: {}", config.effective_actor());
                println!("  ライブ更新間隔: {}ms", config.live_interval_ms);
                println!("  ジョブ開始待ち: {}ms", config.job_start_delay_ms);
                println!("  ジョブ進捗間隔: {}ms", config.job_tick_ms);
                println!("  選択の扱い: {}", config.selection_policy);
            }
        }
    }

    Ok(())
}

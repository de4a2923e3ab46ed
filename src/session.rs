//! 対話式の一覧操作
//!
//! 1画面分のコントローラを作成し、終了時に破棄する。
//!
//! ## 変更履歴
//! - 2026-10-18: 初期作成

use crate::dashboard::{apply_filter_pairs, parse_pairs, CliRecord};
use crate::error::{HapoError, Result};
use crate::render;
use dialoguer::Input;
use hapo_intel_common::{
    seed, Action, ActionContext, Record, RecordListController, SortDirection, SortKey,
};
use std::path::Path;

pub const HELP: &str = "\
  /語        検索（/ のみで解除）
  f k=v ...  フィルタ（f のみで解除、k=all で1項目解除）
  s KEY [asc|desc]  ソート（s のみで解除）
  x ID ...   選択を切り替え
  a          表示中をすべて選択
  c          選択を解除
  do ACTION  選択中に操作を適用
  v          一覧を表示
  ?          ヘルプ
  q          終了";

/// 対話コマンド
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Search(String),
    Filter(Vec<(String, String)>),
    ResetFilter,
    Sort(SortKey, SortDirection),
    ClearSort,
    Toggle(Vec<String>),
    SelectAll,
    ClearSelection,
    Do(String),
    View,
    Help,
    Quit,
}

impl SessionCommand {
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let trimmed = line.trim();
        if let Some(term) = trimmed.strip_prefix('/') {
            return Ok(SessionCommand::Search(term.trim().to_string()));
        }

        let mut words = trimmed.split_whitespace();
        let head = words.next().unwrap_or("");
        let rest: Vec<&str> = words.collect();

        match head {
            "" | "v" => Ok(SessionCommand::View),
            "?" | "h" => Ok(SessionCommand::Help),
            "q" | "Q" => Ok(SessionCommand::Quit),
            "a" => Ok(SessionCommand::SelectAll),
            "c" => Ok(SessionCommand::ClearSelection),
            "f" if rest.is_empty() => Ok(SessionCommand::ResetFilter),
            "f" => parse_pairs(&rest)
                .map(SessionCommand::Filter)
                .map_err(|e| e.to_string()),
            "s" => match rest.as_slice() {
                [] => Ok(SessionCommand::ClearSort),
                [key] => Ok(SessionCommand::Sort(key.parse()?, SortDirection::Descending)),
                [key, direction] => Ok(SessionCommand::Sort(key.parse()?, direction.parse()?)),
                _ => Err("使い方: s KEY [asc|desc]".to_string()),
            },
            "x" if rest.is_empty() => Err("使い方: x ID ...".to_string()),
            "x" => Ok(SessionCommand::Toggle(rest.iter().map(|s| s.to_string()).collect())),
            "do" => match rest.as_slice() {
                [action] => Ok(SessionCommand::Do(action.to_string())),
                _ => Err("使い方: do ACTION".to_string()),
            },
            _ => Err(format!("不明なコマンド: {}（? でヘルプ）", head)),
        }
    }
}

/// コマンド実行後の状態
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// 表示するメッセージ
    Continue(String),
    /// 一覧を再表示
    Refresh,
    Quit,
}

/// コマンドを1つ実行
pub fn execute<R: CliRecord>(
    controller: &mut RecordListController<R>,
    command: SessionCommand,
    actor: &str,
) -> Result<Outcome> {
    let outcome = match command {
        SessionCommand::Search(term) => {
            controller.set_search(term);
            Outcome::Refresh
        }
        SessionCommand::Filter(pairs) => {
            let mut filter = controller.query().filter.clone();
            apply_filter_pairs::<R, _, _>(&mut filter, &pairs)?;
            controller.set_categories(filter);
            Outcome::Refresh
        }
        SessionCommand::ResetFilter => {
            controller.set_categories(R::Filter::default());
            Outcome::Refresh
        }
        SessionCommand::Sort(key, direction) => {
            controller.set_sort(key, direction);
            Outcome::Refresh
        }
        SessionCommand::ClearSort => {
            controller.clear_sort();
            Outcome::Refresh
        }
        SessionCommand::Toggle(ids) => {
            let unknown: Vec<&str> = ids
                .iter()
                .map(String::as_str)
                .filter(|id| !controller.contains(id))
                .collect();
            for id in &ids {
                controller.toggle_selection(id);
            }
            if unknown.is_empty() {
                Outcome::Continue(format!("選択: {}", controller.selection().join(", ")))
            } else {
                Outcome::Continue(format!("不明なID: {}", unknown.join(", ")))
            }
        }
        SessionCommand::SelectAll => {
            controller.select_all_visible();
            Outcome::Continue(format!("{}件を選択", controller.selection().len()))
        }
        SessionCommand::ClearSelection => {
            controller.clear_selection();
            Outcome::Continue("選択を解除しました".to_string())
        }
        SessionCommand::Do(name) => {
            let action: Action<R::Transition> = name.parse().map_err(HapoError::InvalidArgument)?;
            if controller.selection().is_empty() {
                Outcome::Continue("選択がありません".to_string())
            } else {
                let report = controller.apply_to_selection(action, &ActionContext::now(actor));
                Outcome::Continue(render::format_report(&report))
            }
        }
        SessionCommand::View => Outcome::Refresh,
        SessionCommand::Help => Outcome::Continue(HELP.to_string()),
        SessionCommand::Quit => Outcome::Quit,
    };
    Ok(outcome)
}

/// 対話ループ
pub fn run_session<R: CliRecord>(
    mut controller: RecordListController<R>,
    actor: &str,
    output: Option<&Path>,
) -> Result<()> {
    println!("{}（? でヘルプ、q で終了）\n", R::TITLE);
    render::print_view(&controller);

    loop {
        let line: String = Input::new()
            .with_prompt(R::KIND)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| HapoError::Interaction(e.to_string()))?;

        let command = match SessionCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("  {}", message);
                continue;
            }
        };

        match execute(&mut controller, command, actor) {
            Ok(Outcome::Continue(message)) => println!("{}", message),
            Ok(Outcome::Refresh) => render::print_view(&controller),
            Ok(Outcome::Quit) => break,
            Err(e) => println!("  {}", e),
        }
    }

    if let Some(path) = output {
        seed::save(controller.records(), path)?;
        println!("✔ 保存しました: {}", path.display());
    }
    Ok(())
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HapoError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("JSON解析エラー: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Common(#[from] hapo_intel_common::Error),

    #[error("引数が不正です: {0}")]
    InvalidArgument(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("対話入力エラー: {0}")]
    Interaction(String),
}

pub type Result<T> = std::result::Result<T, HapoError>;

//! 定义了整个 `lyrics-timer` 库的错误类型 `LyricsTimerError`。

use std::io;
use thiserror::Error;

use crate::{converter::types::ConvertError, timing::types::TimingError};

/// `lyrics-timer` 库的通用错误枚举。
#[derive(Error, Debug)]
pub enum LyricsTimerError {
    /// 通用的 anyhow 错误
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    /// 时间轴估计失败
    #[error("时间轴估计失败: {0}")]
    Timing(#[from] TimingError),

    /// 歌词导入或导出失败
    #[error("歌词转换失败: {0}")]
    Convert(#[from] ConvertError),

    /// JSON 解析失败 (源自 `serde_json::Error`)
    #[error("JSON 解析失败: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// I/O 错误 (源自 `io::Error`)
    #[error("I/O 错误: {0}")]
    Io(#[from] io::Error),

    /// 调用方提供了无效的参数
    #[error("无效的输入: {0}")]
    InvalidInput(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),
}

/// `LyricsTimerError` 的 `Result` 类型别名，方便在函数签名中使用。
pub type Result<T> = std::result::Result<T, LyricsTimerError>;

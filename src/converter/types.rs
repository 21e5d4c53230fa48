//! 定义了歌词导入导出中使用的数据类型。

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::model::StyleSettings;

//=============================================================================
// 1. 错误枚举
//=============================================================================

/// 定义歌词导入导出过程中可能发生的错误。
#[derive(Error, Debug)]
pub enum ConvertError {
    /// 字符串格式化错误。
    #[error("格式错误: {0}")]
    Format(#[from] fmt::Error),
    /// 无效的时间值或时间格式字符串。
    #[error("无效的时间格式: {0}")]
    InvalidTime(String),
    /// 无效的歌词格式或样式值。
    #[error("无效的歌词格式: {0}")]
    InvalidLyricFormat(String),
    /// 内部逻辑错误或未明确分类的错误。
    #[error("错误: {0}")]
    Internal(String),
}

//=============================================================================
// 2. 格式枚举
//=============================================================================

/// 支持导出的歌词格式。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumString,
    EnumIter,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// 标准 LRC 格式。
    #[default]
    Lrc,
    /// `Advanced SubStation Alpha` 格式。
    Ass,
}

impl ExportFormat {
    /// 该格式对应的文件扩展名。
    #[must_use]
    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Lrc => "lrc",
            Self::Ass => "ass",
        }
    }
}

//=============================================================================
// 3. 生成选项
//=============================================================================

/// LRC 生成时，行结束时间标记 `[mm:ss.xxx]` 的输出方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LrcEndTimeOutputMode {
    /// [默认] 不输出任何结束时间标记
    #[default]
    Never,
    /// 为每一行歌词都输出一个结束时间标记
    Always,
    /// 仅在当前行与下一行的时间间隔超过阈值时，才输出结束标记
    OnLongPause {
        /// 触发输出的最小暂停时长（毫秒）
        threshold_ms: u64,
    },
}

/// LRC 生成选项
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LrcGenerationOptions {
    /// 控制行结束时间标记的输出方式
    pub end_time_output_mode: LrcEndTimeOutputMode,
    /// 写在文件头部的 `[ti:]` 标签
    pub title: Option<String>,
    /// 写在文件头部的 `[ar:]` 标签
    pub artist: Option<String>,
}

/// ASS 生成选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssGenerationOptions {
    /// 脚本的水平分辨率
    pub play_res_x: u32,
    /// 脚本的垂直分辨率
    pub play_res_y: u32,
    /// 写入 `[Script Info]` 的标题
    pub title: Option<String>,
}

impl Default for AssGenerationOptions {
    fn default() -> Self {
        Self {
            play_res_x: 1920,
            play_res_y: 1080,
            title: None,
        }
    }
}

/// 导出时使用的全部选项。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// LRC 生成选项
    pub lrc: LrcGenerationOptions,
    /// ASS 生成选项
    pub ass: AssGenerationOptions,
    /// 字幕样式，仅 ASS 使用
    pub style: StyleSettings,
}

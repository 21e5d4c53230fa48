#![warn(missing_docs)]

//! # Lyrics Timer RS
//!
//! 一个根据音频自动估计歌词时间轴的 Rust 库。
//!
//! ## 主要功能
//!
//! - **时间轴估计**: 计算音频的能量包络，检测人声区间，把歌词行分配到各个区间上。
//!   没有检测到人声时按总时长均分。
//! - **手动校正**: 合并用户对单行的校正，校正过的行置信度为 1.0。
//! - **整体调整**: 整体平移、缩放时间轴，或吸附到检测到的节拍上。
//! - **导入导出**: 导出为 LRC / ASS，从 LRC 导入。
//!
//! ## 估计时间轴
//!
//! ```rust
//! use lyrics_timer_rs::LyricsTimer;
//!
//! let timer = LyricsTimer::new();
//!
//! // 10 秒静音，找不到人声区间时按时长均分
//! let samples = vec![0.0_f32; 44_100 * 10];
//! let lines: Vec<String> = ["一行目", "二行目", "三行目", "四行目"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//!
//! let timed = timer.estimate(&samples, 44_100, &lines).unwrap();
//! assert_eq!(timed.len(), 4);
//! assert_eq!(timed[1].start_time, 2.5);
//! ```
//!
//! ## 校正与导出
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use lyrics_timer_rs::{
//!     LyricsTimer,
//!     converter::{ExportFormat, ExportOptions},
//!     model::LyricLine,
//!     timing::TimingCorrection,
//! };
//!
//! let timer = LyricsTimer::new();
//! let mut lines = vec![
//!     LyricLine::new("Hello", 0.0, 2.0, 0.3),
//!     LyricLine::new("World", 2.5, 4.0, 0.3),
//! ];
//!
//! let mut corrections = HashMap::new();
//! corrections.insert(0, TimingCorrection::start(1.2));
//! timer.apply_corrections(&mut lines, &corrections).unwrap();
//! assert_eq!(lines[0].confidence, 1.0);
//!
//! let lrc = timer
//!     .export(&lines, ExportFormat::Lrc, &ExportOptions::default())
//!     .unwrap();
//! assert_eq!(lrc, "[00:01.200]Hello\n[00:02.500]World\n");
//! ```
pub mod config;
pub mod converter;
pub mod error;
pub mod model;
pub mod project;
#[cfg(not(target_arch = "wasm32"))]
pub mod store;
pub mod timing;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

use tracing::info;

pub use crate::{
    error::{LyricsTimerError, Result},
    model::{LyricLine, StyleSettings},
    timing::{TimingOptions, TimingReport},
};

use crate::{
    converter::{ExportFormat, ExportOptions},
    model::AudioBuffer,
    timing::{TimingCorrections, TimingJob, beats, envelope, text::parse_lyrics_text},
};

// ==========================================================
//  顶层 API
// ==========================================================

/// 顶层时间轴工具，持有一份估计选项，为调用方提供统一、简单的接口。
///
/// 实例本身不保存任何分析状态，可以在多个文件、多个线程之间复用。
#[derive(Debug, Clone, Default)]
pub struct LyricsTimer {
    options: TimingOptions,
}

impl LyricsTimer {
    /// 使用默认选项创建一个新的实例。
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用自定义选项创建实例。选项会先经过校验。
    pub fn with_options(options: TimingOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// 从用户配置目录加载选项并创建实例。
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_config() -> Result<Self> {
        let options = config::load_timing_options()?;
        Ok(Self { options })
    }

    /// 当前使用的估计选项。
    pub fn options(&self) -> &TimingOptions {
        &self.options
    }

    /// 为歌词行估计时间轴，返回包含诊断信息的完整报告。
    pub fn analyze(&self, audio: &AudioBuffer<'_>, lines: &[String]) -> Result<TimingReport> {
        Ok(timing::estimate_timing(audio, lines, &self.options)?)
    }

    /// 为歌词行估计时间轴。
    ///
    /// # 参数
    /// * `samples` - 单声道采样，取值范围 `[-1, 1]`。
    /// * `sample_rate` - 采样率（Hz）。
    /// * `lines` - 按顺序排列的非空歌词文本。
    ///
    /// # 返回
    /// 与 `lines` 等长、同序的歌词行。
    pub fn estimate(
        &self,
        samples: &[f32],
        sample_rate: u32,
        lines: &[String],
    ) -> Result<Vec<LyricLine>> {
        let report = self.analyze(&AudioBuffer::new(samples, sample_rate), lines)?;
        Ok(report.lines)
    }

    /// 先把整段歌词文本按行拆分，再估计时间轴。
    ///
    /// 重新提交文本会得到一份全新的歌词行列表，之前的校正不会保留。
    pub fn estimate_text(
        &self,
        samples: &[f32],
        sample_rate: u32,
        text: &str,
    ) -> Result<Vec<LyricLine>> {
        let lines = parse_lyrics_text(text);
        info!("[LyricsTimer] 从文本中解析出 {} 行歌词", lines.len());
        self.estimate(samples, sample_rate, &lines)
    }

    /// 并行处理多个互不相关的任务，结果顺序与输入一致。
    pub fn estimate_batch(&self, jobs: &[TimingJob]) -> Vec<Result<TimingReport>> {
        timing::estimate_batch(jobs, &self.options)
            .into_iter()
            .map(|result| result.map_err(LyricsTimerError::from))
            .collect()
    }

    /// 合并手动校正，返回实际应用的校正数量。
    pub fn apply_corrections(
        &self,
        lines: &mut [LyricLine],
        corrections: &TimingCorrections,
    ) -> Result<usize> {
        Ok(timing::adjustment::apply_corrections(lines, corrections)?)
    }

    /// 检测音频中的节拍，并把未确认的行吸附到最近的节拍上。
    ///
    /// # 返回
    /// 被移动的行数。
    pub fn snap_to_beats(
        &self,
        samples: &[f32],
        sample_rate: u32,
        lines: &mut [LyricLine],
    ) -> Result<usize> {
        let audio = AudioBuffer::new(samples, sample_rate);
        let frames = envelope::compute_energy_envelope(&audio, &self.options)?;
        let beats = beats::detect_beats(&frames, self.options.threshold);
        Ok(beats::snap_to_beats(lines, &beats))
    }

    /// 将歌词行导出为指定格式的文本。
    pub fn export(
        &self,
        lines: &[LyricLine],
        format: ExportFormat,
        options: &ExportOptions,
    ) -> Result<String> {
        Ok(converter::export(lines, format, options)?)
    }

    /// 从 LRC 文本导入歌词行。
    pub fn import_lrc(&self, content: &str) -> Result<Vec<LyricLine>> {
        Ok(converter::import_lrc(content)?)
    }
}

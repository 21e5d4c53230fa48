//! 定义了时间轴估计中使用的核心数据类型。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    EnergySegment, LyricLine,
    lyric::{CONFIDENCE_LOW, CONFIDENCE_MEDIUM},
};

//=============================================================================
// 1. 错误枚举
//=============================================================================

/// 定义时间轴估计和调整过程中可能发生的各种错误。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimingError {
    /// 输入数据无法被分析，例如没有歌词行或没有音频样本。
    #[error("无效的输入: {0}")]
    InvalidInput(String),
    /// 手动校正会破坏时间轴的不变量。
    #[error("第 {index} 行的校正无效: {reason}")]
    InvalidCorrection {
        /// 校正对应的行号（从 0 开始）
        index: usize,
        /// 具体原因
        reason: String,
    },
    /// 内部逻辑错误。
    #[error("内部错误: {0}")]
    Internal(String),
}

//=============================================================================
// 2. 选项
//=============================================================================

/// 人声/静音判定所用的能量阈值策略。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ThresholdPolicy {
    /// 使用固定的能量阈值。
    Fixed(f64),
    /// 按每个音频的能量分布动态计算。
    ///
    /// 取升序排列后 `percentile` 处的能量值，再乘以 `multiplier`。
    Dynamic {
        /// 视为静音的帧所占比例 (0.0 ~ 1.0)。
        percentile: f64,
        /// 安全裕量系数。
        multiplier: f64,
    },
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::Dynamic {
            percentile: 0.3,
            multiplier: 1.5,
        }
    }
}

/// 控制时间轴估计流程的选项。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingOptions {
    /// 能量包络的窗口长度（毫秒），窗口之间不重叠。
    pub window_ms: f64,
    /// 能量阈值策略。
    pub threshold: ThresholdPolicy,
    /// 判定人声结束时向前查看的帧数（包含当前帧）。
    pub lookahead_frames: usize,
    /// 前瞻窗口内至少需要多少个静音帧才结束当前区间。
    pub min_silent_frames: usize,
    /// 未检测到人声、按总时长均分时，行尾留出的间隙（秒）。
    pub even_gap_secs: f64,
    /// 在人声区间内均分时，行尾留出的间隙（秒）。
    pub segment_gap_secs: f64,
    /// 均分结果使用的置信度。
    pub low_confidence: f64,
    /// 按人声区间分配的结果使用的置信度。
    pub medium_confidence: f64,
}

impl Default for TimingOptions {
    fn default() -> Self {
        Self {
            window_ms: 100.0,
            threshold: ThresholdPolicy::default(),
            lookahead_frames: 5,
            min_silent_frames: 3,
            even_gap_secs: 0.2,
            segment_gap_secs: 0.1,
            low_confidence: CONFIDENCE_LOW,
            medium_confidence: CONFIDENCE_MEDIUM,
        }
    }
}

impl TimingOptions {
    /// 检查选项是否自洽。
    pub fn validate(&self) -> Result<(), TimingError> {
        let invalid = |msg: String| Err(TimingError::InvalidInput(msg));

        if !self.window_ms.is_finite() || self.window_ms <= 0.0 {
            return invalid(format!("窗口长度必须为正数，当前为 {}", self.window_ms));
        }
        match self.threshold {
            ThresholdPolicy::Fixed(value) if !value.is_finite() || value < 0.0 => {
                return invalid(format!("固定阈值必须为非负数，当前为 {value}"));
            }
            ThresholdPolicy::Dynamic {
                percentile,
                multiplier,
            } => {
                if !(0.0..=1.0).contains(&percentile) {
                    return invalid(format!("百分位必须位于 [0, 1]，当前为 {percentile}"));
                }
                if !multiplier.is_finite() || multiplier < 0.0 {
                    return invalid(format!("阈值系数必须为非负数，当前为 {multiplier}"));
                }
            }
            ThresholdPolicy::Fixed(_) => {}
        }
        if self.lookahead_frames == 0 {
            return invalid("前瞻帧数不能为 0".to_string());
        }
        if self.min_silent_frames == 0 || self.min_silent_frames > self.lookahead_frames {
            return invalid(format!(
                "最少静音帧数必须位于 [1, {}]，当前为 {}",
                self.lookahead_frames, self.min_silent_frames
            ));
        }
        for (name, gap) in [
            ("均分间隙", self.even_gap_secs),
            ("区间间隙", self.segment_gap_secs),
        ] {
            if !gap.is_finite() || gap < 0.0 {
                return invalid(format!("{name}必须为非负数，当前为 {gap}"));
            }
        }
        for (name, confidence) in [
            ("低置信度", self.low_confidence),
            ("中置信度", self.medium_confidence),
        ] {
            if !(0.0..1.0).contains(&confidence) {
                return invalid(format!("{name}必须位于 [0, 1)，当前为 {confidence}"));
            }
        }
        Ok(())
    }

    /// 按采样率换算出每个窗口包含的样本数，至少为 1。
    #[must_use]
    pub fn window_size_samples(&self, sample_rate: u32) -> usize {
        let size = (f64::from(sample_rate) * self.window_ms / 1000.0).round();
        (size as usize).max(1)
    }
}

//=============================================================================
// 3. 手动校正
//=============================================================================

/// 用户对单行时间轴的校正。未提供的边界保持原值。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingCorrection {
    /// 新的开始时间（秒）
    pub start_time: Option<f64>,
    /// 新的结束时间（秒）
    pub end_time: Option<f64>,
}

impl TimingCorrection {
    /// 只校正开始时间。
    #[must_use]
    pub fn start(start_time: f64) -> Self {
        Self {
            start_time: Some(start_time),
            end_time: None,
        }
    }

    /// 只校正结束时间。
    #[must_use]
    pub fn end(end_time: f64) -> Self {
        Self {
            start_time: None,
            end_time: Some(end_time),
        }
    }

    /// 同时校正开始和结束时间。
    #[must_use]
    pub fn both(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time: Some(start_time),
            end_time: Some(end_time),
        }
    }
}

/// 行号到校正的稀疏映射。
pub type TimingCorrections = HashMap<usize, TimingCorrection>;

//=============================================================================
// 4. 输入与输出
//=============================================================================

/// 一次独立的估计任务，用于批量处理。
#[derive(Debug, Clone)]
pub struct TimingJob {
    /// 单声道样本
    pub samples: Vec<f32>,
    /// 采样率 (Hz)
    pub sample_rate: u32,
    /// 歌词行
    pub lines: Vec<String>,
}

/// 时间轴的分配方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionMode {
    /// 未检测到人声，按总时长均分。
    Even,
    /// 按检测到的人声区间分配。
    Segments,
}

/// 一次完整估计的结果，除歌词行外还带有诊断信息。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingReport {
    /// 带时间轴的歌词行
    pub lines: Vec<LyricLine>,
    /// 检测到的人声区间
    pub segments: Vec<EnergySegment>,
    /// 实际使用的能量阈值
    pub threshold: f64,
    /// 实际使用的分配方式
    pub mode: DistributionMode,
    /// 音频总时长（秒）
    pub duration_secs: f64,
}

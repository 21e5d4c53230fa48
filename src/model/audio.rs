//! 音频分析过程中使用的数据结构。

use serde::{Deserialize, Serialize};

/// 一段已解码的单声道 PCM 音频。
///
/// 只借用样本数据，分析结束后不会保留。
#[derive(Debug, Clone, Copy)]
pub struct AudioBuffer<'a> {
    /// 振幅样本，通常位于 `[-1, 1]`
    pub samples: &'a [f32],
    /// 采样率 (Hz)
    pub sample_rate: u32,
}

impl<'a> AudioBuffer<'a> {
    /// 创建一个新的音频缓冲区视图。
    pub fn new(samples: &'a [f32], sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// 音频总时长（秒）。采样率为 0 时返回 0。
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// 能量包络中的一帧。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyFrame {
    /// 帧起点（秒）
    pub timestamp: f64,
    /// 帧内平均绝对振幅
    pub energy: f64,
}

/// 一段被判定为人声的连续时间区间。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergySegment {
    /// 区间开始（秒）
    pub start: f64,
    /// 区间结束（秒）
    pub end: f64,
}

impl EnergySegment {
    /// 区间时长（秒）。
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

//! 带时间轴的歌词行模型。

use serde::{Deserialize, Serialize};

/// 由启发式算法估计出的行在均分时使用的置信度。
pub const CONFIDENCE_LOW: f64 = 0.3;
/// 由人声区间推导出的行使用的置信度。
pub const CONFIDENCE_MEDIUM: f64 = 0.7;
/// 用户确认过的行的置信度。
pub const CONFIDENCE_CONFIRMED: f64 = 1.0;

/// 一行带时间轴的歌词。
///
/// 时间单位均为秒。序列化为 `startTime` / `endTime` 等驼峰字段，
/// 与编辑器保存的 `lyrics-data.json` 保持一致。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricLine {
    /// 歌词文本
    pub text: String,
    /// 开始显示的时间（秒）
    pub start_time: f64,
    /// 结束显示的时间（秒）
    pub end_time: f64,
    /// 时间轴的可信程度，范围 `[0, 1]`
    #[serde(default)]
    pub confidence: f64,
}

/// 一行歌词时间轴所处的状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimingState {
    /// 尚未分配时间。
    Unset,
    /// 由算法估计，置信度小于 1。
    Estimated,
    /// 已由用户确认。
    Confirmed,
}

impl LyricLine {
    /// 创建一个新的歌词行。
    pub fn new(text: impl Into<String>, start_time: f64, end_time: f64, confidence: f64) -> Self {
        Self {
            text: text.into(),
            start_time,
            end_time,
            confidence,
        }
    }

    /// 行的显示时长（秒）。
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// 根据时间和置信度推断该行当前所处的状态。
    #[must_use]
    pub fn state(&self) -> TimingState {
        if self.confidence >= CONFIDENCE_CONFIRMED {
            TimingState::Confirmed
        } else if self.end_time <= self.start_time {
            TimingState::Unset
        } else {
            TimingState::Estimated
        }
    }

    /// 该行是否已被用户确认。
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.state() == TimingState::Confirmed
    }

    /// 判断给定时间点是否落在该行的显示区间内（两端均包含）。
    #[must_use]
    pub fn contains(&self, time: f64) -> bool {
        self.start_time <= time && time <= self.end_time
    }
}

/// 返回在 `time` 时刻应当显示的第一行歌词。
pub fn active_line_at(lines: &[LyricLine], time: f64) -> Option<(usize, &LyricLine)> {
    lines.iter().enumerate().find(|(_, line)| line.contains(time))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        let unset = LyricLine::new("a", 0.0, 0.0, 0.0);
        assert_eq!(unset.state(), TimingState::Unset);

        let estimated = LyricLine::new("a", 1.0, 2.0, CONFIDENCE_MEDIUM);
        assert_eq!(estimated.state(), TimingState::Estimated);
        assert!(!estimated.is_confirmed());

        let confirmed = LyricLine::new("a", 1.0, 2.0, CONFIDENCE_CONFIRMED);
        assert_eq!(confirmed.state(), TimingState::Confirmed);
    }

    #[test]
    fn test_active_line_bounds_are_inclusive() {
        let lines = vec![
            LyricLine::new("a", 1.0, 2.0, CONFIDENCE_LOW),
            LyricLine::new("b", 2.5, 4.0, CONFIDENCE_LOW),
        ];

        assert_eq!(active_line_at(&lines, 1.0).map(|(i, _)| i), Some(0));
        assert_eq!(active_line_at(&lines, 2.0).map(|(i, _)| i), Some(0));
        assert!(active_line_at(&lines, 2.2).is_none());
        assert_eq!(active_line_at(&lines, 4.0).map(|(i, _)| i), Some(1));
        assert!(active_line_at(&lines, 0.5).is_none());
    }

    #[test]
    fn test_serializes_with_camel_case_fields() {
        let line = LyricLine::new("守りたいもの", 1.0, 4.0, 1.0);
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["startTime"], 1.0);
        assert_eq!(json["endTime"], 4.0);

        let parsed: LyricLine =
            serde_json::from_str(r#"{"text":"x","startTime":1.5,"endTime":2.0,"isSet":true}"#)
                .unwrap();
        assert_eq!(parsed.start_time, 1.5);
        assert_eq!(parsed.confidence, 0.0);
    }
}

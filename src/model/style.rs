//! 歌词字幕的样式设置。
//!
//! 这里只描述样式数据本身，具体的渲染与动画插值由外部合成器负责。

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// 默认使用的明朝体字体栈。
pub const DEFAULT_FONT_FAMILY: &str = "'Shippori Mincho', 'しっぽり明朝', 'Hiragino Mincho ProN', 'ヒラギノ明朝 ProN', serif";

/// 字幕在画面中的垂直位置。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TextPosition {
    /// 顶部
    Top,
    /// 居中
    Center,
    /// 底部
    #[default]
    Bottom,
}

/// 歌词出现与消失的动画风格。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AnimationStyle {
    /// 淡入淡出
    #[default]
    Fade,
    /// 滑入
    Slide,
    /// 缩放
    Scale,
    /// 弹跳
    Bounce,
    /// 打字机
    Typewriter,
    /// 模糊
    Blur,
    /// 旋转
    Rotate,
    /// 波浪
    Wave,
}

/// 发光效果强度。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GlowEffect {
    /// 无发光
    #[default]
    None,
    /// 弱
    Weak,
    /// 柔和
    Soft,
    /// 强
    Strong,
    /// 霓虹
    Neon,
    /// 脉冲
    Pulse,
    /// 彩虹
    Rainbow,
}

/// 文本换行策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextWrap {
    /// 不换行
    Nowrap,
    /// 总是换行
    Wrap,
    /// 自动
    #[default]
    Auto,
}

/// 字幕样式设置。
///
/// 字段名与编辑器的 JSON 一致。缺失的字段使用默认值，
/// 所以旧版本保存的文件也能直接读取。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleSettings {
    /// CSS 字体栈
    pub font_family: String,
    /// 字号（像素）
    pub font_size: u32,
    /// 字重，如 "normal"、"bold"、"700"
    pub font_weight: String,
    /// 文字颜色，`#RRGGBB`
    pub font_color: String,
    /// 描边颜色，`#RRGGBB`
    pub stroke_color: String,
    /// 描边宽度（像素）
    pub stroke_width: f64,
    /// 垂直位置
    pub position: TextPosition,
    /// 相对于位置基准的纵向偏移（像素）
    pub y_offset: f64,
    /// 动画风格
    pub animation_style: AnimationStyle,
    /// 动画时长（秒）
    pub fade_speed: f64,
    /// 发光效果
    pub glow_effect: GlowEffect,
    /// 发光颜色
    pub glow_color: Option<String>,
    /// 换行策略
    pub text_wrap: TextWrap,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: 48,
            font_weight: "normal".to_string(),
            font_color: "#FFFFFF".to_string(),
            stroke_color: "#000000".to_string(),
            stroke_width: 2.0,
            position: TextPosition::Bottom,
            y_offset: 0.0,
            animation_style: AnimationStyle::Fade,
            fade_speed: 0.5,
            glow_effect: GlowEffect::None,
            glow_color: None,
            text_wrap: TextWrap::Auto,
        }
    }
}

impl StyleSettings {
    /// 字重是否应被视为粗体。
    #[must_use]
    pub fn is_bold(&self) -> bool {
        match self.font_weight.as_str() {
            "bold" => true,
            other => other.parse::<u32>().is_ok_and(|w| w >= 600),
        }
    }

    /// 返回字体栈中的第一个字体名，去掉引号。
    #[must_use]
    pub fn primary_font(&self) -> &str {
        self.font_family
            .split(',')
            .next()
            .map(|f| f.trim().trim_matches(|c| c == '\'' || c == '"'))
            .filter(|f| !f.is_empty())
            .unwrap_or("Arial")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_style_uses_defaults() {
        let style: StyleSettings =
            serde_json::from_str(r#"{"fontSize":64,"position":"top"}"#).unwrap();
        assert_eq!(style.font_size, 64);
        assert_eq!(style.position, TextPosition::Top);
        assert_eq!(style.font_color, "#FFFFFF");
        assert_eq!(style.animation_style, AnimationStyle::Fade);
    }

    #[test]
    fn test_primary_font_and_weight() {
        let style = StyleSettings {
            font_weight: "700".to_string(),
            ..Default::default()
        };
        assert_eq!(style.primary_font(), "Shippori Mincho");
        assert!(style.is_bold());
        assert!(!StyleSettings::default().is_bold());
    }

    #[test]
    fn test_position_parses_case_insensitively() {
        assert_eq!("CENTER".parse::<TextPosition>().unwrap(), TextPosition::Center);
    }
}

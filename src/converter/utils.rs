//! 导入导出共用的小工具。

use crate::converter::types::ConvertError;

/// 将秒转换为毫秒，四舍五入。负数按 0 处理。
pub fn secs_to_ms(secs: f64) -> Result<u64, ConvertError> {
    if !secs.is_finite() {
        return Err(ConvertError::InvalidTime(format!("{secs}")));
    }
    Ok((secs.max(0.0) * 1000.0).round() as u64)
}

/// 将毫秒转换为秒。
pub fn ms_to_secs(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

/// 将 `#RRGGBB` 颜色转换为 ASS 使用的 `&HAABBGGRR` 形式（不透明）。
pub fn css_color_to_ass(color: &str) -> Result<String, ConvertError> {
    let hex = color.trim().trim_start_matches('#');
    let expanded = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => hex.to_string(),
        _ => {
            return Err(ConvertError::InvalidLyricFormat(format!(
                "无效的颜色值 '{color}'"
            )));
        }
    };
    if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConvertError::InvalidLyricFormat(format!(
            "无效的颜色值 '{color}'"
        )));
    }

    let (r, rest) = expanded.split_at(2);
    let (g, b) = rest.split_at(2);
    Ok(format!("&H00{b}{g}{r}").to_uppercase())
}

//! ASS 格式生成器

use std::fmt::Write;

use crate::{
    converter::{
        types::{AssGenerationOptions, ConvertError},
        utils::{css_color_to_ass, secs_to_ms},
    },
    model::{
        LyricLine, StyleSettings,
        style::{AnimationStyle, TextPosition},
    },
};

/// 样式与画面边缘之间的基础距离（像素）。
const BASE_MARGIN: f64 = 10.0;

/// 将毫秒时间格式化为 ASS 时间字符串 `H:MM:SS.CS` (小时:分钟:秒.厘秒)。
fn format_ass_time(ms: u64) -> String {
    let total_cs = (ms + 5) / 10; // 四舍五入到厘秒
    let cs = total_cs % 100;
    let total_seconds = total_cs / 100;
    let seconds = total_seconds % 60;
    let total_minutes = total_seconds / 60;
    let minutes = total_minutes % 60;
    let hours = total_minutes / 60;
    format!("{hours}:{minutes:02}:{seconds:02}.{cs:02}")
}

/// 位置对应的小键盘对齐值。
fn alignment_for(position: TextPosition) -> u8 {
    match position {
        TextPosition::Bottom => 2,
        TextPosition::Center => 5,
        TextPosition::Top => 8,
    }
}

/// 根据位置和纵向偏移计算 `MarginV`。偏移为正表示向下移动。
fn vertical_margin(style: &StyleSettings) -> u32 {
    let margin = match style.position {
        TextPosition::Bottom => BASE_MARGIN - style.y_offset,
        TextPosition::Top => BASE_MARGIN + style.y_offset,
        TextPosition::Center => BASE_MARGIN,
    };
    margin.max(0.0).round() as u32
}

/// 淡入淡出标签，仅在动画风格为淡入淡出时生成。
fn fade_tag(style: &StyleSettings) -> String {
    if style.animation_style != AnimationStyle::Fade
        || !style.fade_speed.is_finite()
        || style.fade_speed <= 0.0
    {
        return String::new();
    }
    let fade_ms = (style.fade_speed * 1000.0).round() as u64;
    format!("{{\\fad({fade_ms},{fade_ms})}}")
}

/// 转义会被 ASS 当作控制序列的字符。
fn escape_ass_text(text: &str) -> String {
    text.trim()
        .replace('{', "｛")
        .replace('}', "｝")
        .replace("\r\n", "\\N")
        .replace('\n', "\\N")
}

fn write_style_line(output: &mut String, style: &StyleSettings) -> Result<(), ConvertError> {
    let primary = css_color_to_ass(&style.font_color)?;
    let outline = css_color_to_ass(&style.stroke_color)?;
    let bold = if style.is_bold() { -1 } else { 0 };
    let outline_width = style.stroke_width.max(0.0);

    writeln!(
        output,
        "Style: Default,{},{},{primary},&H000000FF,{outline},&H99000000,{bold},0,0,0,100,100,0,0,1,{outline_width},0,{},10,10,{},1",
        style.primary_font(),
        style.font_size,
        alignment_for(style.position),
        vertical_margin(style),
    )?;
    Ok(())
}

/// ASS 生成的主入口函数。
pub fn generate_ass(
    lines: &[LyricLine],
    style: &StyleSettings,
    options: &AssGenerationOptions,
) -> Result<String, ConvertError> {
    let mut ass_content = String::with_capacity(lines.len() * 80 + 1024);

    // --- [Script Info] 部分 ---
    writeln!(ass_content, "[Script Info]")?;
    if let Some(title) = &options.title {
        writeln!(ass_content, "Title: {}", title.trim())?;
    }
    writeln!(ass_content, "ScriptType: v4.00+")?;
    writeln!(ass_content, "PlayResX: {}", options.play_res_x)?;
    writeln!(ass_content, "PlayResY: {}", options.play_res_y)?;
    writeln!(ass_content)?;

    // --- [V4+ Styles] 部分 ---
    writeln!(ass_content, "[V4+ Styles]")?;
    writeln!(
        ass_content,
        "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding"
    )?;
    write_style_line(&mut ass_content, style)?;
    writeln!(ass_content)?;

    // --- [Events] 部分 ---
    writeln!(ass_content, "[Events]")?;
    writeln!(
        ass_content,
        "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text"
    )?;

    let fade = fade_tag(style);
    for line in lines {
        let text = escape_ass_text(&line.text);
        if text.is_empty() {
            continue;
        }
        writeln!(
            ass_content,
            "Dialogue: 0,{},{},Default,,0,0,0,,{fade}{text}",
            format_ass_time(secs_to_ms(line.start_time)?),
            format_ass_time(secs_to_ms(line.end_time)?),
        )?;
    }

    Ok(ass_content)
}

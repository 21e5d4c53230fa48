//! 歌词文本的预处理工具。

use unicode_segmentation::UnicodeSegmentation;

/// 规范化文本中的空白字符
pub fn normalize_text_whitespace(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    trimmed.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// 将用户粘贴的整段歌词拆分为行。
///
/// 每行去除首尾空白并合并连续空白，空行会被丢弃。
pub fn parse_lyrics_text(text: &str) -> Vec<String> {
    text.lines()
        .map(normalize_text_whitespace)
        .filter(|line| !line.is_empty())
        .collect()
}

/// 截取文本的前 `max_graphemes` 个字素用于日志展示，被截断时追加 `...`。
pub fn preview_text(text: &str, max_graphemes: usize) -> String {
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(max_graphemes).collect();
    if graphemes.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

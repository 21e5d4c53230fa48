//! 歌词生成器模块

pub mod ass_generator;
pub mod lrc_generator;

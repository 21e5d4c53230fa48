//! 编辑器状态的显式容器，带发布/订阅。
//!
//! 每个需要状态的组件持有同一个 [`LyricsStore`] 的克隆，
//! 修改通过 [`LyricsStore::update`] 广播给所有订阅者。

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use crate::{
    model::{LyricLine, StyleSettings},
    project::LyricsProject,
};

/// 编辑器当前的完整状态。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    /// 歌词行
    pub lyrics: Vec<LyricLine>,
    /// 字幕样式
    pub style_settings: StyleSettings,
    /// 音频文件路径
    pub audio_file: Option<String>,
    /// 背景图片路径
    pub background_image: Option<String>,
    /// 最后一次修改的时间（Unix 毫秒）
    pub last_updated: i64,
}

impl EditorState {
    /// 提取可以保存为工程文件的部分。
    #[must_use]
    pub fn to_project(&self) -> LyricsProject {
        LyricsProject {
            lyrics: self.lyrics.clone(),
            style: self.style_settings.clone(),
        }
    }
}

/// 可在多个组件之间共享的编辑器状态句柄。
#[derive(Debug, Clone)]
pub struct LyricsStore {
    sender: Arc<watch::Sender<EditorState>>,
}

impl Default for LyricsStore {
    fn default() -> Self {
        Self::new(EditorState::default())
    }
}

impl LyricsStore {
    /// 以给定的初始状态创建一个新的存储。
    pub fn new(initial: EditorState) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// 从工程文件内容创建存储。
    pub fn from_project(project: LyricsProject) -> Self {
        Self::new(EditorState {
            lyrics: project.lyrics,
            style_settings: project.style,
            ..Default::default()
        })
    }

    /// 获取当前状态的副本。
    #[must_use]
    pub fn snapshot(&self) -> EditorState {
        self.sender.borrow().clone()
    }

    /// 订阅状态变化。返回的接收端立即可以读到最新状态。
    pub fn subscribe(&self) -> watch::Receiver<EditorState> {
        self.sender.subscribe()
    }

    /// 修改状态，刷新修改时间并通知所有订阅者。
    pub fn update<F>(&self, mutate: F)
    where
        F: FnOnce(&mut EditorState),
    {
        self.sender.send_modify(|state| {
            mutate(state);
            state.last_updated = Utc::now().timestamp_millis();
        });
        debug!(
            "[Store] 状态已更新，当前订阅者 {} 个",
            self.sender.receiver_count()
        );
    }

    /// 整体替换歌词行。
    pub fn set_lyrics(&self, lyrics: Vec<LyricLine>) {
        self.update(|state| state.lyrics = lyrics);
    }
}

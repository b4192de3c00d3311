// ==========================================
// 历史库 CSV 批量清洗工具 - 批次日志
// ==========================================
// 职责: 面向用户的处理日志（每文件一组 + 每个异常分组一条）
// 说明: 与 tracing 诊断日志相互独立, 由调用方展示
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 日志条目类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogKind {
    FileCleaned,      // 文件清洗成功
    FileFailed,       // 文件整体失败
    GroupSkipped,     // 分组解析失败, 已跳过
    GroupRowsDropped, // 分组内存在无法解析的时间戳, 已剔除
    BatchFailed,      // 批次级失败（无可用结果）
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub kind: LogKind,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.kind {
            LogKind::FileCleaned => "✅",
            LogKind::FileFailed | LogKind::BatchFailed => "❌",
            LogKind::GroupSkipped | LogKind::GroupRowsDropped => "⚠️",
        };
        write!(f, "{} {}", marker, self.message)
    }
}

/// 有序日志
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchLog {
    entries: Vec<LogEntry>,
}

impl BatchLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: LogKind, message: impl Into<String>) {
        self.entries.push(LogEntry {
            kind,
            message: message.into(),
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// 指定类别的条目数
    pub fn count(&self, kind: LogKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    /// 渲染为文本行
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

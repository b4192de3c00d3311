// ==========================================
// 历史库 CSV 批量清洗工具 - 领域模型层
// ==========================================
// 职责: 单元格 / 宽表 / 文件集 / 批次日志 / 选项类型
// 红线: 不含文件读写, 不含清洗与合并逻辑
// ==========================================

pub mod batch_log;
pub mod cell;
pub mod table;
pub mod types;

// 重导出核心类型
pub use batch_log::{BatchLog, LogEntry, LogKind};
pub use cell::Cell;
pub use table::{MergeKey, ProcessedFileSet, WideRow, WideTable, DATETIME_COLUMN};
pub use types::{Interval, OutputFormat, OutputMode};

// ==========================================
// 历史库 CSV 批量清洗工具 - 合并层错误类型
// ==========================================

use crate::domain::OutputMode;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("没有可合并的已清洗文件（输出模式: {mode}）")]
    EmptyFileSet { mode: OutputMode },
}

/// Result 类型别名
pub type AggregateResult<T> = Result<T, AggregateError>;

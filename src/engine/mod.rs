// ==========================================
// 历史库 CSV 批量清洗工具 - 合并引擎层
// ==========================================
// 职责: 宽表合并（单文件外连接 / 跨文件拼接）
//       按输出模式生成待导出的文件与 sheet 计划
// ==========================================

pub mod aggregator;
pub mod error;
pub mod join;

// 重导出
pub use aggregator::{
    combine, derive_output_stem, Aggregator, ArtifactPlan, SheetPlan, MASTER_SHEET_NAME,
};
pub use error::{AggregateError, AggregateResult};
pub use join::{concat_first_wins, fold_outer_join, outer_join};

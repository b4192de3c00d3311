// ==========================================
// 历史库 CSV 批量清洗工具 - 应用层
// ==========================================
// 职责: 串联导入 / 合并 / 导出, 对外提供一次批处理入口
// ==========================================

pub mod batch;

pub use batch::{BatchContext, BatchError, BatchResult, UploadedFile};

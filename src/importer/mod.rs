// ==========================================
// 历史库 CSV 批量清洗工具 - 导入层
// ==========================================
// 职责: 原始导出文件 → 单文件宽表
// 支持: 历史库 CSV 导出（每 4 列一个位号分组）
// ==========================================

// 模块声明
pub mod column_dedup;
pub mod error;
pub mod extractor;
pub mod file_parser;
pub mod name_simplifier;
pub mod timestamp;

// 重导出核心类型
pub use column_dedup::dedup_column_names;
pub use error::{ImportError, ImportResult};
pub use extractor::{Extractor, GroupSeries};
pub use file_parser::{RawExport, GROUP_WIDTH};
pub use name_simplifier::{simplify_cell, simplify_name, NameRule, NAME_RULES};
pub use timestamp::{grid_step, normalize, parse_timestamp, parse_timestamp_cell};

// ==========================================
// 历史库 CSV 批量清洗工具 - 核心库
// ==========================================
// 输入: 历史库导出的原始 CSV（每 4 列一个位号分组）
// 输出: 按时间对齐的宽表, CSV / Excel, 单文件或 ZIP
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 单元格 / 宽表 / 批次日志 / 选项类型
pub mod domain;

// 导入层 - 原始导出解析与单文件提取
pub mod importer;

// 引擎层 - 宽表合并与导出计划
pub mod engine;

// 导出层 - CSV / Excel / ZIP
pub mod exporter;

// 配置层
pub mod config;

// 日志系统
pub mod logging;

// 应用层 - 批处理入口
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    BatchLog, Cell, Interval, LogEntry, LogKind, OutputFormat, OutputMode, ProcessedFileSet,
    WideRow, WideTable,
};

// 导入
pub use importer::{Extractor, ImportError, RawExport};

// 引擎
pub use engine::{AggregateError, Aggregator, ArtifactPlan};

// 导出
pub use exporter::{ExportError, OutputBundle, OutputFile, OutputSerializer};

// 配置
pub use config::CleanerConfig;

// 应用
pub use app::{BatchContext, BatchError, UploadedFile};

// ==========================================
// 版本信息
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "历史库 CSV 批量清洗工具";

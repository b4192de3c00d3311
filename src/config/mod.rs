// ==========================================
// 历史库 CSV 批量清洗工具 - 配置层
// ==========================================
// 职责: 批处理参数的默认值 / 文件加载 / 校验
// 存储: JSON 文件（可选）
// ==========================================

pub mod cleaner_config;

pub use cleaner_config::{CleanerConfig, ConfigError, ConfigResult, DEFAULT_BASE_NAME};

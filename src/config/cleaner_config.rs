// ==========================================
// 历史库 CSV 批量清洗工具 - 清洗配置
// ==========================================
// 职责: 一次批处理的全部可调参数
// 来源: 默认值 < JSON 配置文件 < 命令行参数
// ==========================================

use crate::domain::{Interval, OutputFormat, OutputMode};
use crate::exporter::{DEFAULT_ARCHIVE_NAME, DEFAULT_COLUMN_WIDTH};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// 合并模式默认输出名
pub const DEFAULT_BASE_NAME: &str = "Combined_File";

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("配置文件格式错误: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("配置项无效 {field}: {message}")]
    InvalidValue { field: String, message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 清洗配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// 输出格式（csv / xlsx）
    pub format: OutputFormat,

    /// 输出模式
    pub mode: OutputMode,

    /// 时间粒度
    pub interval: Interval,

    /// 合并模式输出名（不含扩展名）
    pub base_name: String,

    /// 多文件 ZIP 名
    pub archive_name: String,

    /// Excel 列宽
    pub column_width: f64,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            mode: OutputMode::default(),
            interval: Interval::default(),
            base_name: DEFAULT_BASE_NAME.to_string(),
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
            column_width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

impl CleanerConfig {
    /// 从 JSON 文件加载（缺省字段取默认值）并校验
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: CleanerConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.base_name.trim().is_empty() {
            return Err(invalid("base_name", "不能为空"));
        }
        if self.archive_name.trim().is_empty() {
            return Err(invalid("archive_name", "不能为空"));
        }
        if !(self.column_width.is_finite() && self.column_width > 0.0) {
            return Err(invalid(
                "column_width",
                &format!("必须为正数, 实际为 {}", self.column_width),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
}

// ==========================================
// 历史库 CSV 批量清洗工具 - 领域类型定义
// ==========================================
// 职责: 时间粒度 / 输出格式 / 输出模式
// 序列化格式: kebab-case (与配置文件、命令行一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 时间粒度 (Rounding Interval)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Interval {
    #[default]
    #[serde(alias = "15m", alias = "15-minute")]
    FifteenMinute, // 就近取整到 15 分钟, 并补齐网格
    #[serde(alias = "1m", alias = "1-minute")]
    OneMinute, // 向下截断到整分钟, 不补齐
}

impl Interval {
    /// 是否需要补齐连续时间网格
    pub fn fills_gaps(self) -> bool {
        matches!(self, Interval::FifteenMinute)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interval::FifteenMinute => write!(f, "15-minute"),
            Interval::OneMinute => write!(f, "1-minute"),
        }
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "15-minute" | "15m" | "15min" | "15" => Ok(Interval::FifteenMinute),
            "1-minute" | "1m" | "1min" | "1" => Ok(Interval::OneMinute),
            other => Err(format!("未知时间粒度: {}（可选 15-minute / 1-minute）", other)),
        }
    }
}

// ==========================================
// 输出格式 (Output Format)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Csv,
    #[default]
    #[serde(alias = "spreadsheet")]
    Xlsx,
}

impl OutputFormat {
    /// 输出文件扩展名（不含点）
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "xlsx" | "spreadsheet" | "excel" => Ok(OutputFormat::Xlsx),
            other => Err(format!("未知输出格式: {}（可选 csv / xlsx）", other)),
        }
    }
}

// ==========================================
// 输出模式 (Output Mode)
// ==========================================
// 四种模式互斥
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    #[default]
    Separate,                // 每个文件单独输出
    CombinedSeparateSheets,  // 合并为一个文件, 每个源文件一个 sheet
    CombinedMasterSheet,     // 合并为一个文件, 仅总表
    CombinedMasterAndSheets, // 合并为一个文件, 总表 + 各源文件 sheet
}

impl OutputMode {
    /// 是否需要生成总表
    pub fn includes_master(self) -> bool {
        matches!(
            self,
            OutputMode::CombinedMasterSheet | OutputMode::CombinedMasterAndSheets
        )
    }

    /// 是否需要逐文件 sheet
    pub fn includes_file_sheets(self) -> bool {
        !matches!(self, OutputMode::CombinedMasterSheet)
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Separate => write!(f, "separate"),
            OutputMode::CombinedSeparateSheets => write!(f, "combined-separate-sheets"),
            OutputMode::CombinedMasterSheet => write!(f, "combined-master-sheet"),
            OutputMode::CombinedMasterAndSheets => write!(f, "combined-master-and-sheets"),
        }
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "separate" => Ok(OutputMode::Separate),
            "combined-separate-sheets" | "sheets" => Ok(OutputMode::CombinedSeparateSheets),
            "combined-master-sheet" | "master" => Ok(OutputMode::CombinedMasterSheet),
            "combined-master-and-sheets" | "master-and-sheets" => {
                Ok(OutputMode::CombinedMasterAndSheets)
            }
            other => Err(format!(
                "未知输出模式: {}（可选 separate / combined-separate-sheets / combined-master-sheet / combined-master-and-sheets）",
                other
            )),
        }
    }
}

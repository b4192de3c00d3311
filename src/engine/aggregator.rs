// ==========================================
// 历史库 CSV 批量清洗工具 - 多文件合并器
// ==========================================
// 职责: ProcessedFileSet + 输出模式 → 导出计划
// 模式:
//   Separate                 每个文件一个输出, 一个 sheet
//   CombinedSeparateSheets   一个输出, 每个文件一个 sheet
//   CombinedMasterSheet      一个输出, 仅总表
//   CombinedMasterAndSheets  一个输出, 总表 + 每个文件一个 sheet
// ==========================================

use crate::domain::{OutputMode, ProcessedFileSet, WideTable};
use crate::engine::error::{AggregateError, AggregateResult};
use crate::engine::join::concat_first_wins;
use crate::importer::column_dedup::dedup_column_names;
use std::borrow::Cow;
use tracing::{debug, info};

/// 总表 sheet 名
pub const MASTER_SHEET_NAME: &str = "Master Sheet";

/// 单文件输出名后缀
const FILTERED_SUFFIX: &str = "_FILTERED";

// ==========================================
// 导出计划
// ==========================================

/// 单个 sheet 计划（名称未截断, 由导出层处理）
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPlan<'a> {
    pub name: String,
    pub table: Cow<'a, WideTable>,
}

/// 单个输出文件计划（不含扩展名）
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPlan<'a> {
    pub file_stem: String,
    pub sheets: Vec<SheetPlan<'a>>,
}

impl<'a> ArtifactPlan<'a> {
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

// ==========================================
// 对外函数
// ==========================================

/// 由源文件名派生输出文件名主干
///
/// 去掉末尾的 `.csv` / `.CSV`, 追加 `_FILTERED`
pub fn derive_output_stem(source_name: &str) -> String {
    let stem = source_name
        .strip_suffix(".csv")
        .or_else(|| source_name.strip_suffix(".CSV"))
        .unwrap_or(source_name);
    format!("{}{}", stem, FILTERED_SUFFIX)
}

/// 生成总表（CombinedTable）
///
/// # 规则
/// - 按上传顺序纵向拼接全部宽表
/// - 重复 datetime 保留最先出现的整行
/// - 升序排序, 列名去重
pub fn combine(files: &ProcessedFileSet) -> WideTable {
    let mut combined = concat_first_wins(files.tables());
    let header = dedup_column_names(&combined.header());
    combined.rename_columns(header[1..].to_vec());
    combined
}

// ==========================================
// Aggregator - 多文件合并器
// ==========================================
#[derive(Debug, Clone)]
pub struct Aggregator {
    mode: OutputMode,
    base_name: String, // 合并模式下的输出名
}

impl Aggregator {
    pub fn new(mode: OutputMode, base_name: impl Into<String>) -> Self {
        Self {
            mode,
            base_name: base_name.into(),
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// 生成导出计划
    ///
    /// # 返回
    /// - Ok: 按输出顺序排列的文件计划
    /// - Err(EmptyFileSet): 没有任何已清洗文件
    pub fn plan<'a>(&self, files: &'a ProcessedFileSet) -> AggregateResult<Vec<ArtifactPlan<'a>>> {
        if files.is_empty() {
            return Err(AggregateError::EmptyFileSet { mode: self.mode });
        }

        let plans = match self.mode {
            OutputMode::Separate => files
                .iter()
                .map(|(name, table)| ArtifactPlan {
                    file_stem: derive_output_stem(name),
                    sheets: vec![SheetPlan {
                        name: name.to_string(),
                        table: Cow::Borrowed(table),
                    }],
                })
                .collect(),
            mode => {
                let mut sheets = Vec::new();
                if mode.includes_master() {
                    let master = combine(files);
                    debug!(rows = master.len(), columns = master.width(), "总表生成完成");
                    sheets.push(SheetPlan {
                        name: MASTER_SHEET_NAME.to_string(),
                        table: Cow::Owned(master),
                    });
                }
                if mode.includes_file_sheets() {
                    sheets.extend(files.iter().map(|(name, table)| SheetPlan {
                        name: name.to_string(),
                        table: Cow::Borrowed(table),
                    }));
                }
                vec![ArtifactPlan {
                    file_stem: self.base_name.clone(),
                    sheets,
                }]
            }
        };

        info!(
            mode = %self.mode,
            files = files.len(),
            artifacts = plans.len(),
            "导出计划生成完成"
        );
        Ok(plans)
    }
}

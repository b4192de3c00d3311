// ==========================================
// 历史库 CSV 批量清洗工具 - 输出序列化
// ==========================================
// 职责: 导出计划 + 输出格式 → OutputBundle
// 命名:
//   Xlsx  每个计划一个 <stem>.xlsx
//   Csv   单 sheet 计划 <stem>.csv; 多 sheet 计划每个 sheet 一个 <stem>_<sheet>.csv
// 输入只读, 不修改任何宽表
// ==========================================

use crate::domain::OutputFormat;
use crate::engine::ArtifactPlan;
use crate::exporter::archive::{OutputBundle, OutputFile};
use crate::exporter::csv_writer::write_csv;
use crate::exporter::error::ExportResult;
use crate::exporter::xlsx_writer::{write_workbook, DEFAULT_COLUMN_WIDTH};
use crate::importer::dedup_column_names;
use tracing::{info, instrument};

// ==========================================
// OutputSerializer
// ==========================================
#[derive(Debug, Clone)]
pub struct OutputSerializer {
    format: OutputFormat,
    column_width: f64,
}

impl OutputSerializer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            column_width: DEFAULT_COLUMN_WIDTH,
        }
    }

    pub fn with_column_width(mut self, column_width: f64) -> Self {
        self.column_width = column_width;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// 渲染全部导出计划
    #[instrument(skip(self, plans), fields(format = %self.format, artifacts = plans.len()))]
    pub fn render(&self, plans: &[ArtifactPlan<'_>]) -> ExportResult<OutputBundle> {
        let mut files = Vec::new();
        for plan in plans {
            match self.format {
                OutputFormat::Xlsx => {
                    let bytes = write_workbook(&plan.sheets, self.column_width)?;
                    files.push(OutputFile::new(
                        format!("{}.{}", plan.file_stem, self.format.extension()),
                        bytes,
                    ));
                }
                OutputFormat::Csv if plan.sheets.len() == 1 => {
                    let bytes = write_csv(&plan.sheets[0].table)?;
                    files.push(OutputFile::new(
                        format!("{}.{}", plan.file_stem, self.format.extension()),
                        bytes,
                    ));
                }
                OutputFormat::Csv => {
                    for sheet in &plan.sheets {
                        files.push(OutputFile::new(
                            format!(
                                "{}_{}.{}",
                                plan.file_stem,
                                csv_sheet_stem(&sheet.name),
                                self.format.extension()
                            ),
                            write_csv(&sheet.table)?,
                        ));
                    }
                }
            }
        }

        // 同名输出（如 a.csv 与 a.CSV）追加序号
        let stems: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
        let unique = unique_file_names(&stems);
        for (file, name) in files.iter_mut().zip(unique) {
            file.file_name = name;
        }

        info!(files = files.len(), "输出序列化完成");
        Ok(OutputBundle::from_files(files))
    }
}

/// 多 sheet CSV 的文件名片段: 去掉 .csv 后缀, 空格与路径分隔符替换为 '_'
fn csv_sheet_stem(sheet_name: &str) -> String {
    let stem = sheet_name
        .strip_suffix(".csv")
        .or_else(|| sheet_name.strip_suffix(".CSV"))
        .unwrap_or(sheet_name);
    stem.chars()
        .map(|c| if c.is_whitespace() || c == '/' || c == '\\' { '_' } else { c })
        .collect()
}

fn unique_file_names(names: &[&str]) -> Vec<String> {
    let (stems, extensions): (Vec<&str>, Vec<&str>) = names
        .iter()
        .map(|name| name.rsplit_once('.').unwrap_or((*name, "")))
        .unzip();
    dedup_column_names(&stems)
        .into_iter()
        .zip(extensions)
        .map(|(stem, ext)| {
            if ext.is_empty() {
                stem
            } else {
                format!("{}.{}", stem, ext)
            }
        })
        .collect()
}

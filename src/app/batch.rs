// ==========================================
// 历史库 CSV 批量清洗工具 - 批处理流程
// ==========================================
// 职责: 上传文件 → 逐文件提取 → 合并 → 序列化
// 约束:
//   - 单线程, 按上传顺序处理
//   - 单文件/单分组失败只记录日志, 不中断批次
//   - 每次运行前清空上一次的结果
// ==========================================

use crate::config::CleanerConfig;
use crate::domain::{BatchLog, LogKind, ProcessedFileSet};
use crate::engine::{AggregateError, Aggregator};
use crate::exporter::{ExportError, OutputBundle, OutputSerializer};
use crate::importer::{Extractor, ImportResult};
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

/// 批次错误类型
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("合并失败: {0}")]
    Aggregate(#[from] AggregateError),

    #[error("导出失败: {0}")]
    Export(#[from] ExportError),
}

pub type BatchResult<T> = Result<T, BatchError>;

// ==========================================
// UploadedFile - 上传文件
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// 从磁盘读取, 文件名取路径最后一段
    pub fn from_path<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

// ==========================================
// BatchContext - 单次运行上下文
// ==========================================
#[derive(Debug, Clone)]
pub struct BatchContext {
    config: CleanerConfig,
    log: BatchLog,
    files: ProcessedFileSet,
}

impl BatchContext {
    pub fn new(config: CleanerConfig) -> Self {
        Self {
            config,
            log: BatchLog::new(),
            files: ProcessedFileSet::new(),
        }
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    pub fn log(&self) -> &BatchLog {
        &self.log
    }

    pub fn processed(&self) -> &ProcessedFileSet {
        &self.files
    }

    /// 执行一次完整批处理
    ///
    /// # 返回
    /// - Ok(OutputBundle): 至少一个文件清洗成功
    /// - Err(Aggregate): 没有任何文件清洗成功
    /// - Err(Export): 序列化失败
    ///
    /// 无论成败, 过程记录都保留在 `log()` 中
    #[instrument(skip(self, uploads), fields(files = uploads.len(), mode = %self.config.mode))]
    pub fn run(&mut self, uploads: &[UploadedFile]) -> BatchResult<OutputBundle> {
        self.log.clear();
        self.files.clear();

        for upload in uploads {
            self.process_file(upload);
        }

        let aggregator = Aggregator::new(self.config.mode, self.config.base_name.clone());
        let plans = match aggregator.plan(&self.files) {
            Ok(plans) => plans,
            Err(e) => {
                error!(error = %e, "批次失败");
                self.log.push(LogKind::BatchFailed, e.to_string());
                return Err(e.into());
            }
        };

        let serializer = OutputSerializer::new(self.config.format)
            .with_column_width(self.config.column_width);
        let bundle = match serializer.render(&plans) {
            Ok(bundle) => bundle,
            Err(e) => {
                error!(error = %e, "导出失败");
                self.log.push(LogKind::BatchFailed, format!("导出失败: {}", e));
                return Err(e.into());
            }
        };

        info!(
            cleaned = self.files.len(),
            failed = self.log.count(LogKind::FileFailed),
            outputs = bundle.len(),
            "批次完成"
        );
        Ok(bundle)
    }

    /// 清洗单个文件, 成功则并入结果集
    pub fn process_file(&mut self, upload: &UploadedFile) {
        let extractor = Extractor::new(self.config.interval);
        match extractor.extract_bytes(&upload.name, &upload.bytes, &mut self.log) {
            Ok(table) => {
                info!(file = %upload.name, rows = table.len(), "文件清洗成功");
                self.log
                    .push(LogKind::FileCleaned, format!("{} 清洗成功。", upload.name));
                self.files.insert(upload.name.clone(), table);
            }
            Err(e) => {
                warn!(file = %upload.name, error = %e, "文件清洗失败");
                self.log.push(LogKind::FileFailed, e.to_string());
            }
        }
    }
}

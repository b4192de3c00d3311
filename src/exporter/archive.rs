// ==========================================
// 历史库 CSV 批量清洗工具 - 输出包
// ==========================================
// 职责: 一次导出的结果容器
//   Single   恰好一个输出文件, 直接交付
//   Multiple 多个输出文件, 交付前打包为 ZIP
// ==========================================

use crate::exporter::error::ExportResult;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// 默认 ZIP 文件名
pub const DEFAULT_ARCHIVE_NAME: &str = "Cleaned_Files.zip";

/// 单个输出文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl OutputFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// 写入目录, 返回完整路径
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> ExportResult<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// 一次导出的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputBundle {
    Single(OutputFile),
    Multiple(Vec<OutputFile>),
}

impl OutputBundle {
    pub fn from_files(mut files: Vec<OutputFile>) -> Self {
        if files.len() == 1 {
            if let Some(file) = files.pop() {
                return OutputBundle::Single(file);
            }
        }
        OutputBundle::Multiple(files)
    }

    pub fn files(&self) -> &[OutputFile] {
        match self {
            OutputBundle::Single(file) => std::slice::from_ref(file),
            OutputBundle::Multiple(files) => files,
        }
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.files().iter().map(|f| f.file_name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.files().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files().is_empty()
    }

    /// 交付形态: 单文件原样返回, 多文件打包为 ZIP
    pub fn into_deliverable(self, archive_name: &str) -> ExportResult<OutputFile> {
        match self {
            OutputBundle::Single(file) => Ok(file),
            OutputBundle::Multiple(files) => {
                Ok(OutputFile::new(archive_name, pack_zip(&files)?))
            }
        }
    }
}

/// 打包为 ZIP（条目顺序与输入一致, 时间戳固定）
pub fn pack_zip(files: &[OutputFile]) -> ExportResult<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    for file in files {
        zip.start_file(file.file_name.as_str(), options)?;
        zip.write_all(&file.bytes)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

// ==========================================
// 历史库 CSV 批量清洗工具 - 导出层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导出模块错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV 写出失败: {0}")]
    CsvWriteError(String),

    #[error("CSV 回读失败: {0}")]
    CsvReadError(String),

    #[error("Excel 写出失败: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    #[error("ZIP 打包失败: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("单元格超出表格范围: {0}")]
    OutOfRange(String),

    #[error("文件写入失败: {0}")]
    IoError(#[from] std::io::Error),
}

// 实现 From<csv::Error>
impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::CsvWriteError(err.to_string())
    }
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;

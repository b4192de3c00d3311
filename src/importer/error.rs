// ==========================================
// 历史库 CSV 批量清洗工具 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分级: 分组级（可恢复, 跳过该组）/ 文件级（可恢复, 跳过该文件）
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("文件 {file} 无可用数据: {message}")]
    FileParseError { file: String, message: String },

    // ===== 分组相关错误 =====
    #[error("分组 {group} 解析失败: {message}")]
    GroupParseError { group: usize, message: String },
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

// ==========================================
// 历史库 CSV 批量清洗工具 - 导出层
// ==========================================
// 职责: 导出计划 → CSV / Excel 字节 → 输出包（可打包 ZIP）
// ==========================================

pub mod archive;
pub mod csv_writer;
pub mod error;
pub mod serializer;
pub mod xlsx_writer;

pub use archive::{pack_zip, OutputBundle, OutputFile, DEFAULT_ARCHIVE_NAME};
pub use csv_writer::{parse_cleaned_csv, write_csv, CSV_DATETIME_FORMAT};
pub use error::{ExportError, ExportResult};
pub use serializer::OutputSerializer;
pub use xlsx_writer::{
    sanitize_sheet_name, unique_sheet_names, write_workbook, DATETIME_NUM_FORMAT,
    DEFAULT_COLUMN_WIDTH, MAX_SHEET_NAME_LEN,
};

// ==========================================
// 历史库 CSV 批量清洗工具 - CSV 写出 / 回读
// ==========================================
// 职责: WideTable → CSV 字节（无样式）
//       已清洗 CSV → WideTable（回读校验用）
// 格式: 表头 datetime,<位号...>; 时间 YYYY-MM-DD HH:MM:SS; 空值为空串
// ==========================================

use crate::domain::{Cell, WideRow, WideTable, DATETIME_COLUMN};
use crate::exporter::error::{ExportError, ExportResult};
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, Writer};

/// CSV 中 datetime 列的格式
pub const CSV_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 写出单表 CSV
pub fn write_csv(table: &WideTable) -> ExportResult<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(table.header())?;

    for row in table.rows() {
        let record = std::iter::once(row.datetime.format(CSV_DATETIME_FORMAT).to_string())
            .chain(row.values.iter().map(Cell::to_string));
        writer.write_record(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::CsvWriteError(e.to_string()))
}

/// 回读已清洗的 CSV
///
/// # 返回
/// - Ok(WideTable): 首列必须为 datetime
/// - Err(CsvReadError): 表头不符或时间无法解析
pub fn parse_cleaned_csv(bytes: &[u8]) -> ExportResult<WideTable> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| ExportError::CsvReadError(e.to_string()))?
        .clone();
    let mut fields = headers.iter();
    if fields.next() != Some(DATETIME_COLUMN) {
        return Err(ExportError::CsvReadError(format!(
            "首列应为 {}",
            DATETIME_COLUMN
        )));
    }
    let columns: Vec<String> = fields.map(str::to_string).collect();

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| ExportError::CsvReadError(e.to_string()))?;
        let raw_datetime = record.get(0).unwrap_or_default();
        let datetime = NaiveDateTime::parse_from_str(raw_datetime, CSV_DATETIME_FORMAT)
            .map_err(|e| {
                ExportError::CsvReadError(format!("第 {} 行时间无法解析 ({}): {}", idx + 2, raw_datetime, e))
            })?;
        rows.push(WideRow::new(
            datetime,
            record.iter().skip(1).map(Cell::parse).collect(),
        ));
    }

    Ok(WideTable::from_parts(columns, rows))
}

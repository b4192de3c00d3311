// ==========================================
// 历史库 CSV 批量清洗工具 - Excel 工作簿写出
// ==========================================
// 职责: 一组 SheetPlan → 单个 .xlsx 字节
// 约束:
//   - sheet 名非法字符替换为 '_', 截断到 31 字符, 工作簿内唯一
//   - 所有列统一列宽
//   - datetime 列使用日期时间数字格式
//   - 文档创建时间固定, 相同输入产生相同字节
// ==========================================

use crate::domain::{Cell, WideTable};
use crate::engine::SheetPlan;
use crate::exporter::error::{ExportError, ExportResult};
use chrono::{Datelike, NaiveDateTime, Timelike};
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook, Worksheet};
use std::collections::HashSet;
use tracing::debug;

/// Excel sheet 名长度上限
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// 默认列宽
pub const DEFAULT_COLUMN_WIDTH: f64 = 31.0;

/// datetime 单元格显示格式
pub const DATETIME_NUM_FORMAT: &str = "m/d/yyyy h:mm:ss AM/PM";

const INVALID_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

// ==========================================
// sheet 名处理
// ==========================================

/// 单个 sheet 名合法化（替换非法字符 + 截断）
pub fn sanitize_sheet_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if INVALID_SHEET_CHARS.contains(&c) { '_' } else { c })
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim_matches('\'').to_string();
    if cleaned.trim().is_empty() {
        "Sheet".to_string()
    } else {
        cleaned
    }
}

/// 一组 sheet 名合法化, 并保证工作簿内唯一（Excel 不区分大小写）
pub fn unique_sheet_names<S: AsRef<str>>(raw_names: &[S]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut result = Vec::with_capacity(raw_names.len());

    for raw in raw_names {
        let base = sanitize_sheet_name(raw.as_ref());
        let mut candidate = base.clone();
        let mut k = 2usize;
        while taken.contains(&candidate.to_lowercase()) {
            let suffix = format!("_{}", k);
            let keep = MAX_SHEET_NAME_LEN.saturating_sub(suffix.chars().count());
            candidate = base.chars().take(keep).collect::<String>() + &suffix;
            k += 1;
        }
        taken.insert(candidate.to_lowercase());
        result.push(candidate);
    }

    result
}

// ==========================================
// 工作簿写出
// ==========================================

/// 写出工作簿
///
/// # 参数
/// - sheets: 按顺序写出的 sheet
/// - column_width: 统一列宽
pub fn write_workbook(sheets: &[SheetPlan<'_>], column_width: f64) -> ExportResult<Vec<u8>> {
    let mut workbook = Workbook::new();

    // 固定创建时间
    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    let properties = DocProperties::new().set_creation_datetime(&created);
    workbook.set_properties(&properties);

    let datetime_format = Format::new().set_num_format(DATETIME_NUM_FORMAT);
    let names = unique_sheet_names(&sheets.iter().map(|s| s.name.as_str()).collect::<Vec<_>>());

    for (sheet, name) in sheets.iter().zip(names) {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&name)?;
        write_sheet(worksheet, &sheet.table, &datetime_format, column_width)?;
        debug!(sheet = %name, rows = sheet.table.len(), "sheet 写出完成");
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_sheet(
    worksheet: &mut Worksheet,
    table: &WideTable,
    datetime_format: &Format,
    column_width: f64,
) -> ExportResult<()> {
    let header = table.header();
    for (col, name) in header.iter().enumerate() {
        let col = column_number(col)?;
        worksheet.write_string(0, col, name)?;
        worksheet.set_column_width(col, column_width)?;
    }

    for (idx, row) in table.rows().iter().enumerate() {
        let row_num = row_number(idx + 1)?;
        worksheet.write_datetime_with_format(
            row_num,
            0,
            &excel_datetime(&row.datetime)?,
            datetime_format,
        )?;

        for (offset, value) in row.values.iter().enumerate() {
            let col = column_number(offset + 1)?;
            match value {
                Cell::Number(n) => {
                    worksheet.write_number(row_num, col, *n)?;
                }
                Cell::Text(s) => {
                    worksheet.write_string(row_num, col, s)?;
                }
                Cell::Missing => {}
            }
        }
    }

    Ok(())
}

fn excel_datetime(dt: &NaiveDateTime) -> ExportResult<ExcelDateTime> {
    let year = u16::try_from(dt.year())
        .map_err(|_| ExportError::OutOfRange(format!("年份 {} 无法写入 Excel", dt.year())))?;
    let seconds = f64::from(dt.second()) + f64::from(dt.nanosecond()) / 1_000_000_000.0;
    let value = ExcelDateTime::from_ymd(year, dt.month() as u8, dt.day() as u8)?.and_hms(
        dt.hour() as u16,
        dt.minute() as u8,
        seconds,
    )?;
    Ok(value)
}

fn column_number(col: usize) -> ExportResult<u16> {
    u16::try_from(col).map_err(|_| ExportError::OutOfRange(format!("列号 {}", col)))
}

fn row_number(row: usize) -> ExportResult<u32> {
    u32::try_from(row).map_err(|_| ExportError::OutOfRange(format!("行号 {}", row)))
}

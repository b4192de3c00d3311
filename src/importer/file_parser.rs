// ==========================================
// 历史库 CSV 批量清洗工具 - 原始导出解析器
// ==========================================
// 职责: CSV 字节流 → RawExport（Cell 网格）
// 规则: 丢弃原始第 0 行与第 2 行（元数据行）
//       剩余第 0 行为位号表头, 其后为数据行
// ==========================================

use crate::domain::Cell;
use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 需要丢弃的原始行号
const DISCARDED_ROWS: [usize; 2] = [0, 2];

/// 每个位号占用的列数
pub const GROUP_WIDTH: usize = 4;

// ==========================================
// RawExport - 原始导出网格
// ==========================================
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawExport {
    rows: Vec<Vec<Cell>>, // rows[0] 为位号表头
}

impl RawExport {
    /// 由已丢弃元数据行的网格直接构造
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// 从 CSV 读取器解析
    ///
    /// # 返回
    /// - Ok(RawExport): 至少包含表头行
    /// - Err(CsvParseError): 非法 CSV / 非 UTF-8 / 无表头行
    pub fn from_reader<R: Read>(reader: R) -> ImportResult<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(reader);

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            if DISCARDED_ROWS.contains(&row_idx) {
                continue;
            }
            rows.push(record.iter().map(Cell::parse).collect());
        }

        if rows.is_empty() {
            return Err(ImportError::CsvParseError("缺少位号表头行".to_string()));
        }

        Ok(Self { rows })
    }

    pub fn from_bytes(bytes: &[u8]) -> ImportResult<Self> {
        Self::from_reader(bytes)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// 最大列数（各行长度可能不同）
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// 分组数（按 4 列一组向上取整）
    pub fn group_count(&self) -> usize {
        self.column_count().div_ceil(GROUP_WIDTH)
    }

    /// 数据行数（不含表头）
    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// 读取单元格; 越界视为 Missing
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        static MISSING: Cell = Cell::Missing;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&MISSING)
    }

    /// 表头行中的位号单元格
    pub fn header_cell(&self, col: usize) -> &Cell {
        self.cell(0, col)
    }

    /// 数据区中某一列的全部单元格
    pub fn data_column(&self, col: usize) -> impl Iterator<Item = &Cell> + '_ {
        (1..self.rows.len()).map(move |row| self.cell(row, col))
    }

    /// 该列在任意数据行中是否存在（区分“空值”与“缺列”）
    pub fn has_column(&self, col: usize) -> bool {
        self.rows.iter().any(|r| col < r.len())
    }
}

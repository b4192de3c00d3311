// ==========================================
// 历史库 CSV 批量清洗工具 - 宽表与文件集
// ==========================================
// 职责: WideTable（datetime 主键 + 每个位号一列）
//       ProcessedFileSet（文件名 → WideTable, 保持上传顺序）
// 不变式: 行主键唯一且升序, 列名唯一（由列名去重器保证）
// ==========================================

use crate::domain::cell::Cell;
use chrono::{Duration, NaiveDateTime};
use std::collections::HashSet;

/// 时间主键列名
pub const DATETIME_COLUMN: &str = "datetime";

/// 合并主键类型（单文件外连接与跨文件合并共用）
pub type MergeKey = NaiveDateTime;

// ==========================================
// WideRow - 宽表行
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub datetime: MergeKey,
    pub values: Vec<Cell>, // 与 WideTable::columns 一一对应
}

impl WideRow {
    pub fn new(datetime: MergeKey, values: Vec<Cell>) -> Self {
        Self { datetime, values }
    }

    /// 构造全空行（补齐网格时使用）
    pub fn empty(datetime: MergeKey, width: usize) -> Self {
        Self {
            datetime,
            values: vec![Cell::Missing; width],
        }
    }

    pub fn is_blank(&self) -> bool {
        self.values.iter().all(Cell::is_missing)
    }
}

// ==========================================
// WideTable - 宽表
// ==========================================
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WideTable {
    columns: Vec<String>, // 位号列（不含 datetime）
    rows: Vec<WideRow>,
}

impl WideTable {
    /// 创建只有列定义的空表
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// 由列与行直接构造
    ///
    /// 行宽度与列数不一致时, 按列数截断或以 Missing 补齐
    pub fn from_parts(columns: Vec<String>, rows: Vec<WideRow>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.values.resize(width, Cell::Missing);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// 位号列名（不含 datetime）
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// 完整表头（datetime + 位号列）
    pub fn header(&self) -> Vec<String> {
        std::iter::once(DATETIME_COLUMN.to_string())
            .chain(self.columns.iter().cloned())
            .collect()
    }

    pub fn rows(&self) -> &[WideRow] {
        &self.rows
    }

    /// 拆分为 (列, 行)
    pub fn into_parts(self) -> (Vec<String>, Vec<WideRow>) {
        (self.columns, self.rows)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 位号列数
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn push_row(&mut self, datetime: MergeKey, mut values: Vec<Cell>) {
        values.resize(self.columns.len(), Cell::Missing);
        self.rows.push(WideRow::new(datetime, values));
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// 按主键查找行（要求表已排序）
    pub fn row_at(&self, datetime: MergeKey) -> Option<&WideRow> {
        self.rows
            .binary_search_by(|row| row.datetime.cmp(&datetime))
            .ok()
            .map(|idx| &self.rows[idx])
    }

    /// 读取指定时间、指定列的单元格
    pub fn value(&self, datetime: MergeKey, column: &str) -> Option<&Cell> {
        let col = self.column_index(column)?;
        self.row_at(datetime).and_then(|row| row.values.get(col))
    }

    /// 全部主键（按当前行顺序）
    pub fn datetimes(&self) -> Vec<MergeKey> {
        self.rows.iter().map(|row| row.datetime).collect()
    }

    pub fn min_datetime(&self) -> Option<MergeKey> {
        self.rows.iter().map(|row| row.datetime).min()
    }

    pub fn max_datetime(&self) -> Option<MergeKey> {
        self.rows.iter().map(|row| row.datetime).max()
    }

    /// 替换位号列名（数量必须一致）
    pub fn rename_columns(&mut self, names: Vec<String>) {
        debug_assert_eq!(names.len(), self.columns.len());
        self.columns = names;
    }

    /// 折叠重复主键并升序排序
    ///
    /// 同一主键保留最先出现的整行, 后续重复行直接丢弃（不按字段合并）
    pub fn dedup_and_sort(&mut self) {
        let mut seen: HashSet<MergeKey> = HashSet::with_capacity(self.rows.len());
        self.rows.retain(|row| seen.insert(row.datetime));
        self.rows.sort_by_key(|row| row.datetime);
    }

    /// 补齐连续时间网格 [min, max]
    ///
    /// 前置条件: 已去重排序, 且全部主键落在 step 网格上
    /// 缺失时刻插入全空行
    pub fn fill_grid(&mut self, step: Duration) {
        let (Some(start), Some(end)) = (self.min_datetime(), self.max_datetime()) else {
            return;
        };
        if step <= Duration::zero() {
            return;
        }

        let width = self.columns.len();
        let mut existing = std::mem::take(&mut self.rows).into_iter().peekable();
        let mut filled = Vec::new();
        let mut cursor = start;

        while cursor <= end {
            // 跳过不在网格上的时刻（保留原值, 位置按时间顺序）
            while let Some(row) = existing.next_if(|row| row.datetime < cursor) {
                filled.push(row);
            }
            match existing.next_if(|row| row.datetime == cursor) {
                Some(row) => filled.push(row),
                None => filled.push(WideRow::empty(cursor, width)),
            }
            cursor += step;
        }
        filled.extend(existing);

        self.rows = filled;
    }
}

// ==========================================
// ProcessedFileSet - 已清洗文件集
// ==========================================
// 键: 原始文件名; 顺序: 上传顺序
#[derive(Debug, Clone, Default)]
pub struct ProcessedFileSet {
    entries: Vec<(String, WideTable)>,
}

impl ProcessedFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入或替换
    ///
    /// 同名文件重复上传时替换内容, 保留首次出现的位置
    pub fn insert(&mut self, name: impl Into<String>, table: WideTable) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = table,
            None => self.entries.push((name, table)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&WideTable> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, table)| table)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WideTable)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), t))
    }

    pub fn tables(&self) -> impl Iterator<Item = &WideTable> {
        self.entries.iter().map(|(_, t)| t)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> MergeKey {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_dedup_and_sort_keeps_first_row() {
        let mut table = WideTable::new(vec!["A".to_string()]);
        table.push_row(at(9, 15), vec![Cell::Number(2.0)]);
        table.push_row(at(9, 0), vec![Cell::Number(1.0)]);
        table.push_row(at(9, 15), vec![Cell::Number(99.0)]);

        table.dedup_and_sort();

        assert_eq!(table.datetimes(), vec![at(9, 0), at(9, 15)]);
        assert_eq!(table.value(at(9, 15), "A"), Some(&Cell::Number(2.0)));
    }

    #[test]
    fn test_fill_grid_inserts_blank_rows() {
        let mut table = WideTable::new(vec!["A".to_string(), "B".to_string()]);
        table.push_row(at(9, 0), vec![Cell::Number(1.0), Cell::Number(2.0)]);
        table.push_row(at(9, 45), vec![Cell::Number(3.0), Cell::Missing]);

        table.fill_grid(Duration::minutes(15));

        assert_eq!(
            table.datetimes(),
            vec![at(9, 0), at(9, 15), at(9, 30), at(9, 45)]
        );
        assert!(table.row_at(at(9, 15)).unwrap().is_blank());
        assert!(table.row_at(at(9, 30)).unwrap().is_blank());
        assert_eq!(table.rows()[1].values.len(), 2);
    }

    #[test]
    fn test_fill_grid_empty_table_is_noop() {
        let mut table = WideTable::new(vec!["A".to_string()]);
        table.fill_grid(Duration::minutes(15));
        assert!(table.is_empty());
    }

    #[test]
    fn test_from_parts_pads_rows() {
        let table = WideTable::from_parts(
            vec!["A".to_string(), "B".to_string()],
            vec![WideRow::new(at(9, 0), vec![Cell::Number(1.0)])],
        );
        assert_eq!(table.rows()[0].values, vec![Cell::Number(1.0), Cell::Missing]);
        assert_eq!(table.header(), vec!["datetime", "A", "B"]);
    }

    #[test]
    fn test_processed_file_set_keeps_upload_order() {
        let mut set = ProcessedFileSet::new();
        set.insert("b.csv", WideTable::new(vec![]));
        set.insert("a.csv", WideTable::new(vec![]));
        set.insert("b.csv", WideTable::new(vec!["X".to_string()]));

        assert_eq!(set.names(), vec!["b.csv", "a.csv"]);
        assert_eq!(set.get("b.csv").unwrap().columns(), &["X".to_string()]);
    }
}

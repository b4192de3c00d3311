// ==========================================
// 历史库 CSV 批量清洗工具 - 宽表合并
// ==========================================
// 职责: 以 datetime 为主键的两种合并
//   1. outer_join: 单文件内逐组全外连接（列追加）
//   2. concat_first_wins: 跨文件纵向拼接（列按名合并, 重复主键首行优先）
// 主键类型: MergeKey（两种合并共用）
// ==========================================

use crate::domain::{Cell, MergeKey, WideRow, WideTable};
use std::collections::{BTreeMap, HashMap, HashSet};

/// 全外连接
///
/// # 规则
/// - 结果列 = 左表列 + 右表列（同名列不合并, 留给列名去重器处理）
/// - 任一侧存在的主键都会出现在结果中, 另一侧缺失的列为 Missing
/// - 同侧重复主键保留最先出现的行
/// - 结果按主键升序
pub fn outer_join(left: WideTable, right: WideTable) -> WideTable {
    let (left_columns, left_rows) = left.into_parts();
    let (right_columns, right_rows) = right.into_parts();
    let left_width = left_columns.len();
    let width = left_width + right_columns.len();

    let mut merged: BTreeMap<MergeKey, Vec<Cell>> = BTreeMap::new();
    for row in left_rows {
        merged.entry(row.datetime).or_insert_with(|| {
            let mut values = row.values;
            values.resize(width, Cell::Missing);
            values
        });
    }

    let mut seen_right: HashSet<MergeKey> = HashSet::new();
    for row in right_rows {
        if !seen_right.insert(row.datetime) {
            continue;
        }
        let slot = merged
            .entry(row.datetime)
            .or_insert_with(|| vec![Cell::Missing; width]);
        for (offset, value) in row.values.into_iter().enumerate() {
            if let Some(target) = slot.get_mut(left_width + offset) {
                *target = value;
            }
        }
    }

    let mut columns = left_columns;
    columns.extend(right_columns);
    WideTable::from_parts(
        columns,
        merged
            .into_iter()
            .map(|(datetime, values)| WideRow::new(datetime, values))
            .collect(),
    )
}

/// 逐组折叠: 以全外连接依次并入
///
/// # 返回
/// - None: 没有任何输入表
pub fn fold_outer_join<I>(tables: I) -> Option<WideTable>
where
    I: IntoIterator<Item = WideTable>,
{
    tables
        .into_iter()
        .fold(None, |acc: Option<WideTable>, table| match acc {
            None => Some(table),
            Some(running) => Some(outer_join(running, table)),
        })
}

/// 纵向拼接, 重复主键首行优先
///
/// # 规则
/// - 列: 按名合并, 顺序为首次出现顺序
/// - 行: 按输入顺序（表顺序, 再表内行顺序）遍历
///   同一主键只保留最先出现的整行, 后续行整体丢弃（不按字段补齐）
/// - 结果按主键升序
pub fn concat_first_wins<'a, I>(tables: I) -> WideTable
where
    I: IntoIterator<Item = &'a WideTable>,
{
    let mut columns: Vec<String> = Vec::new();
    let mut column_slots: HashMap<String, usize> = HashMap::new();
    let mut merged: BTreeMap<MergeKey, Vec<Cell>> = BTreeMap::new();

    for table in tables {
        // 本表列 → 合并表列位置
        let mapping: Vec<usize> = table
            .columns()
            .iter()
            .map(|name| {
                *column_slots.entry(name.clone()).or_insert_with(|| {
                    columns.push(name.clone());
                    columns.len() - 1
                })
            })
            .collect();

        for row in table.rows() {
            merged.entry(row.datetime).or_insert_with(|| {
                let mut values = vec![Cell::Missing; columns.len()];
                for (value, &slot) in row.values.iter().zip(&mapping) {
                    values[slot] = value.clone();
                }
                values
            });
        }
    }

    WideTable::from_parts(
        columns,
        merged
            .into_iter()
            .map(|(datetime, values)| WideRow::new(datetime, values))
            .collect(),
    )
}

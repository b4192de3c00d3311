// ==========================================
// 历史库 CSV 批量清洗工具 - 单文件提取器
// ==========================================
// 职责: RawExport → WideTable
// 流程: 分组 → 时间戳解析与归一化 → 位号名简化 → 逐组全外连接
//       → 主键去重排序 → 补齐 15 分钟网格 → 列名去重
// 容错: 单个分组失败仅跳过并记录, 至少一组成功即视为文件成功
// ==========================================

use crate::domain::{BatchLog, Cell, Interval, LogKind, MergeKey, WideTable};
use crate::engine::join::fold_outer_join;
use crate::importer::column_dedup::dedup_column_names;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawExport, GROUP_WIDTH};
use crate::importer::name_simplifier::simplify_cell;
use crate::importer::timestamp::{grid_step, normalize, parse_timestamp_cell};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

// ==========================================
// GroupSeries - 单组时序
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSeries {
    pub group: usize, // 从 1 开始的分组编号
    pub tag: String,
    pub points: Vec<(MergeKey, Cell)>,
    pub dropped: usize, // 无法解析而剔除的时间戳数
}

impl GroupSeries {
    /// 转为两列表（datetime, 位号）
    pub fn into_table(self) -> WideTable {
        let mut table = WideTable::new(vec![self.tag]);
        for (datetime, value) in self.points {
            table.push_row(datetime, vec![value]);
        }
        table
    }
}

// ==========================================
// Extractor - 单文件提取器
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct Extractor {
    interval: Interval,
}

impl Extractor {
    pub fn new(interval: Interval) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// 从原始字节提取宽表
    ///
    /// # 返回
    /// - Ok(WideTable): 至少一组成功
    /// - Err(FileParseError): 非法 CSV 或无任何可用分组
    pub fn extract_bytes(
        &self,
        file_name: &str,
        bytes: &[u8],
        log: &mut BatchLog,
    ) -> ImportResult<WideTable> {
        let raw = RawExport::from_bytes(bytes).map_err(|e| ImportError::FileParseError {
            file: file_name.to_string(),
            message: format!("无法作为表格数据读取: {}", e),
        })?;
        self.extract(file_name, &raw, log)
    }

    /// 从已解析网格提取宽表
    #[instrument(skip(self, raw, log), fields(interval = %self.interval))]
    pub fn extract(
        &self,
        file_name: &str,
        raw: &RawExport,
        log: &mut BatchLog,
    ) -> ImportResult<WideTable> {
        let group_count = raw.group_count();
        debug!(groups = group_count, rows = raw.data_row_count(), "开始提取分组");

        let mut series = Vec::with_capacity(group_count);
        for group_idx in 0..group_count {
            match self.extract_group(raw, group_idx) {
                Ok(group) => {
                    if group.dropped > 0 {
                        warn!(group = group.group, dropped = group.dropped, "剔除无法解析的时间戳");
                        log.push(
                            LogKind::GroupRowsDropped,
                            format!(
                                "{}: 分组 {} ({}) 剔除 {} 个无法解析的时间戳",
                                file_name, group.group, group.tag, group.dropped
                            ),
                        );
                    }
                    series.push(group);
                }
                Err(e) => {
                    warn!(group = group_idx + 1, error = %e, "跳过分组");
                    log.push(LogKind::GroupSkipped, format!("{}: {}，已跳过该分组", file_name, e));
                }
            }
        }

        let mut table = fold_outer_join(series.into_iter().map(GroupSeries::into_table))
            .ok_or_else(|| ImportError::FileParseError {
                file: file_name.to_string(),
                message: "没有任何分组产生 datetime 列".to_string(),
            })?;

        table.dedup_and_sort();
        if self.interval.fills_gaps() {
            let before = table.len();
            table.fill_grid(grid_step(self.interval));
            debug!(inserted = table.len() - before, "补齐 15 分钟网格");
        }

        let header = dedup_column_names(&table.header());
        table.rename_columns(header[1..].to_vec());

        info!(rows = table.len(), columns = table.width(), "文件提取完成");
        Ok(table)
    }

    /// 提取单个分组
    ///
    /// # 分组失败条件
    /// - 缺少数值列（列数不足）
    /// - 缺少位号表头
    /// - 没有任何可解析的时间戳
    pub fn extract_group(&self, raw: &RawExport, group_idx: usize) -> ImportResult<GroupSeries> {
        let group = group_idx + 1;
        let time_col = group_idx * GROUP_WIDTH;
        let value_col = time_col + 1;
        let group_error = |message: String| ImportError::GroupParseError { group, message };

        if !raw.has_column(value_col) {
            return Err(group_error(format!("第 {} 列缺少数值列", value_col + 1)));
        }

        let tag = simplify_cell(raw.header_cell(time_col))
            .ok_or_else(|| group_error(format!("第 {} 列缺少位号表头", time_col + 1)))?;

        let mut points: Vec<(MergeKey, Cell)> = Vec::new();
        let mut slots: HashMap<MergeKey, usize> = HashMap::new();
        let mut dropped = 0usize;

        for (ts_cell, value) in raw.data_column(time_col).zip(raw.data_column(value_col)) {
            // 空白时间戳视为分组尾部补位, 不计入剔除
            if ts_cell.is_missing() {
                continue;
            }
            match parse_timestamp_cell(ts_cell) {
                Some(ts) => {
                    let key = normalize(ts, self.interval);
                    // 归一化后同一时刻取首个非空值
                    match slots.get(&key) {
                        Some(&idx) => {
                            if points[idx].1.is_missing() && !value.is_missing() {
                                points[idx].1 = value.clone();
                            }
                        }
                        None => {
                            slots.insert(key, points.len());
                            points.push((key, value.clone()));
                        }
                    }
                }
                None => dropped += 1,
            }
        }

        if points.is_empty() {
            let message = if dropped > 0 {
                format!("{} 的 {} 个时间戳均无法解析", tag, dropped)
            } else {
                format!("{} 无时间戳数据", tag)
            };
            return Err(group_error(message));
        }

        Ok(GroupSeries {
            group,
            tag,
            points,
            dropped,
        })
    }
}

// ==========================================
// 历史库 CSV 批量清洗工具 - 列名去重器
// ==========================================
// 职责: 保证最终列名唯一
// 规则: 首次出现保持原名, 第 k 次出现改名为 X_k
//       生成名与已有列名冲突时继续递增后缀
// ==========================================

use std::collections::{HashMap, HashSet};

/// 列名去重
///
/// # 参数
/// - names: 有序列名
///
/// # 返回
/// - 等长序列, 顺序不变, 首次出现的名字不变, 全部唯一
///
/// # 性质
/// - 幂等: 对已唯一的序列不做任何修改
pub fn dedup_column_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    // 所有原始名字（首次出现保留原名, 生成名需避开）
    let mut taken: HashSet<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
    let mut first_seen: HashSet<&str> = HashSet::with_capacity(names.len());
    let mut occurrences: HashMap<&str, usize> = HashMap::new();

    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let count = occurrences.entry(name).or_insert(0);
            *count += 1;

            if first_seen.insert(name) {
                return name.to_string();
            }

            let mut suffix = *count;
            let mut candidate = format!("{}_{}", name, suffix);
            while taken.contains(&candidate) {
                suffix += 1;
                candidate = format!("{}_{}", name, suffix);
            }
            *count = suffix;
            taken.insert(candidate.clone());
            candidate
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeats_get_occurrence_suffix() {
        let out = dedup_column_names(&["datetime", "Flow", "Flow", "Temp", "Flow"]);
        assert_eq!(out, vec!["datetime", "Flow", "Flow_2", "Temp", "Flow_3"]);
    }

    #[test]
    fn test_unique_input_is_unchanged() {
        let names = vec!["a".to_string(), "b".to_string(), "a_2".to_string()];
        assert_eq!(dedup_column_names(&names), names);
    }

    #[test]
    fn test_generated_name_avoids_existing_column() {
        let out = dedup_column_names(&["a", "a", "a_2"]);
        assert_eq!(out, vec!["a", "a_3", "a_2"]);
    }

    #[test]
    fn test_idempotent() {
        let once = dedup_column_names(&["x", "x", "x", "y", "x_2", "y"]);
        let twice = dedup_column_names(&once);
        assert_eq!(once, twice);

        let unique: HashSet<&String> = once.iter().collect();
        assert_eq!(unique.len(), once.len());
    }

    #[test]
    fn test_empty_input() {
        let empty: Vec<String> = Vec::new();
        assert!(dedup_column_names(&empty).is_empty());
    }
}

// ==========================================
// 历史库 CSV 批量清洗工具 - 位号名称简化器
// ==========================================
// 职责: 将冗长的位号表头（URL / 路径形式）简化为稳定的短列名
// 规则: 有序规则表, 逐条尝试, 首个命中即返回
// ==========================================

use crate::domain::Cell;

/// 单条简化规则
///
/// `applies` 判断是否适用, `transform` 给出结果; 结果为空视为未命中
pub struct NameRule {
    pub name: &'static str,
    applies: fn(&str) -> bool,
    transform: fn(&str) -> Option<String>,
}

impl NameRule {
    fn apply(&self, cleaned: &str) -> Option<String> {
        if !(self.applies)(cleaned) {
            return None;
        }
        (self.transform)(cleaned).filter(|s| !s.is_empty())
    }
}

const FLN_MARKER: &str = ".FLN_";
const POINTS_MARKER: &str = ".Points.";
const VALUE_SUFFIX: &str = ".Value";
const DAC_MARKER: &str = "|dac-";

/// 有序规则表（顺序即优先级）
pub static NAME_RULES: &[NameRule] = &[
    NameRule {
        name: "fln",
        applies: |s| s.contains(FLN_MARKER),
        transform: fln_rule,
    },
    NameRule {
        name: "points",
        applies: |s| s.contains(POINTS_MARKER),
        transform: points_rule,
    },
    NameRule {
        name: "paren",
        applies: |s| s.contains('('),
        transform: paren_rule,
    },
    NameRule {
        name: "dac",
        applies: |s| s.contains(DAC_MARKER),
        transform: dac_rule,
    },
    NameRule {
        name: "dotted",
        applies: |_| true,
        transform: dotted_rule,
    },
];

// ==========================================
// 对外接口
// ==========================================

/// 简化位号名称
///
/// # 参数
/// - raw: 原始表头文本
///
/// # 返回
/// - 简化后的列名; 所有规则均未命中时取原文最后一个点分段
pub fn simplify_name(raw: &str) -> String {
    let cleaned = strip_url_segments(raw.trim());
    NAME_RULES
        .iter()
        .find_map(|rule| rule.apply(&cleaned))
        .unwrap_or_else(|| last_dot_segment(raw.trim()).to_string())
}

/// 简化表头单元格
///
/// # 返回
/// - Some: 文本单元格返回简化名; 数值单元格原样返回其文本
/// - None: 空单元格（无位号名）
pub fn simplify_cell(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Text(text) => Some(simplify_name(text)),
        Cell::Number(_) => Some(cell.to_string()),
        Cell::Missing => None,
    }
}

// ==========================================
// 规则实现
// ==========================================

/// 最后一个 `.FLN_` 之后的点分段, 取最后四段以 `_` 连接
fn fln_rule(s: &str) -> Option<String> {
    let start = s.rfind(FLN_MARKER)? + FLN_MARKER.len();
    Some(join_last(s[start..].split('.').collect(), 4))
}

/// `.Points.` 之后、`.Value` 段之前的子串
///
/// `.Value` 必须是完整段（位于末尾或其后紧跟 `.`）
fn points_rule(s: &str) -> Option<String> {
    let start = s.find(POINTS_MARKER)? + POINTS_MARKER.len();
    let rest = &s[start..];
    let end = rest
        .match_indices(VALUE_SUFFIX)
        .map(|(idx, _)| idx)
        .find(|&idx| {
            let after = &rest[idx + VALUE_SUFFIX.len()..];
            after.is_empty() || after.starts_with('.')
        })
        .unwrap_or(rest.len());
    Some(rest[..end].to_string())
}

/// 非 URL 且含 `.` 的括号段, `.` 替换为 `_`
fn paren_rule(s: &str) -> Option<String> {
    paren_segments(s)
        .into_iter()
        .find(|seg| seg.contains('.') && !seg.trim_start().starts_with("http"))
        .map(|seg| seg.trim().replace('.', "_"))
}

/// 旧版 `|dac-` 位号: `|` 之前部分的最后一个点分段
fn dac_rule(s: &str) -> Option<String> {
    let head = s.split('|').next()?;
    Some(last_dot_segment(head).to_string())
}

/// 通用点分规则: 截断到字面量 `Value` 段之前, 取最后四段
fn dotted_rule(s: &str) -> Option<String> {
    let mut segments: Vec<&str> = s.split('.').collect();
    if let Some(pos) = segments.iter().position(|seg| *seg == "Value") {
        segments.truncate(pos);
    }
    Some(join_last(segments, 4))
}

// ==========================================
// 辅助函数
// ==========================================

/// 移除所有 `(http…)` 括号段
fn strip_url_segments(s: &str) -> String {
    let mut out = s.to_string();
    while let Some(start) = out.find("(http") {
        let end = out[start..]
            .find(')')
            .map(|offset| start + offset + 1)
            .unwrap_or(out.len());
        out.replace_range(start..end, "");
    }
    out.trim().to_string()
}

/// 提取全部括号段内容（不含括号）
fn paren_segments(s: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut rest = s;
    while let Some(open) = rest.find('(') {
        let after = &rest[open + 1..];
        match after.find(')') {
            Some(close) => {
                segments.push(&after[..close]);
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    segments
}

fn join_last(segments: Vec<&str>, n: usize) -> String {
    let skip = segments.len().saturating_sub(n);
    segments[skip..].join("_")
}

fn last_dot_segment(s: &str) -> &str {
    s.rsplit('.').next().unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fln_takes_last_four_after_last_marker() {
        assert_eq!(
            simplify_name(r"\\HIST01\Plant.Area.FLN_Unit1.Pump.Flow.PV"),
            "Unit1_Pump_Flow_PV"
        );
        assert_eq!(
            simplify_name("Site.FLN_A.B.FLN_C.D.E.F.G"),
            "D_E_F_G"
        );
        // 不足四段时全部保留
        assert_eq!(simplify_name("Site.FLN_Tank.Level"), "Tank_Level");
    }

    #[test]
    fn test_points_until_value() {
        assert_eq!(
            simplify_name("Root.Points.Boiler1.Temp.Value"),
            "Boiler1.Temp"
        );
        assert_eq!(simplify_name("Root.Points.Boiler1"), "Boiler1");
    }

    #[test]
    fn test_points_ignores_longer_value_segments() {
        assert_eq!(simplify_name("Root.Points.Pump.Values.Value"), "Pump.Values");
        assert_eq!(simplify_name("Root.Points.Pump.ValueRange"), "Pump.ValueRange");
        assert_eq!(simplify_name("Root.Points.Pump.Value.Raw"), "Pump");
    }

    #[test]
    fn test_url_segment_removed_before_rules() {
        assert_eq!(
            simplify_name("Pump Speed (Area1.Pump2) (http://historian/api/x.y)"),
            "Area1_Pump2"
        );
        assert_eq!(
            simplify_name("  Plant.FLN_Line.Motor.Amps (https://host/a.b)  "),
            "Line_Motor_Amps"
        );
    }

    #[test]
    fn test_legacy_dac_tag() {
        assert_eq!(simplify_name("Area.Unit.TT101|dac-77"), "TT101");
    }

    #[test]
    fn test_dotted_truncates_at_value_segment() {
        assert_eq!(simplify_name("A.B.C.D.E.Value.Extra"), "B_C_D_E");
        assert_eq!(simplify_name("Simple"), "Simple");
        assert_eq!(simplify_name("Line.Speed"), "Line_Speed");
    }

    #[test]
    fn test_first_match_wins() {
        // 同时含 .FLN_ 与 .Points. 时 FLN 规则优先
        assert_eq!(
            simplify_name("X.Points.Y.FLN_P.Q.Value"),
            "P_Q_Value"
        );
    }

    #[test]
    fn test_fallback_to_last_dot_segment() {
        assert_eq!(simplify_name("(http://only.url)"), "url)");
    }

    #[test]
    fn test_simplify_cell_non_text_unchanged() {
        assert_eq!(simplify_cell(&Cell::Number(1234.0)), Some("1234".to_string()));
        assert_eq!(simplify_cell(&Cell::Missing), None);
        assert_eq!(
            simplify_cell(&Cell::Text("Plant.FLN_A.B".to_string())),
            Some("A_B".to_string())
        );
    }

    #[test]
    fn test_rule_order() {
        let names: Vec<&str> = NAME_RULES.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["fln", "points", "paren", "dac", "dotted"]);
    }
}

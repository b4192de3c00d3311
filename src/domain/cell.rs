// ==========================================
// 历史库 CSV 批量清洗工具 - 单元格类型
// ==========================================
// 职责: 原始导出文件中松散类型单元格的显式建模
// 取值: Text / Number / Missing
// ==========================================

use std::fmt;

/// 单元格值
///
/// 原始导出的表头行与数据行混杂文本和数值, 解析时统一落到三种形态之一
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    Text(String),
    Number(f64),
    #[default]
    Missing,
}

impl Cell {
    /// 从原始文本解析单元格
    ///
    /// # 规则
    /// - TRIM 后为空 → Missing
    /// - 可解析为有限浮点数 → Number
    /// - 其他 → Text（保留 TRIM 后的文本）
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::Text(trimmed.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// 文本形态的引用（仅 Text 有值）
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Missing => Ok(()),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert_eq!(Cell::parse("  "), Cell::Missing);
        assert_eq!(Cell::parse(" 12.5 "), Cell::Number(12.5));
        assert_eq!(Cell::parse("-3"), Cell::Number(-3.0));
        assert_eq!(Cell::parse("Bad Input"), Cell::Text("Bad Input".to_string()));
    }

    #[test]
    fn test_non_finite_kept_as_text() {
        assert_eq!(Cell::parse("NaN"), Cell::Text("NaN".to_string()));
        assert_eq!(Cell::parse("inf"), Cell::Text("inf".to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Cell::Number(12.0).to_string(), "12");
        assert_eq!(Cell::Number(0.25).to_string(), "0.25");
        assert_eq!(Cell::Missing.to_string(), "");
        assert_eq!(Cell::from("I/O Timeout").to_string(), "I/O Timeout");
    }
}

// ==========================================
// DTC 日历转换系统 - 标签索引
// ==========================================
// 职责: 扫描固定标签列,按内容（而非坐标）定位字段行
// 输入: 表格 + 标签列 + 扫描行窗口
// 输出: 行号 → 标签文本（每个 sheet 构建一次）
// ==========================================
// 规则: 大小写不敏感子串匹配,自上而下首个命中者胜出
// ==========================================

use crate::config::LayoutProfile;
use crate::grid::Grid;
use std::collections::{BTreeMap, HashSet};
use std::ops::RangeInclusive;

/// 标签单元格
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCell {
    pub column: u32,
    pub text: String,
    normalized: String,
}

impl LabelCell {
    fn new(column: u32, text: String) -> Self {
        let normalized = text.to_lowercase();
        Self {
            column,
            text,
            normalized,
        }
    }

    /// 小写形式
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn contains(&self, keyword_lower: &str) -> bool {
        self.normalized.contains(keyword_lower)
    }
}

/// 命中位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelHit {
    pub row: u32,
    pub column: u32,
}

// ==========================================
// LabelIndex - 标签索引
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    rows: BTreeMap<u32, Vec<LabelCell>>,
    primary_window: Option<RangeInclusive<u32>>,
}

impl LabelIndex {
    /// 构建索引
    ///
    /// # 参数
    /// - grid: 表格
    /// - label_columns: 标签列（按优先顺序）
    /// - rows: 扫描行窗口（超出表格部分自动截断）
    pub fn build<G: Grid + ?Sized>(
        grid: &G,
        label_columns: &[u32],
        rows: RangeInclusive<u32>,
    ) -> Self {
        let first = (*rows.start()).max(1);
        let last = (*rows.end()).min(grid.max_row());

        let mut index = BTreeMap::new();
        for row in first..=last {
            let cells: Vec<LabelCell> = label_columns
                .iter()
                .filter_map(|&col| grid.read(row, col).map(|text| LabelCell::new(col, text)))
                .collect();
            if !cells.is_empty() {
                index.insert(row, cells);
            }
        }

        Self {
            rows: index,
            primary_window: Some(rows),
        }
    }

    /// 按布局参数构建（主窗口 + SMS 文案子窗口）
    pub fn for_layout<G: Grid + ?Sized>(grid: &G, layout: &LayoutProfile) -> Self {
        let last = layout.label_scan_last_row.max(layout.sms_copy_last_row);
        let mut index = Self::build(grid, &layout.label_columns, layout.label_scan_first_row..=last);
        index.primary_window = Some(layout.label_scan_first_row..=layout.label_scan_last_row);
        index
    }

    /// 主窗口内首个命中行
    pub fn find_row(&self, keyword: &str) -> Option<u32> {
        self.find_label(keyword).map(|hit| hit.row)
    }

    /// 主窗口内首个命中位置（含标签所在列）
    pub fn find_label(&self, keyword: &str) -> Option<LabelHit> {
        let window = self.primary_window.clone().unwrap_or(1..=u32::MAX);
        self.find_label_where(keyword, window, |_| true)
    }

    /// 指定行窗口内首个命中行
    pub fn find_row_in(&self, keyword: &str, rows: RangeInclusive<u32>) -> Option<u32> {
        self.find_label_where(keyword, rows, |_| true)
            .map(|hit| hit.row)
    }

    /// 主窗口内首个未被占用的命中行
    pub fn find_unclaimed_row(&self, keyword: &str, claimed: &HashSet<u32>) -> Option<u32> {
        let window = self.primary_window.clone().unwrap_or(1..=u32::MAX);
        self.find_label_where(keyword, window, |row| !claimed.contains(&row))
            .map(|hit| hit.row)
    }

    fn find_label_where<F>(
        &self,
        keyword: &str,
        rows: RangeInclusive<u32>,
        accept: F,
    ) -> Option<LabelHit>
    where
        F: Fn(u32) -> bool,
    {
        let keyword_lower = keyword.trim().to_lowercase();
        if keyword_lower.is_empty() || rows.start() > rows.end() {
            return None;
        }

        self.rows
            .range(rows)
            .filter(|(row, _)| accept(**row))
            .find_map(|(row, cells)| {
                cells
                    .iter()
                    .find(|cell| cell.contains(&keyword_lower))
                    .map(|cell| LabelHit {
                        row: *row,
                        column: cell.column,
                    })
            })
    }

    /// 只保留不超过 max_column 的标签列
    ///
    /// 标签列右侧即为活动数据列,其中的文本不能参与标签匹配
    pub fn restricted_to(&self, max_column: u32) -> Self {
        let rows = self
            .rows
            .iter()
            .filter_map(|(row, cells)| {
                let kept: Vec<LabelCell> = cells
                    .iter()
                    .filter(|cell| cell.column <= max_column)
                    .cloned()
                    .collect();
                (!kept.is_empty()).then_some((*row, kept))
            })
            .collect();

        Self {
            rows,
            primary_window: self.primary_window.clone(),
        }
    }

    /// 某行的标签（第一个非空标签列）
    pub fn label_at(&self, row: u32) -> Option<&LabelCell> {
        self.rows.get(&row).and_then(|cells| cells.first())
    }

    /// 主窗口内满足条件的全部标签行（行号升序）
    pub fn rows_where<F>(&self, predicate: F) -> Vec<u32>
    where
        F: Fn(&LabelCell) -> bool,
    {
        let window = self.primary_window.clone().unwrap_or(1..=u32::MAX);
        if window.start() > window.end() {
            return Vec::new();
        }
        self.rows
            .range(window)
            .filter(|(_, cells)| cells.iter().any(&predicate))
            .map(|(row, _)| *row)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MemoryGrid;

    fn sample_grid() -> MemoryGrid {
        MemoryGrid::new()
            .with(2, 2, "Date of Send")
            .with(4, 2, "Campaign Type")
            .with(5, 3, "Campaign Name")
            .with(6, 2, "Email Overview")
            .with(9, 2, "Overview (legacy)")
            .with(45, 2, "SMS Copy")
            .with(60, 2, "Campaign Name (out of window)")
    }

    #[test]
    fn test_find_row_first_match_wins() {
        let grid = sample_grid();
        let index = LabelIndex::build(&grid, &[2, 3], 1..=54);

        assert_eq!(index.find_row("overview"), Some(6));
        assert_eq!(index.find_row("CAMPAIGN NAME"), Some(5));
        assert_eq!(index.find_row("Landing Page"), None);
    }

    #[test]
    fn test_find_label_reports_column() {
        let grid = sample_grid();
        let index = LabelIndex::build(&grid, &[2, 3], 1..=54);

        assert_eq!(index.find_label("Campaign Name"), Some(LabelHit { row: 5, column: 3 }));
        assert_eq!(index.find_label("Campaign Type"), Some(LabelHit { row: 4, column: 2 }));
    }

    #[test]
    fn test_window_is_respected() {
        let grid = sample_grid();
        let index = LabelIndex::build(&grid, &[2], 1..=54);

        // C 列不在标签列中
        assert_eq!(index.find_row("Campaign Name"), None);
        assert_eq!(index.find_row_in("SMS", 44..=50), Some(45));
        assert_eq!(index.find_row_in("SMS", 1..=43), None);
    }

    #[test]
    fn test_for_layout_covers_sms_window() {
        let grid = sample_grid();
        let layout = LayoutProfile {
            label_scan_last_row: 20,
            ..LayoutProfile::default()
        };
        let index = LabelIndex::for_layout(&grid, &layout);

        // 主窗口只到 20 行,SMS 子窗口仍可查
        assert_eq!(index.find_row("SMS"), None);
        assert_eq!(index.find_row_in("SMS", 44..=50), Some(45));
    }

    #[test]
    fn test_find_unclaimed_row() {
        let grid = MemoryGrid::new()
            .with(10, 2, "Promo Code")
            .with(12, 2, "Promo");
        let index = LabelIndex::build(&grid, &[2], 1..=54);

        let mut claimed = HashSet::new();
        assert_eq!(index.find_unclaimed_row("Promo", &claimed), Some(10));
        claimed.insert(10);
        assert_eq!(index.find_unclaimed_row("Promo", &claimed), Some(12));
    }

    #[test]
    fn test_rows_where() {
        let grid = MemoryGrid::new()
            .with(20, 2, "Featured Product 1")
            .with(21, 2, "Featured Product 1 URL")
            .with(22, 2, "Featured Product 2");
        let index = LabelIndex::build(&grid, &[2], 1..=54);

        let rows = index.rows_where(|c| {
            c.normalized().contains("featured product") && !c.normalized().contains("url")
        });
        assert_eq!(rows, vec![20, 22]);
        assert_eq!(index.label_at(21).map(|c| c.text.as_str()), Some("Featured Product 1 URL"));
    }

    #[test]
    fn test_restricted_to_drops_data_columns() {
        let grid = MemoryGrid::new()
            .with(7, 2, "Email Overview")
            .with(7, 3, "Use promo code SPRING at checkout")
            .with(20, 2, "Promo Code")
            .with(20, 3, "SPRING20")
            .with(30, 3, "Featured product of the week");
        let index = LabelIndex::build(&grid, &[2, 3], 1..=54);
        assert_eq!(index.find_row("promo code"), Some(7));

        let labels = index.restricted_to(2);
        assert_eq!(labels.find_row("promo code"), Some(20));
        assert_eq!(labels.find_row("overview"), Some(7));
        assert!(labels.rows_where(|c| c.contains("featured product")).is_empty());
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn test_empty_keyword_never_matches() {
        let grid = sample_grid();
        let index = LabelIndex::build(&grid, &[2, 3], 1..=54);
        assert_eq!(index.find_row("  "), None);
        assert!(!index.is_empty());
    }
}

// ==========================================
// DTC 日历转换系统 - 内存表格
// ==========================================
// 职责: 稀疏存储单元格文本,提供 Grid 访问
// 用途: 工作簿加载后的每个 sheet / 测试构造数据
// ==========================================

use crate::grid::Grid;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct MemoryGrid {
    cells: HashMap<(u32, u32), String>,
    max_row: u32,
    max_column: u32,
}

impl MemoryGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从行数据构造（第一个元素对应第 1 行第 1 列）
    ///
    /// 空字符串不占用单元格,但仍扩展边界
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let mut grid = Self::new();
        for (r_idx, row) in rows.into_iter().enumerate() {
            for (c_idx, value) in row.into_iter().enumerate() {
                grid.set(r_idx as u32 + 1, c_idx as u32 + 1, value.as_ref());
            }
        }
        grid
    }

    /// 写入单元格（行列从 1 开始,0 坐标忽略）
    pub fn set(&mut self, row: u32, col: u32, value: impl Into<String>) {
        if row == 0 || col == 0 {
            return;
        }
        self.max_row = self.max_row.max(row);
        self.max_column = self.max_column.max(col);

        let value = value.into();
        if value.is_empty() {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), value);
        }
    }

    /// 链式写入（测试构造用）
    pub fn with(mut self, row: u32, col: u32, value: impl Into<String>) -> Self {
        self.set(row, col, value);
        self
    }

    /// 扩展边界（不写入内容）
    pub fn extend_bounds(&mut self, max_row: u32, max_column: u32) {
        self.max_row = self.max_row.max(max_row);
        self.max_column = self.max_column.max(max_column);
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

impl Grid for MemoryGrid {
    fn raw_cell(&self, row: u32, col: u32) -> Option<&str> {
        self.cells.get(&(row, col)).map(String::as_str)
    }

    fn max_row(&self) -> u32 {
        self.max_row
    }

    fn max_column(&self) -> u32 {
        self.max_column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_trims_and_drops_blank() {
        let grid = MemoryGrid::new()
            .with(1, 1, "  Campaign Name  ")
            .with(1, 2, "   ")
            .with(2, 3, "Flash Sale");

        assert_eq!(grid.read(1, 1), Some("Campaign Name".to_string()));
        assert_eq!(grid.read(1, 2), None);
        assert_eq!(grid.read(2, 3), Some("Flash Sale".to_string()));
    }

    #[test]
    fn test_out_of_range_is_absent() {
        let grid = MemoryGrid::from_rows(vec![vec!["a", "b"], vec!["c", ""]]);

        assert_eq!(grid.max_row(), 2);
        assert_eq!(grid.max_column(), 2);
        assert_eq!(grid.read(0, 1), None);
        assert_eq!(grid.read(1, 0), None);
        assert_eq!(grid.read(99, 99), None);
        assert_eq!(grid.read(2, 2), None);
        assert_eq!(grid.cell_count(), 3);
    }

    #[test]
    fn test_overwrite_with_empty_removes_cell() {
        let mut grid = MemoryGrid::new().with(3, 3, "x");
        grid.set(3, 3, "");
        assert_eq!(grid.read(3, 3), None);
        assert_eq!(grid.max_row(), 3);
    }
}

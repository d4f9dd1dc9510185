// ==========================================
// DTC 日历转换系统 - 表格访问层
// ==========================================
// 职责: 二维单元格表格的只读访问（行列均从 1 开始）
// 红线: 越界坐标视为空值,不报错
// ==========================================

pub mod memory;

pub use memory::MemoryGrid;

// ==========================================
// Grid Trait
// ==========================================
// 实现者: MemoryGrid（工作簿加载器与测试共用）
pub trait Grid {
    /// 原始单元格文本（未裁剪）
    ///
    /// # 参数
    /// - row: 行号（1 起）
    /// - col: 列号（1 起）
    ///
    /// # 返回
    /// - None: 越界或空单元格
    fn raw_cell(&self, row: u32, col: u32) -> Option<&str>;

    /// 最大行号（1 起，空表为 0）
    fn max_row(&self) -> u32;

    /// 最大列号（1 起，空表为 0）
    fn max_column(&self) -> u32;

    /// 读取单元格：裁剪后为空视为缺失
    fn read(&self, row: u32, col: u32) -> Option<String> {
        if row == 0 || col == 0 {
            return None;
        }
        self.raw_cell(row, col)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

// ==========================================
// DTC 日历转换系统 - 导入层
// ==========================================
// 职责: 工作簿文件 → 按 sheet 名读取的表格
// 支持: Excel (.xlsx/.xlsm/.xls) / 内存工作簿
// ==========================================

pub mod error;
pub mod workbook;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use workbook::{
    cell_text, range_to_grid, ExcelWorkbook, InMemoryWorkbook, WorkbookSource,
    SUPPORTED_EXTENSIONS,
};

// ==========================================
// DTC 日历转换系统 - 导出层
// ==========================================
// 职责: 任务记录 → ClickUp 导入 CSV
// ==========================================

pub mod csv_writer;

pub use csv_writer::{task_to_row, write_tasks, write_tasks_to_path, CLICKUP_HEADER, UTF8_BOM};

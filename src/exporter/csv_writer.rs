// ==========================================
// DTC 日历转换系统 - ClickUp CSV 写出
// ==========================================
// 格式: UTF-8 带 BOM,一行表头 + 每任务一行
// 多行描述由 csv 引号规则保留在单个字段内
// ==========================================

use crate::domain::TaskRecord;
use crate::importer::error::{ImportError, ImportResult};
use csv::Writer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// ClickUp 导入列（顺序固定）
pub const CLICKUP_HEADER: &[&str] = &[
    "Task Name",
    "Task Description",
    "Due Date",
    "Start Date",
    "Priority",
    "Status",
    "Tags",
];

/// UTF-8 BOM（Excel 打开时正确识别编码）
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 任务 → CSV 行
pub fn task_to_row(task: &TaskRecord) -> [String; 7] {
    [
        task.task_name.clone(),
        task.description.clone(),
        task.due_date_text(),
        task.start_date_text(),
        task.priority.to_string(),
        task.status.to_string(),
        task.tags_text(),
    ]
}

/// 写出到任意 Writer（含 BOM）
pub fn write_tasks<W: Write>(mut out: W, tasks: &[TaskRecord]) -> ImportResult<()> {
    out.write_all(UTF8_BOM)
        .map_err(|e| ImportError::CsvWriteError(e.to_string()))?;

    let mut wtr = Writer::from_writer(out);
    wtr.write_record(CLICKUP_HEADER)?;
    for task in tasks {
        wtr.write_record(&task_to_row(task))?;
    }
    wtr.flush()
        .map_err(|e| ImportError::CsvWriteError(e.to_string()))?;
    Ok(())
}

/// 写出到文件
///
/// # 返回
/// - Err(FileWriteError): 文件无法创建
/// - Err(CsvWriteError): 写入过程失败
pub fn write_tasks_to_path<P: AsRef<Path>>(path: P, tasks: &[TaskRecord]) -> ImportResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| ImportError::FileWriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    write_tasks(BufWriter::new(file), tasks)?;
    info!(path = %path.display(), count = tasks.len(), "CSV 写出完成");
    Ok(())
}

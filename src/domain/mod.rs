// ==========================================
// DTC 日历转换系统 - 领域模型层
// ==========================================
// 职责: 定义任务记录、优先级、运行统计等领域类型
// 红线: 不含表格访问逻辑,不含引擎逻辑
// ==========================================

pub mod task;
pub mod types;

// 重导出核心类型
pub use task::{ConversionOutcome, ConversionStats, TagSet, TaskRecord, CANONICAL_DATE_FORMAT};
pub use types::{BriefKind, Priority, RunPhase, TaskStatus};

// ==========================================
// DTC 日历转换系统 - 核心库
// ==========================================
// 职责: 营销日历工作簿 → ClickUp 导入 CSV
// 技术栈: Rust + calamine + csv
// 系统定位: 离线批处理转换（单次运行,同步执行）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 任务记录与类型
pub mod domain;

// 表格访问层 - 单元格读取
pub mod grid;

// 引擎层 - 标签驱动提取
pub mod engine;

// 导入层 - 工作簿加载与错误类型
pub mod importer;

// 导出层 - ClickUp CSV
pub mod exporter;

// 配置层 - 转换配置
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{BriefKind, Priority, RunPhase, TaskStatus};

// 领域实体
pub use domain::{ConversionOutcome, ConversionStats, TaskRecord};

// 配置
pub use config::{ConfigManager, ConverterConfig};

// 引擎
pub use engine::{ConversionOrchestrator, SheetClassifier, TextNormalizer};

// 导入导出
pub use exporter::write_tasks_to_path;
pub use importer::{ExcelWorkbook, ImportError, ImportResult, InMemoryWorkbook, WorkbookSource};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "DTC 日历转换系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

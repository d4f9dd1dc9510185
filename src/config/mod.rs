// ==========================================
// DTC 日历转换系统 - 配置层
// ==========================================
// 职责: 优先级表、跳过列表、布局参数、品牌字段集
// 存储: JSON 配置文件（可选）+ 内置默认值
// ==========================================

pub mod config_manager;
pub mod converter_config;

// 重导出核心配置类型
pub use config_manager::{default_config_path, ConfigManager, CONFIG_PATH_ENV};
pub use converter_config::{BrandProfile, BriefTemplate, ConverterConfig, FieldSpec, LayoutProfile};

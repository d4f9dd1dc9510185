// ==========================================
// DTC 日历转换系统 - 引擎层
// ==========================================
// 职责: 标签驱动的表格提取,不做文件 IO
// 流程: Sheet 分类 → 标签索引 → 活动列 → 描述拼装
// 红线: 提取阶段不返回错误,无法解析的数据一律视为缺失
// ==========================================

pub mod brief_builder;
pub mod campaign_extractor;
pub mod date_normalizer;
pub mod description;
pub mod label_index;
pub mod orchestrator;
pub mod product_launch;
pub mod sheet_classifier;
pub mod text_normalizer;
pub mod weekly_sheet;

// 重导出核心引擎
pub use brief_builder::{BriefBuilder, BriefRows, SheetContext};
pub use campaign_extractor::{CampaignColumn, CampaignColumnExtractor, CampaignRows};
pub use date_normalizer::{
    due_date_two_weeks_before, format_date, normalize_date, parse_date,
    parse_due_date_from_header,
};
pub use description::{assemble, DescriptionBuilder, DescriptionLine};
pub use label_index::{LabelHit, LabelIndex};
pub use orchestrator::ConversionOrchestrator;
pub use product_launch::{ProductLaunchExtractor, PRODUCT_LAUNCH_SHEET};
pub use sheet_classifier::{week_id, SheetClassifier};
pub use text_normalizer::TextNormalizer;
pub use weekly_sheet::{SheetExtraction, WeeklySheetExtractor};

// ==========================================
// DTC 日历转换系统 - 周表提取
// ==========================================
// 职责: 单个周表 → 任务记录序列
// 流程: 标题截止日期 → 标签索引 → 活动列 → 简报构建
// 红线: 不返回错误;缺少 Campaign Name 行时告警并产出 0 条
// ==========================================

use crate::config::{ConverterConfig, LayoutProfile};
use crate::domain::TaskRecord;
use crate::engine::brief_builder::{BriefBuilder, SheetContext};
use crate::engine::campaign_extractor::{CampaignColumnExtractor, CampaignRows};
use crate::engine::date_normalizer::parse_due_date_from_header_in_year;
use crate::engine::label_index::LabelIndex;
use crate::engine::sheet_classifier::week_id;
use crate::engine::text_normalizer::TextNormalizer;
use crate::grid::Grid;
use chrono::NaiveDate;
use tracing::{debug, warn};

const DUE_MARKER: &str = "DUE";

/// 单个周表的提取结果
#[derive(Debug, Clone, Default)]
pub struct SheetExtraction {
    pub sheet_name: String,
    pub week_id: String,
    pub campaign_columns: usize,
    pub records: Vec<TaskRecord>,
}

impl SheetExtraction {
    pub fn task_count(&self) -> usize {
        self.records.len()
    }
}

// ==========================================
// WeeklySheetExtractor - 周表提取器
// ==========================================
pub struct WeeklySheetExtractor<'a> {
    config: &'a ConverterConfig,
    normalizer: &'a TextNormalizer,
    brand: &'a str,
    /// 标题日期缺少年份时使用的年份
    default_year: i32,
}

impl<'a> WeeklySheetExtractor<'a> {
    pub fn new(
        config: &'a ConverterConfig,
        normalizer: &'a TextNormalizer,
        brand: &'a str,
        default_year: i32,
    ) -> Self {
        Self {
            config,
            normalizer,
            brand,
            default_year,
        }
    }

    pub fn extract<G: Grid + ?Sized>(&self, sheet_name: &str, grid: &G) -> SheetExtraction {
        let week = week_id(sheet_name);
        let mut extraction = SheetExtraction {
            sheet_name: sheet_name.to_string(),
            week_id: week.clone(),
            ..SheetExtraction::default()
        };

        let layout = &self.config.layout;
        let index = LabelIndex::for_layout(grid, layout);

        let Some(rows) = CampaignRows::locate(&index) else {
            warn!(sheet = sheet_name, "未找到 Campaign Name 行,跳过该 sheet");
            return extraction;
        };

        let columns = CampaignColumnExtractor::new(layout, self.normalizer).extract(grid, &rows);
        extraction.campaign_columns = columns.len();
        if columns.is_empty() {
            debug!(sheet = sheet_name, "没有有效活动列");
            return extraction;
        }

        let ctx = SheetContext {
            brand: self.brand.to_string(),
            week_id: week,
            header_due_date: header_due_date(grid, layout, self.default_year),
        };
        debug!(
            sheet = sheet_name,
            header_due_date = ?ctx.header_due_date,
            columns = columns.len(),
            "开始构建简报"
        );

        let builder = BriefBuilder::new(self.config, self.normalizer, &index, &rows);
        for column in &columns {
            extraction.records.extend(builder.build(grid, &ctx, column));
        }

        extraction
    }
}

/// 标题区的截止日期
///
/// 扫描左上角窗口,取第一个含 "DUE" 且能解析出日期的单元格
pub fn header_due_date<G: Grid + ?Sized>(
    grid: &G,
    layout: &LayoutProfile,
    default_year: i32,
) -> Option<NaiveDate> {
    for row in 1..=layout.header_due_scan_rows {
        for col in 1..=layout.header_due_scan_columns {
            let Some(text) = grid.read(row, col) else {
                continue;
            };
            if !text.to_uppercase().contains(DUE_MARKER) {
                continue;
            }
            if let Some(date) = parse_due_date_from_header_in_year(&text, default_year) {
                return Some(date);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MemoryGrid;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn wk6_sheet() -> MemoryGrid {
        MemoryGrid::new()
            .with(1, 4, "DUE 2/3 10 AM CT")
            .with(2, 2, "Date of Send")
            .with(4, 2, "Time of Send")
            .with(5, 2, "Campaign Type")
            .with(6, 2, "Campaign Name")
            .with(2, 3, "02/20/2025")
            .with(5, 3, "Promotions")
            .with(6, 3, "Flash Sale")
            .with(6, 4, "TBD")
            .with(6, 5, "Brand Story")
    }

    fn extract(grid: &MemoryGrid, sheet: &str) -> SheetExtraction {
        let config = ConverterConfig::default();
        let normalizer = TextNormalizer::from_config(&config);
        WeeklySheetExtractor::new(&config, &normalizer, "PB", 2025).extract(sheet, grid)
    }

    #[test]
    fn test_extracts_one_record_per_valid_column() {
        let result = extract(&wk6_sheet(), "Wk6");

        assert_eq!(result.week_id, "Wk6");
        assert_eq!(result.campaign_columns, 2);
        assert_eq!(result.task_count(), 2);

        let names: Vec<&str> = result.records.iter().map(|r| r.task_name.as_str()).collect();
        assert_eq!(names, vec!["[Wk6] Promotions: Flash Sale", "[Wk6] Brand Story"]);
    }

    #[test]
    fn test_header_due_date_fallback() {
        let result = extract(&wk6_sheet(), "Wk6");

        // 有发送日期: 提前 14 天
        assert_eq!(result.records[0].due_date, Some(ymd(2025, 2, 6)));
        // 无发送日期: 使用标题日期
        assert_eq!(result.records[1].due_date, Some(ymd(2025, 2, 3)));
        assert_eq!(result.records[1].start_date, None);
    }

    #[test]
    fn test_missing_campaign_name_row_yields_nothing() {
        let grid = MemoryGrid::new()
            .with(2, 2, "Date of Send")
            .with(2, 3, "02/20/2025");
        let result = extract(&grid, "Wk9");
        assert_eq!(result.task_count(), 0);
        assert_eq!(result.campaign_columns, 0);
    }

    #[test]
    fn test_week_id_from_prefixed_sheet() {
        let result = extract(&wk6_sheet(), "TGW_wk2_12");
        assert_eq!(result.week_id, "Wk2");
        assert!(result.records[0].task_name.starts_with("[Wk2] "));
        assert!(result.records[0].has_tag("Wk2"));
    }

    #[test]
    fn test_header_due_date_scan() {
        let layout = LayoutProfile::default();
        let grid = MemoryGrid::new()
            .with(1, 1, "Wk6 Email Briefs")
            .with(2, 2, "Due soon")
            .with(3, 3, "DUE 2/3/24 10 AM CT");
        assert_eq!(header_due_date(&grid, &layout, 2025), Some(ymd(2024, 2, 3)));

        // 窗口外的 DUE 不计
        let grid = MemoryGrid::new().with(5, 1, "DUE 2/3");
        assert_eq!(header_due_date(&grid, &layout, 2025), None);
    }
}

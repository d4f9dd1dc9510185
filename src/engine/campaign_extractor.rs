// ==========================================
// DTC 日历转换系统 - 活动列提取器
// ==========================================
// 职责: 确定周表中哪些列是独立活动（一列 = 一条记录）
// 输入: 表格 + 标签索引 + 布局参数
// 输出: 有效活动列（按列号升序）
// ==========================================
// 规则:
// - Campaign Name 有意义（非空、非占位文本）的列才是有效列
// - 列窗口不含 Campaign Name 标签所在列及其左侧列
// - 星期取 "Date of Send" 下一行,非星期名时由日期推算
// ==========================================

use crate::config::LayoutProfile;
use crate::engine::date_normalizer::{is_weekday_name, parse_date, weekday_name};
use crate::engine::label_index::LabelIndex;
use crate::engine::text_normalizer::TextNormalizer;
use crate::grid::Grid;
use chrono::NaiveDate;
use std::ops::RangeInclusive;
use tracing::debug;

pub const LABEL_CAMPAIGN_NAME: &str = "Campaign Name";
pub const LABEL_CAMPAIGN_TYPE: &str = "Campaign Type";
pub const LABEL_DATE_OF_SEND: &str = "Date of Send";
pub const LABEL_TIME_OF_SEND: &str = "Time of Send";

/// 活动相关的固定标签行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignRows {
    pub campaign_name: u32,
    /// Campaign Name 标签所在列
    pub name_label_column: u32,
    pub campaign_type: Option<u32>,
    pub date_of_send: Option<u32>,
    pub time_of_send: Option<u32>,
}

impl CampaignRows {
    /// 从标签索引定位; 缺少 Campaign Name 行时返回 None
    ///
    /// Campaign Name 标签列确定后,其余标签只在该列及左侧查找
    pub fn locate(index: &LabelIndex) -> Option<Self> {
        let name_hit = index.find_label(LABEL_CAMPAIGN_NAME)?;
        let labels = index.restricted_to(name_hit.column);
        Some(Self {
            campaign_name: name_hit.row,
            name_label_column: name_hit.column,
            campaign_type: labels.find_row(LABEL_CAMPAIGN_TYPE),
            date_of_send: labels.find_row(LABEL_DATE_OF_SEND),
            time_of_send: labels.find_row(LABEL_TIME_OF_SEND),
        })
    }
}

// ==========================================
// CampaignColumn - 有效活动列
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignColumn {
    pub column: u32,
    pub campaign_name: String,
    pub campaign_type: Option<String>,
    /// 发送日期原文
    pub send_date_text: Option<String>,
    /// 解析后的发送日期
    pub send_date: Option<NaiveDate>,
    pub day_of_week: Option<String>,
    pub time_of_send: Option<String>,
}

// ==========================================
// CampaignColumnExtractor - 活动列提取器
// ==========================================
pub struct CampaignColumnExtractor<'a> {
    layout: &'a LayoutProfile,
    normalizer: &'a TextNormalizer,
}

impl<'a> CampaignColumnExtractor<'a> {
    pub fn new(layout: &'a LayoutProfile, normalizer: &'a TextNormalizer) -> Self {
        Self { layout, normalizer }
    }

    /// 候选列窗口
    ///
    /// 起点不早于 Campaign Name 标签列的右侧一列,终点不超过表格最大列
    pub fn column_window<G: Grid + ?Sized>(
        &self,
        grid: &G,
        rows: &CampaignRows,
    ) -> RangeInclusive<u32> {
        let first = self
            .layout
            .campaign_first_column
            .max(rows.name_label_column + 1);
        let last = self.layout.campaign_last_column.min(grid.max_column());
        first..=last
    }

    /// 提取有效活动列
    pub fn extract<G: Grid + ?Sized>(&self, grid: &G, rows: &CampaignRows) -> Vec<CampaignColumn> {
        self.column_window(grid, rows)
            .filter_map(|col| self.read_column(grid, rows, col))
            .collect()
    }

    /// 读取单列（无效列返回 None）
    pub fn read_column<G: Grid + ?Sized>(
        &self,
        grid: &G,
        rows: &CampaignRows,
        col: u32,
    ) -> Option<CampaignColumn> {
        let campaign_name = match self.cell(grid, Some(rows.campaign_name), col) {
            Some(name) => name,
            None => {
                debug!(column = col, "Campaign Name 为空或占位文本,跳过该列");
                return None;
            }
        };

        let campaign_type = self.cell(grid, rows.campaign_type, col);
        let time_of_send = self.cell(grid, rows.time_of_send, col);

        let send_date_text = self.cell(grid, rows.date_of_send, col);
        let send_date = send_date_text.as_deref().and_then(parse_date);

        let day_of_week = rows
            .date_of_send
            .and_then(|row| self.cell(grid, Some(row + 1), col))
            .filter(|text| is_weekday_name(text))
            .or_else(|| send_date.map(weekday_name));

        debug!(
            column = col,
            campaign = %campaign_name,
            send_date = ?send_date,
            "识别活动列"
        );

        Some(CampaignColumn {
            column: col,
            campaign_name,
            campaign_type,
            send_date_text,
            send_date,
            day_of_week,
            time_of_send,
        })
    }

    fn cell<G: Grid + ?Sized>(&self, grid: &G, row: Option<u32>, col: u32) -> Option<String> {
        row.and_then(|r| self.normalizer.meaningful(grid.read(r, col)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MemoryGrid;

    fn layout() -> LayoutProfile {
        LayoutProfile::default()
    }

    fn base_grid() -> MemoryGrid {
        MemoryGrid::new()
            .with(2, 2, "Date of Send")
            .with(3, 2, "Day")
            .with(4, 2, "Time of Send")
            .with(5, 2, "Campaign Type")
            .with(6, 2, "Campaign Name")
    }

    fn extract(grid: &MemoryGrid) -> Vec<CampaignColumn> {
        let layout = layout();
        let normalizer = TextNormalizer::default();
        let index = LabelIndex::for_layout(grid, &layout);
        let rows = CampaignRows::locate(&index).unwrap();
        CampaignColumnExtractor::new(&layout, &normalizer).extract(grid, &rows)
    }

    #[test]
    fn test_sentinel_names_are_excluded() {
        let grid = base_grid()
            .with(6, 3, "TBD")
            .with(6, 4, "")
            .with(6, 5, "Spring Launch")
            .with(6, 6, "n/a");

        let columns = extract(&grid);
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].column, 5);
        assert_eq!(columns[0].campaign_name, "Spring Launch");
    }

    #[test]
    fn test_reads_send_details() {
        let grid = base_grid()
            .with(2, 3, "02/20/2025")
            .with(3, 3, "Thursday")
            .with(4, 3, "10 AM CT")
            .with(5, 3, "Promotions")
            .with(6, 3, "Flash Sale");

        let columns = extract(&grid);
        let col = &columns[0];
        assert_eq!(col.campaign_type.as_deref(), Some("Promotions"));
        assert_eq!(col.send_date, NaiveDate::from_ymd_opt(2025, 2, 20));
        assert_eq!(col.day_of_week.as_deref(), Some("Thursday"));
        assert_eq!(col.time_of_send.as_deref(), Some("10 AM CT"));
    }

    #[test]
    fn test_day_of_week_falls_back_to_date() {
        let grid = base_grid()
            .with(2, 3, "2025-02-21 00:00:00")
            .with(3, 3, "see notes")
            .with(6, 3, "Weekend Drop");

        let columns = extract(&grid);
        assert_eq!(columns[0].day_of_week.as_deref(), Some("Friday"));
    }

    #[test]
    fn test_unparseable_send_date_still_yields_column() {
        let grid = base_grid().with(2, 3, "TBD").with(6, 3, "Mystery Send");

        let columns = extract(&grid);
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].send_date, None);
        assert_eq!(columns[0].send_date_text, None);
        assert_eq!(columns[0].day_of_week, None);
    }

    #[test]
    fn test_label_column_c_shifts_window() {
        // 标签在 C 列时,C 列不能被当作活动列
        let grid = MemoryGrid::new()
            .with(2, 3, "Date of Send")
            .with(6, 3, "Campaign Name")
            .with(6, 4, "Launch Email");

        let columns = extract(&grid);
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].column, 4);
    }

    #[test]
    fn test_data_in_column_c_is_not_a_label() {
        // 标签在 B 列,C 列为活动数据;数据文本含关键字也不能改变标签行
        let grid = base_grid()
            .with(1, 3, "Time of Send moved up")
            .with(4, 3, "9 AM CT")
            .with(6, 3, "Early Bird");

        let index = LabelIndex::for_layout(&grid, &layout());
        let rows = CampaignRows::locate(&index).unwrap();
        assert_eq!(rows.time_of_send, Some(4));

        let columns = extract(&grid);
        assert_eq!(columns[0].time_of_send.as_deref(), Some("9 AM CT"));
    }

    #[test]
    fn test_window_capped_by_layout() {
        let mut grid = base_grid();
        for col in 3..=55 {
            grid.set(6, col, format!("Campaign {}", col));
        }
        let columns = extract(&grid);
        assert_eq!(columns.first().map(|c| c.column), Some(3));
        assert_eq!(columns.last().map(|c| c.column), Some(49));
    }

    #[test]
    fn test_missing_campaign_name_row() {
        let grid = MemoryGrid::new().with(2, 2, "Date of Send");
        let index = LabelIndex::for_layout(&grid, &layout());
        assert!(CampaignRows::locate(&index).is_none());
    }
}

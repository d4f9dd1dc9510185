// ==========================================
// DTC 日历转换系统 - 新品上市日历提取
// ==========================================
// 职责: "Product Launch Calendar" sheet → 新品上市任务
// 默认关闭,由配置 include_product_launches 开启
// ==========================================
// 表头（第 1 行）识别:
// - 通用列按子串匹配: description / launch date / priority / subcat / notes / sport
// - 品牌专属列按精确匹配（小写、去尾部冒号）
// 行规则: 必须同时有描述和可解析的上市日期
// ==========================================

use crate::config::{BrandProfile, ConverterConfig};
use crate::domain::{BriefKind, TagSet, TaskRecord, TaskStatus};
use crate::engine::date_normalizer::{format_date, parse_date};
use crate::engine::description::DescriptionBuilder;
use crate::engine::text_normalizer::TextNormalizer;
use crate::grid::Grid;
use tracing::{debug, warn};

pub const PRODUCT_LAUNCH_SHEET: &str = "Product Launch Calendar";
const HEADER_ROW: u32 = 1;

/// 表头列位置
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductLaunchColumns {
    pub description: Option<u32>,
    pub launch_date: Option<u32>,
    pub priority: Option<u32>,
    pub subcat: Option<u32>,
    pub notes: Option<u32>,
    pub sport: Option<u32>,
    /// (展示名, 列号)
    pub brand_fields: Vec<(String, u32)>,
}

impl ProductLaunchColumns {
    /// 从表头行识别列位置（同一角色取最左列）
    pub fn detect<G: Grid + ?Sized>(grid: &G, scan_columns: u32, brand: &BrandProfile) -> Self {
        let mut columns = Self::default();
        let last = scan_columns.min(grid.max_column());

        for col in 1..=last {
            let Some(raw) = grid.read(HEADER_ROW, col) else {
                continue;
            };
            let header = normalize_header(&raw);

            if let Some(field) = brand
                .product_launch_fields
                .iter()
                .find(|f| normalize_header(&f.keyword) == header)
            {
                columns.brand_fields.push((field.display.clone(), col));
                continue;
            }

            let slot = if header.contains("description") {
                &mut columns.description
            } else if header.contains("launch date") {
                &mut columns.launch_date
            } else if header.contains("priority") {
                &mut columns.priority
            } else if header.contains("subcat") {
                &mut columns.subcat
            } else if header.contains("notes") {
                &mut columns.notes
            } else if header.contains("sport") {
                &mut columns.sport
            } else {
                continue;
            };
            slot.get_or_insert(col);
        }

        columns
    }

    /// 描述列和上市日期列都存在才可提取
    pub fn is_usable(&self) -> bool {
        self.description.is_some() && self.launch_date.is_some()
    }
}

/// 表头标准化: 小写、去首尾空白与尾部冒号
fn normalize_header(text: &str) -> String {
    text.trim().trim_end_matches(':').trim().to_lowercase()
}

// ==========================================
// ProductLaunchExtractor - 新品上市提取器
// ==========================================
pub struct ProductLaunchExtractor<'a> {
    config: &'a ConverterConfig,
    normalizer: &'a TextNormalizer,
    brand: &'a str,
}

impl<'a> ProductLaunchExtractor<'a> {
    pub fn new(config: &'a ConverterConfig, normalizer: &'a TextNormalizer, brand: &'a str) -> Self {
        Self {
            config,
            normalizer,
            brand,
        }
    }

    pub fn extract<G: Grid + ?Sized>(&self, grid: &G) -> Vec<TaskRecord> {
        let profile = self.config.brand_profile(self.brand);
        let columns = ProductLaunchColumns::detect(
            grid,
            self.config.layout.product_header_scan_columns,
            &profile,
        );

        if !columns.is_usable() {
            warn!(
                sheet = PRODUCT_LAUNCH_SHEET,
                "未找到 Description / Launch Date 列,跳过新品上市提取"
            );
            return Vec::new();
        }

        let records: Vec<TaskRecord> = (HEADER_ROW + 1..=grid.max_row())
            .filter_map(|row| self.extract_row(grid, &columns, row))
            .collect();

        debug!(count = records.len(), "新品上市任务提取完成");
        records
    }

    fn extract_row<G: Grid + ?Sized>(
        &self,
        grid: &G,
        columns: &ProductLaunchColumns,
        row: u32,
    ) -> Option<TaskRecord> {
        let read = |col: Option<u32>| col.and_then(|c| self.normalizer.meaningful(grid.read(row, c)));

        let description = read(columns.description)?;
        let launch_date = read(columns.launch_date).as_deref().and_then(parse_date)?;

        let priority = self
            .config
            .product_launch_priority(read(columns.priority).as_deref());
        let subcat = read(columns.subcat);
        let notes = read(columns.notes);
        let sport = read(columns.sport);

        let launch_text = format_date(launch_date);
        let mut body = DescriptionBuilder::new();
        body.field("Product", Some(description.as_str()))
            .field("Launch Date", Some(launch_text.as_str()))
            .field("SKU/Subcat", subcat.as_deref());
        for (display, col) in &columns.brand_fields {
            body.field(display, read(Some(*col)).as_deref());
        }
        body.field("Notes", notes.as_deref());

        let mut tags = TagSet::new();
        tags.push(self.brand);
        tags.push(BriefKind::ProductLaunch.tag());
        if let Some(sport) = sport {
            tags.push(sport);
        }

        Some(TaskRecord {
            task_name: format!("[{}] {}", BriefKind::ProductLaunch.tag(), description),
            description: body.build(),
            due_date: Some(launch_date),
            start_date: None,
            priority,
            status: TaskStatus::Open,
            tags: tags.into_vec(),
            kind: BriefKind::ProductLaunch,
        })
    }
}

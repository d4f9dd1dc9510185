// ==========================================
// DTC 日历转换系统 - 简报构建器
// ==========================================
// 职责: 活动列 → 邮件简报任务（+ 可选 SMS 伴随任务）
// 输入: 表格 + 标签行解析结果 + 活动列
// 输出: 1 或 2 条 TaskRecord
// ==========================================
// 规则:
// - 字段行每个 sheet 解析一次,一行最多供给一个字段
// - 较长（更具体）的关键字先占行,展示顺序仍按模板顺序
// - 同名展示字段互为备选,先解析到行者生效
// - SMS 伴随任务: 资产勾选含 SMS / Creative Assets 提及 SMS / SMS 文案非空
// ==========================================

use crate::config::{BriefTemplate, ConverterConfig, FieldSpec, LayoutProfile};
use crate::domain::{BriefKind, Priority, TagSet, TaskRecord, TaskStatus};
use crate::engine::campaign_extractor::{CampaignColumn, CampaignRows};
use crate::engine::date_normalizer::{due_date_two_weeks_before_date, format_date};
use crate::engine::description::DescriptionBuilder;
use crate::engine::label_index::LabelIndex;
use crate::engine::text_normalizer::TextNormalizer;
use crate::grid::Grid;
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::debug;

pub const EMAIL_BRIEF_HEADER: &str = "== EMAIL BRIEF ==";
pub const SMS_BRIEF_HEADER: &str = "== SMS BRIEF ==";
pub const SMS_COPY_PLACEHOLDER: &str = "(to be added)";
pub const SMS_TAG: &str = "SMS";
const NO_ADDITIONAL_PRODUCTS: &str = "NO ADDITIONAL PRODUCTS";
const FEATURED_PRODUCT_KEYWORD: &str = "featured product";
const CREATIVE_ASSETS_DISPLAY: &str = "Creative Assets";
const OVERVIEW_DISPLAY: &str = "Overview";
const LANDING_PAGE_DISPLAY: &str = "Landing Page";

/// 资产勾选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFlag {
    Email,
    Sms,
    SiteBanner,
}

impl AssetFlag {
    /// 按标签文本识别（email / sms 精确匹配,site banner 子串匹配）
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.trim().to_lowercase();
        if lower == "email" {
            Some(AssetFlag::Email)
        } else if lower == "sms" {
            Some(AssetFlag::Sms)
        } else if lower.contains("site banner") {
            Some(AssetFlag::SiteBanner)
        } else {
            None
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            AssetFlag::Email => "Email",
            AssetFlag::Sms => "SMS",
            AssetFlag::SiteBanner => "Site Banner",
        }
    }
}

/// 已解析的字段行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub spec: FieldSpec,
    pub row: Option<u32>,
}

// ==========================================
// BriefRows - 单 sheet 的字段行解析结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct BriefRows {
    pub content: Vec<ResolvedField>,
    pub promotion: Vec<ResolvedField>,
    pub merchandising: Vec<ResolvedField>,
    pub asset_flags: Vec<(u32, AssetFlag)>,
    pub featured_products: Vec<u32>,
    pub sms_copy: Option<u32>,
}

impl BriefRows {
    /// 解析字段行
    ///
    /// # 参数
    /// - reserved: 已被活动固定标签占用的行
    pub fn resolve(
        index: &LabelIndex,
        template: &BriefTemplate,
        layout: &LayoutProfile,
        reserved: &[u32],
    ) -> Self {
        let sections = [
            &template.content_fields,
            &template.promotion_fields,
            &template.merchandising_fields,
        ];

        // (段序号, 段内序号, 字段)
        let mut claims: Vec<(usize, usize, &FieldSpec)> = sections
            .iter()
            .enumerate()
            .flat_map(|(s, fields)| fields.iter().enumerate().map(move |(i, f)| (s, i, f)))
            .collect();
        // 稳定排序: 关键字越长越先占行
        claims.sort_by(|a, b| b.2.keyword.trim().len().cmp(&a.2.keyword.trim().len()));

        let mut claimed: HashSet<u32> = reserved.iter().copied().collect();
        let mut resolved: Vec<Vec<ResolvedField>> = sections
            .iter()
            .map(|fields| {
                fields
                    .iter()
                    .map(|spec| ResolvedField {
                        spec: spec.clone(),
                        row: None,
                    })
                    .collect()
            })
            .collect();

        for (section, position, spec) in claims {
            if let Some(row) = index.find_unclaimed_row(&spec.keyword, &claimed) {
                claimed.insert(row);
                resolved[section][position].row = Some(row);
            }
        }

        let merchandising = resolved.pop().unwrap_or_default();
        let promotion = resolved.pop().unwrap_or_default();
        let content = resolved.pop().unwrap_or_default();

        let asset_flags: Vec<(u32, AssetFlag)> = content
            .iter()
            .find(|f| f.spec.display == OVERVIEW_DISPLAY)
            .and_then(|f| f.row)
            .map(|overview| {
                (overview + 1..=overview + layout.asset_flag_rows)
                    .filter_map(|row| {
                        index
                            .label_at(row)
                            .and_then(|label| AssetFlag::from_label(&label.text))
                            .map(|flag| (row, flag))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let featured_products = index.rows_where(|cell| {
            cell.contains(FEATURED_PRODUCT_KEYWORD) && !cell.contains("url")
        });

        let sms_copy = index.find_row_in(
            SMS_TAG,
            layout.sms_copy_first_row..=layout.sms_copy_last_row,
        );

        Self {
            content,
            promotion,
            merchandising,
            asset_flags,
            featured_products,
            sms_copy,
        }
    }

    /// 按展示名查找已解析行（所有段）
    pub fn row_for(&self, display: &str) -> Option<u32> {
        self.content
            .iter()
            .chain(self.promotion.iter())
            .chain(self.merchandising.iter())
            .filter(|f| f.spec.display == display)
            .find_map(|f| f.row)
    }
}

/// sheet 级上下文
#[derive(Debug, Clone)]
pub struct SheetContext {
    pub brand: String,
    pub week_id: String,
    /// 标题中的截止日期（发送日期缺失时使用）
    pub header_due_date: Option<NaiveDate>,
}

// ==========================================
// BriefBuilder - 简报构建器
// ==========================================
pub struct BriefBuilder<'a> {
    config: &'a ConverterConfig,
    normalizer: &'a TextNormalizer,
    rows: BriefRows,
}

impl<'a> BriefBuilder<'a> {
    pub fn new(
        config: &'a ConverterConfig,
        normalizer: &'a TextNormalizer,
        index: &LabelIndex,
        campaign_rows: &CampaignRows,
    ) -> Self {
        let reserved: Vec<u32> = [
            Some(campaign_rows.campaign_name),
            campaign_rows.campaign_type,
            campaign_rows.date_of_send,
            campaign_rows.time_of_send,
        ]
        .into_iter()
        .flatten()
        .collect();

        // 活动数据列不参与字段行匹配
        let labels = index.restricted_to(campaign_rows.name_label_column);
        let rows = BriefRows::resolve(&labels, &config.brief, &config.layout, &reserved);
        Self {
            config,
            normalizer,
            rows,
        }
    }

    pub fn rows(&self) -> &BriefRows {
        &self.rows
    }

    /// 构建一列的任务（邮件任务在前,SMS 伴随任务在后）
    pub fn build<G: Grid + ?Sized>(
        &self,
        grid: &G,
        ctx: &SheetContext,
        column: &CampaignColumn,
    ) -> Vec<TaskRecord> {
        let col = column.column;
        let campaign_type = column.campaign_type.as_deref();

        let task_name = match campaign_type {
            Some(t) => format!("[{}] {}: {}", ctx.week_id, t, column.campaign_name),
            None => format!("[{}] {}", ctx.week_id, column.campaign_name),
        };

        let due_date = column
            .send_date
            .and_then(due_date_two_weeks_before_date)
            .or(ctx.header_due_date);
        let priority: Priority = self.config.campaign_priority(campaign_type);

        let mut tags = TagSet::new();
        tags.push(ctx.brand.as_str());
        tags.push(ctx.week_id.as_str());
        tags.push(BriefKind::Email.tag());
        if let Some(t) = campaign_type {
            tags.push(t);
        }

        let assets = self.asset_flags(grid, col);
        let email = TaskRecord {
            task_name: task_name.clone(),
            description: self.email_description(grid, column, &assets),
            due_date,
            start_date: column.send_date,
            priority,
            status: TaskStatus::Open,
            tags: tags.clone().into_vec(),
            kind: BriefKind::Email,
        };

        let mut records = vec![email];

        let sms_copy = self.value(grid, self.rows.sms_copy, col);
        let creative_mentions_sms = self
            .value(grid, self.rows.row_for(CREATIVE_ASSETS_DISPLAY), col)
            .map(|text| text.contains(SMS_TAG))
            .unwrap_or(false);

        if assets.contains(&AssetFlag::Sms) || creative_mentions_sms || sms_copy.is_some() {
            debug!(column = col, task = %task_name, "生成 SMS 伴随任务");

            let mut sms_tags = tags;
            sms_tags.replace(BriefKind::Email.tag(), BriefKind::Sms.tag());
            sms_tags.push(SMS_TAG);

            records.push(TaskRecord {
                task_name: format!("[{}] {}", SMS_TAG, task_name),
                description: self.sms_description(grid, column, sms_copy.as_deref()),
                due_date,
                start_date: column.send_date,
                priority,
                status: TaskStatus::Open,
                tags: sms_tags.into_vec(),
                kind: BriefKind::Sms,
            });
        }

        records
    }

    fn email_description<G: Grid + ?Sized>(
        &self,
        grid: &G,
        column: &CampaignColumn,
        assets: &[AssetFlag],
    ) -> String {
        let col = column.column;
        let mut builder = DescriptionBuilder::new();
        builder
            .text(EMAIL_BRIEF_HEADER)
            .text(send_date_line(column))
            .text(campaign_type_line(column));

        for field in &self.rows.content {
            let value = self.value(grid, field.row, col);
            builder.field(&field.spec.display, value.as_deref());
        }

        if !assets.is_empty() {
            let names: Vec<&str> = assets.iter().map(AssetFlag::display).collect();
            builder.text(format!("Assets Needed: {}", names.join(", ")));
        }

        builder.section("Promotion");
        self.push_section_fields(&mut builder, grid, &self.rows.promotion, col);

        builder.section("Merchandising");
        self.push_section_fields(&mut builder, grid, &self.rows.merchandising, col);

        let featured = self.featured_products(grid, col);
        if !featured.is_empty() {
            builder.text("Featured Products:");
            for entry in featured {
                builder.text(entry);
            }
        }

        builder.build()
    }

    fn sms_description<G: Grid + ?Sized>(
        &self,
        grid: &G,
        column: &CampaignColumn,
        sms_copy: Option<&str>,
    ) -> String {
        let col = column.column;
        let overview = self.value(grid, self.rows.row_for(OVERVIEW_DISPLAY), col);
        let landing = self.value(grid, self.rows.row_for(LANDING_PAGE_DISPLAY), col);

        let mut builder = DescriptionBuilder::new();
        builder
            .text(SMS_BRIEF_HEADER)
            .text(send_date_line(column))
            .text(campaign_type_line(column))
            .field(OVERVIEW_DISPLAY, overview.as_deref())
            .field(LANDING_PAGE_DISPLAY, landing.as_deref())
            .text(format!(
                "SMS Copy: {}",
                sms_copy.unwrap_or(SMS_COPY_PLACEHOLDER)
            ));
        builder.build()
    }

    // 同名展示字段只输出第一个解析到行的
    fn push_section_fields<G: Grid + ?Sized>(
        &self,
        builder: &mut DescriptionBuilder,
        grid: &G,
        fields: &[ResolvedField],
        col: u32,
    ) {
        let mut seen: HashSet<&str> = HashSet::new();
        for field in fields {
            let Some(row) = field.row else {
                continue;
            };
            if !seen.insert(field.spec.display.as_str()) {
                continue;
            }
            let value = self.value(grid, Some(row), col);
            builder.field(&field.spec.display, value.as_deref());
        }
    }

    fn asset_flags<G: Grid + ?Sized>(&self, grid: &G, col: u32) -> Vec<AssetFlag> {
        self.rows
            .asset_flags
            .iter()
            .filter(|(row, _)| {
                grid.read(*row, col)
                    .map(|v| v.eq_ignore_ascii_case("yes"))
                    .unwrap_or(false)
            })
            .map(|(_, flag)| *flag)
            .collect()
    }

    fn featured_products<G: Grid + ?Sized>(&self, grid: &G, col: u32) -> Vec<String> {
        self.rows
            .featured_products
            .iter()
            .filter_map(|&row| {
                let product = self.value(grid, Some(row), col)?;
                if product.eq_ignore_ascii_case(NO_ADDITIONAL_PRODUCTS) {
                    return None;
                }
                let mut entry = format!("  - {}", product);
                if let Some(url) = self.value(grid, Some(row + 1), col) {
                    entry.push_str(&format!("\n    URL: {}", url));
                }
                Some(entry)
            })
            .collect()
    }

    fn value<G: Grid + ?Sized>(&self, grid: &G, row: Option<u32>, col: u32) -> Option<String> {
        row.and_then(|r| self.normalizer.meaningful(grid.read(r, col)))
    }
}

/// "Send Date: 02/20/2025 (Thursday) 10 AM CT"
///
/// 星期或时间缺失时省略对应部分
pub fn send_date_line(column: &CampaignColumn) -> String {
    let mut parts = vec![
        "Send Date:".to_string(),
        column
            .send_date
            .map(format_date)
            .unwrap_or_else(|| "TBD".to_string()),
    ];
    if let Some(day) = &column.day_of_week {
        parts.push(format!("({})", day));
    }
    if let Some(time) = &column.time_of_send {
        parts.push(time.clone());
    }
    parts.join(" ")
}

fn campaign_type_line(column: &CampaignColumn) -> String {
    format!(
        "Campaign Type: {}",
        column.campaign_type.as_deref().unwrap_or("TBD")
    )
}

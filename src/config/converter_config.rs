// ==========================================
// DTC 日历转换系统 - 转换配置
// ==========================================
// 职责: 引擎运行所需的全部查找表与布局参数
// 红线: 构造后只读,由编排器持有,不使用可变全局量
// ==========================================

use crate::domain::Priority;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// ConverterConfig - 转换配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// 活动类型 → 优先级（未命中为 Normal）
    pub campaign_type_priority: BTreeMap<String, Priority>,

    /// 新品优先级代码 (A-D) → 优先级
    pub product_priority: BTreeMap<String, Priority>,

    /// 跳过的非周表 sheet 名
    pub skip_sheets: Vec<String>,

    /// 视同空值的占位文本（大小写不敏感）
    pub empty_tokens: Vec<String>,

    /// 表格布局参数
    pub layout: LayoutProfile,

    /// 邮件简报字段模板
    pub brief: BriefTemplate,

    /// 品牌配置
    pub brands: Vec<BrandProfile>,

    /// 是否提取 Product Launch Calendar
    pub include_product_launches: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        let campaign_type_priority = [
            ("Product Launches", Priority::High),
            ("Promotions", Priority::High),
            ("Story Telling", Priority::Normal),
            ("Brand Moments", Priority::Normal),
            ("Problem Solving", Priority::Normal),
            ("Promo", Priority::High),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let product_priority = [
            ("A", Priority::Urgent),
            ("B", Priority::High),
            ("C", Priority::Normal),
            ("D", Priority::Low),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            campaign_type_priority,
            product_priority,
            skip_sheets: [
                "Product Launch Calendar",
                "Content Calendar",
                "Template",
                "Sheet3",
                "Marketing Pipeline",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            empty_tokens: vec!["TBD".to_string(), "N/A".to_string()],
            layout: LayoutProfile::default(),
            brief: BriefTemplate::default(),
            brands: vec![BrandProfile::pb(), BrandProfile::tgw()],
            include_product_launches: false,
        }
    }
}

impl ConverterConfig {
    /// 活动类型优先级（精确匹配,未命中/缺失为 Normal）
    pub fn campaign_priority(&self, campaign_type: Option<&str>) -> Priority {
        campaign_type
            .and_then(|t| self.campaign_type_priority.get(t).copied())
            .unwrap_or_default()
    }

    /// 新品优先级（A-D,未命中/缺失为 Normal）
    pub fn product_launch_priority(&self, code: Option<&str>) -> Priority {
        code.and_then(|c| self.product_priority.get(c.trim()).copied())
            .unwrap_or_default()
    }

    /// 按品牌代码查找配置（大小写不敏感）,未配置品牌返回空字段集
    pub fn brand_profile(&self, code: &str) -> BrandProfile {
        self.brands
            .iter()
            .find(|b| b.code.eq_ignore_ascii_case(code.trim()))
            .cloned()
            .unwrap_or_else(|| BrandProfile {
                code: code.trim().to_string(),
                product_launch_fields: Vec::new(),
            })
    }

    /// 配置自检
    ///
    /// # 返回
    /// - Err(String): 第一条不合法的参数说明
    pub fn validate(&self) -> Result<(), String> {
        let layout = &self.layout;
        if layout.label_columns.is_empty() {
            return Err("layout.label_columns 不能为空".to_string());
        }
        if layout.label_columns.contains(&0) {
            return Err("layout.label_columns 列号从 1 开始".to_string());
        }
        if layout.label_scan_first_row == 0 || layout.label_scan_first_row > layout.label_scan_last_row {
            return Err(format!(
                "layout 标签扫描行范围非法: {}..={}",
                layout.label_scan_first_row, layout.label_scan_last_row
            ));
        }
        if layout.campaign_first_column == 0
            || layout.campaign_first_column > layout.campaign_last_column
        {
            return Err(format!(
                "layout 活动列范围非法: {}..={}",
                layout.campaign_first_column, layout.campaign_last_column
            ));
        }
        if layout.sms_copy_first_row > layout.sms_copy_last_row {
            return Err(format!(
                "layout SMS 文案行范围非法: {}..={}",
                layout.sms_copy_first_row, layout.sms_copy_last_row
            ));
        }
        for field in self.brief.all_fields() {
            if field.keyword.trim().is_empty() {
                return Err(format!("brief 字段 '{}' 缺少 keyword", field.display));
            }
        }
        Ok(())
    }
}

// ==========================================
// LayoutProfile - 表格布局参数
// ==========================================
// 不同版本的周表: 标签在 B 列（数据从 C 列起）或 C 列（数据从 D 列起）
// 活动列窗口自动排除 Campaign Name 标签所在列及其左侧列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutProfile {
    pub label_columns: Vec<u32>,
    pub label_scan_first_row: u32,
    pub label_scan_last_row: u32,
    pub campaign_first_column: u32,
    pub campaign_last_column: u32,
    pub header_due_scan_rows: u32,
    pub header_due_scan_columns: u32,
    pub sms_copy_first_row: u32,
    pub sms_copy_last_row: u32,
    /// Overview 行之后扫描 Email/SMS/Site Banner 勾选行的行数
    pub asset_flag_rows: u32,
    pub product_header_scan_columns: u32,
}

impl Default for LayoutProfile {
    fn default() -> Self {
        Self {
            label_columns: vec![2, 3],
            label_scan_first_row: 1,
            label_scan_last_row: 54,
            campaign_first_column: 3,
            campaign_last_column: 49,
            header_due_scan_rows: 4,
            header_due_scan_columns: 4,
            sms_copy_first_row: 44,
            sms_copy_last_row: 50,
            asset_flag_rows: 5,
            product_header_scan_columns: 14,
        }
    }
}

// ==========================================
// FieldSpec - 标签字段
// ==========================================
// keyword: 标签列中匹配的子串（大小写不敏感）
// display: 描述中输出的字段名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub keyword: String,
    pub display: String,
}

impl FieldSpec {
    pub fn new(keyword: &str, display: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            display: display.to_string(),
        }
    }
}

// ==========================================
// BriefTemplate - 邮件简报字段模板
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BriefTemplate {
    pub content_fields: Vec<FieldSpec>,
    pub promotion_fields: Vec<FieldSpec>,
    pub merchandising_fields: Vec<FieldSpec>,
}

impl Default for BriefTemplate {
    fn default() -> Self {
        Self {
            content_fields: vec![
                FieldSpec::new("Overview", "Overview"),
                FieldSpec::new("Required Copy", "Required Copy"),
                FieldSpec::new("Creative Assets", "Creative Assets"),
            ],
            promotion_fields: vec![
                FieldSpec::new("Promo", "Promo"),
                FieldSpec::new("Offer", "Offer"),
                FieldSpec::new("Coupon Code", "Code"),
                FieldSpec::new("Coupon", "Code"),
                FieldSpec::new("Discount", "Discount"),
                FieldSpec::new("Promo Code", "Promo Code"),
                FieldSpec::new("Terms", "Terms"),
            ],
            merchandising_fields: vec![
                FieldSpec::new("DAM Assets", "DAM Assets"),
                FieldSpec::new("Hero Product URL", "Hero Product URL"),
                FieldSpec::new("makes this product special", "What Makes It Special"),
                FieldSpec::new("Inventory In House", "Inventory In House"),
                FieldSpec::new("Landing Page", "Landing Page"),
            ],
        }
    }
}

impl BriefTemplate {
    pub fn all_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.content_fields
            .iter()
            .chain(self.promotion_fields.iter())
            .chain(self.merchandising_fields.iter())
    }
}

// ==========================================
// BrandProfile - 品牌字段集
// ==========================================
// product_launch_fields: Product Launch Calendar 的品牌专属列
// keyword 与表头精确匹配（小写、去尾部冒号后比较）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandProfile {
    pub code: String,
    #[serde(default)]
    pub product_launch_fields: Vec<FieldSpec>,
}

impl BrandProfile {
    pub fn pb() -> Self {
        Self {
            code: "PB".to_string(),
            product_launch_fields: Vec::new(),
        }
    }

    pub fn tgw() -> Self {
        Self {
            code: "TGW".to_string(),
            product_launch_fields: vec![
                FieldSpec::new("sket task", "SKET Task"),
                FieldSpec::new("po #", "PO #"),
            ],
        }
    }
}

// ==========================================
// DTC 日历转换系统 - 任务领域模型
// ==========================================
// 职责: 引擎产出的任务记录 + 单次运行的统计与结果
// 生命周期: 每个活动列提取时创建，追加到输出序列后不再修改
// ==========================================

use crate::domain::types::{BriefKind, Priority, RunPhase, TaskStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 规范日期格式（MM/DD/YYYY）
pub const CANONICAL_DATE_FORMAT: &str = "%m/%d/%Y";

// ==========================================
// TaskRecord - 任务记录
// ==========================================
// 对齐: ClickUp 导入列
// Task Name, Task Description, Due Date, Start Date, Priority, Status, Tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task_name: String,          // 任务名（非空）
    pub description: String,        // 多行描述
    pub due_date: Option<NaiveDate>,   // 截止日期
    pub start_date: Option<NaiveDate>, // 开始日期（发送日期）
    pub priority: Priority,         // 优先级
    pub status: TaskStatus,         // 恒为 Open
    pub tags: Vec<String>,          // 有序去重标签
    pub kind: BriefKind,            // 简报类型（不写入 CSV）
}

impl TaskRecord {
    /// 截止日期（规范文本，缺失为空串）
    pub fn due_date_text(&self) -> String {
        format_optional_date(self.due_date)
    }

    /// 开始日期（规范文本，缺失为空串）
    pub fn start_date_text(&self) -> String {
        format_optional_date(self.start_date)
    }

    /// 标签拼接（", " 分隔）
    pub fn tags_text(&self) -> String {
        self.tags.join(", ")
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

fn format_optional_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(CANONICAL_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

// ==========================================
// TagSet - 有序去重标签集
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// 追加标签（空白或重复则忽略）
    pub fn push(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        let trimmed = tag.trim();
        if trimmed.is_empty() || self.0.iter().any(|t| t == trimmed) {
            return;
        }
        self.0.push(trimmed.to_string());
    }

    /// 替换标签（保持位置）
    pub fn replace(&mut self, from: &str, to: &str) {
        for tag in self.0.iter_mut() {
            if tag == from {
                *tag = to.to_string();
            }
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

// ==========================================
// ConversionStats - 单次运行统计
// ==========================================
// 每次运行开始时清零，运行过程中单调递增
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub campaign_tasks: usize,   // 周表任务数（含 SMS 伴随任务）
    pub sheets_processed: usize, // 产出任务的周表数
    pub product_launches: usize, // 新品上市任务数
}

impl ConversionStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ==========================================
// ConversionOutcome - 单次运行结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutcome {
    pub success: bool,
    pub phase: RunPhase,
    pub message: String,
    pub brand: String,
    pub input_path: String,
    pub output_path: String,
    pub stats: ConversionStats,
    pub total_tasks: usize,
}

impl ConversionOutcome {
    /// 转换摘要（面向用户的文本块）
    pub fn summary(&self) -> String {
        let rule = "=".repeat(60);
        let mut lines = vec![
            rule.clone(),
            "CONVERSION SUMMARY".to_string(),
            rule.clone(),
            format!("Brand:                {}", self.brand),
            format!("Excel File:           {}", self.input_path),
            format!("Output CSV:           {}", self.output_path),
            format!("Email Brief Tasks:    {}", self.stats.campaign_tasks),
            format!("Weekly Sheets:        {}", self.stats.sheets_processed),
        ];
        if self.stats.product_launches > 0 {
            lines.push(format!(
                "Product Launches:     {}",
                self.stats.product_launches
            ));
        }
        lines.push(format!("Total Tasks:          {}", self.total_tasks));
        lines.push(rule);
        lines.join("\n")
    }
}

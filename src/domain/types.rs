// ==========================================
// DTC 日历转换系统 - 领域类型定义
// ==========================================
// 职责: 任务优先级 / 任务状态 / 简报类型 / 运行阶段
// 序列化格式: 与 ClickUp 导入列取值一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 任务优先级 (Priority)
// ==========================================
// ClickUp 只接受这四个取值
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Urgent, // 紧急
    High,   // 高
    Normal, // 普通（默认）
    Low,    // 低
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Urgent => write!(f, "Urgent"),
            Priority::High => write!(f, "High"),
            Priority::Normal => write!(f, "Normal"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "urgent" => Ok(Priority::Urgent),
            "high" => Ok(Priority::High),
            "normal" => Ok(Priority::Normal),
            "low" => Ok(Priority::Low),
            other => Err(format!("未知优先级: {}", other)),
        }
    }
}

// ==========================================
// 任务状态 (Task Status)
// ==========================================
// 导入时恒为 Open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Open,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Open => write!(f, "Open"),
        }
    }
}

// ==========================================
// 简报类型 (Brief Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BriefKind {
    Email,         // 邮件简报（每个活动列一条）
    Sms,           // 短信伴随简报（按需派生）
    ProductLaunch, // 新品上市（Product Launch Calendar）
}

impl BriefKind {
    /// 简报类型对应的标签
    pub fn tag(&self) -> &'static str {
        match self {
            BriefKind::Email => "Email Brief",
            BriefKind::Sms => "SMS Brief",
            BriefKind::ProductLaunch => "Product Launch",
        }
    }
}

impl fmt::Display for BriefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

// ==========================================
// 运行阶段 (Run Phase)
// ==========================================
// Idle → Loaded → Extracted → Written → Done
// Idle → Failed（工作簿加载失败）
// Extracted → Failed（无周表 / CSV 写出失败）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunPhase {
    #[default]
    Idle,
    Loaded,
    Extracted,
    Written,
    Done,
    Failed,
}

impl RunPhase {
    /// 是否为终止状态
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::Done | RunPhase::Failed)
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunPhase::Idle => write!(f, "IDLE"),
            RunPhase::Loaded => write!(f, "LOADED"),
            RunPhase::Extracted => write!(f, "EXTRACTED"),
            RunPhase::Written => write!(f, "WRITTEN"),
            RunPhase::Done => write!(f, "DONE"),
            RunPhase::Failed => write!(f, "FAILED"),
        }
    }
}

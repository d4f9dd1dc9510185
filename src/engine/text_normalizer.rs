// ==========================================
// DTC 日历转换系统 - 文本标准化
// ==========================================
// 职责: 空值判定的唯一入口（TRIM + 占位文本 → None）
// 说明: 引擎内所有"字段是否为空"的判断都经过这里
// ==========================================

use crate::config::ConverterConfig;

#[derive(Debug, Clone)]
pub struct TextNormalizer {
    // 已转大写的占位文本
    empty_tokens: Vec<String>,
}

impl TextNormalizer {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            empty_tokens: tokens
                .into_iter()
                .map(|t| t.as_ref().trim().to_uppercase())
                .collect(),
        }
    }

    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::new(&config.empty_tokens)
    }

    /// 是否为占位文本（大小写不敏感,空串也算）
    pub fn is_sentinel(&self, text: &str) -> bool {
        let upper = text.trim().to_uppercase();
        upper.is_empty() || self.empty_tokens.iter().any(|t| *t == upper)
    }

    /// 有意义的文本: 裁剪后非空且不是占位文本
    pub fn meaningful(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if self.is_sentinel(trimmed) {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(["TBD", "N/A"])
    }
}

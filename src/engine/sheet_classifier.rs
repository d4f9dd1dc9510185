// ==========================================
// DTC 日历转换系统 - Sheet 分类器
// ==========================================
// 职责: 判定哪些 sheet 是周表,并提供可选周列表
// 规则:
// - 名称精确为 Wk<数字>（大小写不敏感）或包含 _wk<数字>
// - 不在跳过列表中（精确匹配）
// - 可选周列表按字典序排序;提取时按工作簿顺序处理
// ==========================================

use crate::config::ConverterConfig;
use once_cell::sync::Lazy;
use regex::Regex;

static WEEKLY_SHEET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(^Wk\d+$|_wk\d+)").expect("合法的正则"));

static WEEK_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[Ww]k\s*(\d+)").expect("合法的正则"));

// ==========================================
// SheetClassifier - Sheet 分类器
// ==========================================
#[derive(Debug, Clone)]
pub struct SheetClassifier {
    skip_sheets: Vec<String>,
}

impl SheetClassifier {
    pub fn new<I, S>(skip_sheets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            skip_sheets: skip_sheets.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::new(config.skip_sheets.iter().cloned())
    }

    pub fn is_skipped(&self, name: &str) -> bool {
        self.skip_sheets.iter().any(|s| s == name)
    }

    /// 是否为周表
    pub fn is_weekly(&self, name: &str) -> bool {
        !self.is_skipped(name) && WEEKLY_SHEET_RE.is_match(name)
    }

    /// 可选周列表（字典序）
    pub fn classify<S: AsRef<str>>(&self, sheet_names: &[S]) -> Vec<String> {
        let mut weekly: Vec<String> = sheet_names
            .iter()
            .map(|s| s.as_ref())
            .filter(|name| self.is_weekly(name))
            .map(str::to_string)
            .collect();
        weekly.sort();
        weekly
    }

    /// 本次运行要处理的周表（工作簿顺序）
    ///
    /// # 参数
    /// - selected: None 表示全部周表;Some(空) 表示不处理任何周表
    pub fn select<S: AsRef<str>>(
        &self,
        sheet_names: &[S],
        selected: Option<&[String]>,
    ) -> Vec<String> {
        sheet_names
            .iter()
            .map(|s| s.as_ref())
            .filter(|name| self.is_weekly(name))
            .filter(|name| match selected {
                Some(subset) => subset.iter().any(|s| s.as_str() == *name),
                None => true,
            })
            .map(str::to_string)
            .collect()
    }
}

impl Default for SheetClassifier {
    fn default() -> Self {
        Self::from_config(&ConverterConfig::default())
    }
}

/// 周标识（"Wk6"）,无周号时返回 sheet 名本身
///
/// # 示例
/// - "Wk6" → "Wk6"
/// - "PB_wk2_12" → "Wk2"
/// - "Wk 7" → "Wk7"
pub fn week_id(sheet_name: &str) -> String {
    WEEK_NUMBER_RE
        .captures(sheet_name)
        .and_then(|caps| caps.get(1))
        .map(|m| format!("Wk{}", m.as_str()))
        .unwrap_or_else(|| sheet_name.to_string())
}

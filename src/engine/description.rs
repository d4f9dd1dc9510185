// ==========================================
// DTC 日历转换系统 - 任务描述拼装器
// ==========================================
// 职责: 按固定顺序拼装多段描述文本
// 输入: 候选行序列（段标题 / 字段行 / 普通文本）
// 输出: 以换行连接的描述
// ==========================================
// 规则: 输出段标题前,若上一行也是段标题则先移除上一行
//       → 连续的空段只保留最后一个标题
// ==========================================

/// 段标题前缀
pub const SECTION_MARKER: &str = "---";

/// 候选行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionLine {
    /// 段标题（渲染为 "--- 名称 ---"）
    Section(String),
    /// 字段行: 值为空时不输出
    Field { label: String, value: Option<String> },
    /// 普通文本（原样输出,可含换行）
    Text(String),
}

impl DescriptionLine {
    /// 渲染结果（None 表示不输出）
    fn render(&self) -> Option<String> {
        match self {
            DescriptionLine::Section(name) => Some(format!("{0} {1} {0}", SECTION_MARKER, name)),
            DescriptionLine::Field { label, value } => value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| format!("{}: {}", label, v)),
            DescriptionLine::Text(text) => Some(text.clone()),
        }
    }
}

/// 是否为段标题行
pub fn is_section_header(line: &str) -> bool {
    line.starts_with(SECTION_MARKER)
}

/// 拼装描述
///
/// 一次遍历;段标题紧跟段标题时丢弃前者
pub fn assemble(lines: &[DescriptionLine]) -> String {
    let mut output: Vec<String> = Vec::with_capacity(lines.len());

    for line in lines {
        let Some(rendered) = line.render() else {
            continue;
        };

        if is_section_header(&rendered)
            && output.last().map(|l| is_section_header(l)).unwrap_or(false)
        {
            output.pop();
        }
        output.push(rendered);
    }

    output.join("\n")
}

// ==========================================
// DescriptionBuilder - 描述构建器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct DescriptionBuilder {
    lines: Vec<DescriptionLine>,
}

impl DescriptionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&mut self, name: &str) -> &mut Self {
        self.lines.push(DescriptionLine::Section(name.to_string()));
        self
    }

    pub fn field(&mut self, label: &str, value: Option<&str>) -> &mut Self {
        self.lines.push(DescriptionLine::Field {
            label: label.to_string(),
            value: value.map(str::to_string),
        });
        self
    }

    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(DescriptionLine::Text(text.into()));
        self
    }

    pub fn lines(&self) -> &[DescriptionLine] {
        &self.lines
    }

    pub fn build(&self) -> String {
        assemble(&self.lines)
    }
}

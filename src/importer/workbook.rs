// ==========================================
// DTC 日历转换系统 - 工作簿加载
// ==========================================
// 职责: 工作簿文件 → 按 sheet 名取得的 MemoryGrid
// 支持: Excel (.xlsx/.xlsm/.xls)
// ==========================================
// 单元格文本化:
// - 日期时间 → "YYYY-MM-DD HH:MM:SS"（纯时间 → "HH:MM:SS"）
// - 数值 → 最短十进制表示（3.0 → "3"）
// - 错误值/空单元格 → 不写入
// ==========================================

use crate::grid::MemoryGrid;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 支持的扩展名
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls"];

// ==========================================
// WorkbookSource Trait
// ==========================================
// 实现者: ExcelWorkbook（文件）/ InMemoryWorkbook（测试与嵌入调用）
pub trait WorkbookSource {
    /// 工作簿中的 sheet 名（工作簿顺序）
    fn sheet_names(&self) -> Vec<String>;

    /// 读取一个 sheet
    ///
    /// # 返回
    /// - Err(SheetNotFound): sheet 不存在
    /// - Err(ExcelParseError): sheet 内容无法解析
    fn load_sheet(&mut self, name: &str) -> ImportResult<MemoryGrid>;

    fn has_sheet(&self, name: &str) -> bool {
        self.sheet_names().iter().any(|s| s == name)
    }
}

// ==========================================
// ExcelWorkbook - calamine 工作簿
// ==========================================
pub struct ExcelWorkbook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

impl ExcelWorkbook {
    /// 打开工作簿
    ///
    /// # 返回
    /// - Err(FileNotFound): 文件不存在
    /// - Err(UnsupportedFormat): 扩展名不受支持
    /// - Err(ExcelParseError): 文件无法解析
    pub fn open<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let sheets = open_workbook_auto(path)?;
        debug!(path = %path.display(), "工作簿已打开");

        Ok(Self {
            path: path.to_path_buf(),
            sheets,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WorkbookSource for ExcelWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn load_sheet(&mut self, name: &str) -> ImportResult<MemoryGrid> {
        if !self.has_sheet(name) {
            return Err(ImportError::SheetNotFound(name.to_string()));
        }
        let range = self.sheets.worksheet_range(name)?;
        Ok(range_to_grid(&range))
    }
}

/// calamine 区域 → MemoryGrid（恢复绝对行列号）
pub fn range_to_grid(range: &Range<Data>) -> MemoryGrid {
    let mut grid = MemoryGrid::new();
    let Some((row_offset, col_offset)) = range.start() else {
        return grid;
    };

    for (r, c, cell) in range.used_cells() {
        if let Some(text) = cell_text(cell) {
            grid.set(row_offset + r as u32 + 1, col_offset + c as u32 + 1, text);
        }
    }
    if let Some((last_row, last_col)) = range.end() {
        grid.extend_bounds(last_row + 1, last_col + 1);
    }
    grid
}

/// 单元格文本
pub fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => {
            let format = if dt.as_f64() < 1.0 {
                "%H:%M:%S"
            } else {
                "%Y-%m-%d %H:%M:%S"
            };
            dt.as_datetime().map(|d| d.format(format).to_string())
        }
        Data::DateTimeIso(s) => Some(s.replacen('T', " ", 1)),
        Data::DurationIso(s) => Some(s.clone()),
    }
}

// ==========================================
// InMemoryWorkbook - 内存工作簿
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkbook {
    sheets: Vec<(String, MemoryGrid)>,
}

impl InMemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加 sheet（同名则替换,保持原位置）
    pub fn add_sheet(&mut self, name: impl Into<String>, grid: MemoryGrid) {
        let name = name.into();
        match self.sheets.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = grid,
            None => self.sheets.push((name, grid)),
        }
    }

    pub fn with_sheet(mut self, name: impl Into<String>, grid: MemoryGrid) -> Self {
        self.add_sheet(name, grid);
        self
    }
}

impl WorkbookSource for InMemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(n, _)| n.clone()).collect()
    }

    fn load_sheet(&mut self, name: &str) -> ImportResult<MemoryGrid> {
        self.sheets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, grid)| grid.clone())
            .ok_or_else(|| ImportError::SheetNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use tempfile::NamedTempFile;

    #[test]
    fn test_open_missing_file() {
        let result = ExcelWorkbook::open("does_not_exist.xlsx");
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_open_unsupported_extension() {
        let file = NamedTempFile::with_suffix(".txt").unwrap();
        let result = ExcelWorkbook::open(file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(ext)) if ext == "txt"));
    }

    #[test]
    fn test_open_corrupt_workbook() {
        let file = NamedTempFile::with_suffix(".xlsx").unwrap();
        std::fs::write(file.path(), b"not a zip archive").unwrap();
        let result = ExcelWorkbook::open(file.path());
        assert!(matches!(result, Err(ImportError::ExcelParseError(_))));
    }

    #[test]
    fn test_range_offset_is_restored() {
        // 区域从 B2 开始（0 起: (1, 1)）
        let mut range: Range<Data> = Range::new((1, 1), (3, 3));
        range.set_value((1, 1), Data::String("Date of Send".to_string()));
        range.set_value((2, 3), Data::Float(3.0));
        range.set_value((3, 2), Data::Empty);

        let grid = range_to_grid(&range);
        assert_eq!(grid.read(2, 2).as_deref(), Some("Date of Send"));
        assert_eq!(grid.read(3, 4).as_deref(), Some("3"));
        assert_eq!(grid.read(4, 3), None);
        assert_eq!(grid.max_row(), 4);
        assert_eq!(grid.max_column(), 4);
    }

    #[test]
    fn test_cell_text_variants() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::Int(42)).as_deref(), Some("42"));
        assert_eq!(cell_text(&Data::Float(2.5)).as_deref(), Some("2.5"));
        assert_eq!(cell_text(&Data::Bool(true)).as_deref(), Some("true"));
        assert_eq!(
            cell_text(&Data::DateTimeIso("2025-02-20T00:00:00".to_string())).as_deref(),
            Some("2025-02-20 00:00:00")
        );
    }

    #[test]
    fn test_in_memory_workbook() {
        let mut workbook = InMemoryWorkbook::new()
            .with_sheet("Wk6", MemoryGrid::new().with(1, 1, "a"))
            .with_sheet("Template", MemoryGrid::new())
            .with_sheet("Wk6", MemoryGrid::new().with(1, 1, "b"));

        assert_eq!(workbook.sheet_names(), vec!["Wk6", "Template"]);
        assert!(workbook.has_sheet("Template"));
        assert_eq!(workbook.load_sheet("Wk6").unwrap().read(1, 1).as_deref(), Some("b"));
        assert!(matches!(
            workbook.load_sheet("Wk9"),
            Err(ImportError::SheetNotFound(_))
        ));
    }
}

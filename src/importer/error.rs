// ==========================================
// DTC 日历转换系统 - 导入/导出错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 只有加载失败与写出失败会终止一次运行
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xlsm/.xls）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("工作表不存在: {0}")]
    SheetNotFound(String),

    // ===== 输出错误 =====
    #[error("CSV 写出失败: {0}")]
    CsvWriteError(String),

    #[error("文件写入失败 ({path}): {message}")]
    FileWriteError { path: String, message: String },

    // ===== 配置错误 =====
    #[error("配置读取失败 (path: {path}): {message}")]
    ConfigReadError { path: String, message: String },

    #[error("配置值格式错误 (key: {key}): {message}")]
    ConfigValueError { key: String, message: String },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvWriteError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::ConfigValueError {
            key: format!("line {}, column {}", err.line(), err.column()),
            message: err.to_string(),
        }
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ImportError::SheetNotFound("Wk6".to_string());
        assert_eq!(err.to_string(), "工作表不存在: Wk6");

        let err = ImportError::FileWriteError {
            path: "out.csv".to_string(),
            message: "denied".to_string(),
        };
        assert!(err.to_string().contains("out.csv"));
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ImportError = io.into();
        assert!(matches!(err, ImportError::FileReadError(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ broken").unwrap_err();
        let err: ImportError = json_err.into();
        assert!(matches!(err, ImportError::ConfigValueError { .. }));
    }
}

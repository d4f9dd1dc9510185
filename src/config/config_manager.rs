// ==========================================
// DTC 日历转换系统 - 配置管理器
// ==========================================
// 职责: 配置文件定位、加载、校验
// 存储: JSON 文件（缺省时使用内置默认值）
// ==========================================

use crate::config::converter_config::ConverterConfig;
use crate::importer::error::{ImportError, ImportResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "DTC_CLICKUP_CONFIG";

/// 默认配置文件名
pub const CONFIG_FILE_NAME: &str = "config.json";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    config: ConverterConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 使用内置默认配置
    pub fn with_defaults() -> Self {
        Self {
            config: ConverterConfig::default(),
            source: None,
        }
    }

    /// 加载配置
    ///
    /// # 参数
    /// - explicit_path: 显式指定的配置文件（必须存在）
    ///
    /// # 逻辑
    /// 1. 显式路径 → 读取,不存在即报错
    /// 2. 默认路径存在 → 读取
    /// 3. 否则使用内置默认值
    pub fn load(explicit_path: Option<&Path>) -> ImportResult<Self> {
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(ImportError::ConfigReadError {
                    path: path.display().to_string(),
                    message: "配置文件不存在".to_string(),
                });
            }
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("未找到配置文件,使用内置默认配置");
                Ok(Self::with_defaults())
            }
        }
    }

    /// 从 JSON 文件加载
    pub fn from_file(path: &Path) -> ImportResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| ImportError::ConfigReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config = Self::parse(&raw)?;
        info!(path = %path.display(), "配置文件加载完成");

        Ok(Self {
            config,
            source: Some(path.to_path_buf()),
        })
    }

    /// 解析 JSON 配置文本（缺省字段取默认值）并校验
    pub fn parse(raw: &str) -> ImportResult<ConverterConfig> {
        let config: ConverterConfig = serde_json::from_str(raw)?;
        config
            .validate()
            .map_err(|message| ImportError::ConfigValueError {
                key: "layout".to_string(),
                message,
            })?;
        Ok(config)
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    pub fn into_config(self) -> ConverterConfig {
        self.config
    }

    /// 配置来源（None 表示内置默认值）
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 导出当前配置（便于用户生成配置模板）
    pub fn to_json_pretty(&self) -> ImportResult<String> {
        serde_json::to_string_pretty(&self.config).map_err(ImportError::from)
    }
}

/// 默认配置文件路径
///
/// 优先读取环境变量 DTC_CLICKUP_CONFIG,否则使用用户配置目录
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    dirs::config_dir().map(|dir| dir.join("dtc-clickup").join(CONFIG_FILE_NAME))
}

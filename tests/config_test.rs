// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 配置文件 → 转换行为（占位文本、优先级、布局）
// ==========================================


use dtc_clickup::{ConfigManager, ConversionOrchestrator, ImportError, InMemoryWorkbook, Priority};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use test_helpers::{weekly_grid, CampaignSpec};

fn write_config(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".json").expect("创建临时配置失败");
    file.write_all(json.as_bytes()).expect("写入临时配置失败");
    file
}

#[test]
fn test_custom_priority_table_drives_task_priority() {
    let file = write_config(
        r#"{
            "campaign_type_priority": { "Brand Moments": "Urgent", "Promotions": "Low" }
        }"#,
    );
    let config = ConfigManager::load(Some(file.path()))
        .expect("配置加载失败")
        .into_config();

    let grid = weekly_grid(
        2,
        &[
            CampaignSpec::new("Anniversary", "Brand Moments", "05/01/2025"),
            CampaignSpec::new("Clearance", "Promotions", "05/02/2025"),
            CampaignSpec::new("Tips", "Problem Solving", "05/03/2025"),
        ],
    );
    let mut workbook = InMemoryWorkbook::new().with_sheet("Wk18", grid);
    let mut orch = ConversionOrchestrator::new(config, "PB");
    orch.extract(&mut workbook, None);

    let priorities: Vec<Priority> = orch.tasks().iter().map(|t| t.priority).collect();
    assert_eq!(priorities, vec![Priority::Urgent, Priority::Low, Priority::Normal]);
}

#[test]
fn test_extra_empty_tokens_are_treated_as_missing() {
    let file = write_config(r#"{ "empty_tokens": ["TBD", "N/A", "TBC"] }"#);
    let config = ConfigManager::load(Some(file.path())).unwrap().into_config();

    let grid = weekly_grid(
        2,
        &[
            CampaignSpec::new("tbc", "Promotions", "05/01/2025"),
            CampaignSpec::new("Kept", "Promotions", "05/02/2025").with(7, "TBC"),
        ],
    );
    let mut workbook = InMemoryWorkbook::new().with_sheet("Wk18", grid);
    let mut orch = ConversionOrchestrator::new(config, "PB");
    orch.extract(&mut workbook, None);

    assert_eq!(orch.tasks().len(), 1);
    assert_eq!(orch.tasks()[0].task_name, "[Wk18] Promotions: Kept");
    assert!(!orch.tasks()[0].description.contains("Overview"));
}

#[test]
fn test_custom_skip_list_changes_eligible_weeks() {
    let file = write_config(r#"{ "skip_sheets": ["Wk1"] }"#);
    let config = ConfigManager::load(Some(file.path())).unwrap().into_config();

    let workbook = InMemoryWorkbook::new()
        .with_sheet("Wk1", weekly_grid(2, &[]))
        .with_sheet("Wk2", weekly_grid(2, &[]))
        .with_sheet("Template", weekly_grid(2, &[]));
    let orch = ConversionOrchestrator::new(config, "PB");

    // 覆盖后的跳过列表不再包含 Template,但 Template 也不是周表
    assert_eq!(orch.available_weeks(&workbook), vec!["Wk2"]);
}

#[test]
fn test_invalid_layout_is_rejected() {
    let file = write_config(r#"{ "layout": { "campaign_first_column": 10, "campaign_last_column": 4 } }"#);
    let result = ConfigManager::load(Some(file.path()));
    assert!(matches!(result, Err(ImportError::ConfigValueError { .. })));
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let result = ConfigManager::load(Some(Path::new("/definitely/not/here.json")));
    assert!(matches!(result, Err(ImportError::ConfigReadError { .. })));
}

// ==========================================
// DTC 日历转换系统 - 转换编排器
// ==========================================
// 职责: 分类 → 逐 sheet 提取 → 汇总 → 写出
// 状态: Idle → Loaded → Extracted → Written → Done
//       加载失败 / 无周表 / 写出失败 → Failed
// ==========================================
// 红线:
// - 单 sheet 异常只记日志并跳过,不终止整次运行
// - 输出顺序: sheet 工作簿顺序,sheet 内按列号
// - 统计每次运行开始时清零
// ==========================================

use crate::config::ConverterConfig;
use crate::domain::{ConversionOutcome, ConversionStats, RunPhase, TaskRecord};
use crate::engine::product_launch::{ProductLaunchExtractor, PRODUCT_LAUNCH_SHEET};
use crate::engine::sheet_classifier::SheetClassifier;
use crate::engine::text_normalizer::TextNormalizer;
use crate::engine::weekly_sheet::WeeklySheetExtractor;
use crate::exporter::write_tasks_to_path;
use crate::importer::{ExcelWorkbook, ImportResult, WorkbookSource};
use chrono::{Datelike, Local};
use std::path::Path;
use tracing::{debug, error, info, instrument, warn, Span};
use uuid::Uuid;

// ==========================================
// ConversionOrchestrator - 转换编排器
// ==========================================
pub struct ConversionOrchestrator {
    config: ConverterConfig,
    normalizer: TextNormalizer,
    classifier: SheetClassifier,
    brand: String,
    default_year: i32,
    phase: RunPhase,
    tasks: Vec<TaskRecord>,
    stats: ConversionStats,
}

impl ConversionOrchestrator {
    /// 创建编排器
    ///
    /// # 参数
    /// - config: 转换配置（构造后只读）
    /// - brand: 品牌代码（PB / TGW / ...）
    pub fn new(config: ConverterConfig, brand: impl Into<String>) -> Self {
        let normalizer = TextNormalizer::from_config(&config);
        let classifier = SheetClassifier::from_config(&config);
        Self {
            config,
            normalizer,
            classifier,
            brand: brand.into().trim().to_string(),
            default_year: Local::now().year(),
            phase: RunPhase::Idle,
            tasks: Vec::new(),
            stats: ConversionStats::default(),
        }
    }

    /// 指定标题日期缺省年份（默认当前年）
    pub fn with_default_year(mut self, year: i32) -> Self {
        self.default_year = year;
        self
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<TaskRecord> {
        self.tasks
    }

    pub fn stats(&self) -> ConversionStats {
        self.stats
    }

    /// 可选周列表（字典序）
    pub fn available_weeks<W: WorkbookSource + ?Sized>(&self, workbook: &W) -> Vec<String> {
        self.classifier.classify(&workbook.sheet_names())
    }

    /// 打开工作簿并列出可选周
    pub fn list_weeks<P: AsRef<Path>>(&self, input: P) -> ImportResult<Vec<String>> {
        let workbook = ExcelWorkbook::open(input)?;
        Ok(self.available_weeks(&workbook))
    }

    /// 从已加载的工作簿提取任务
    ///
    /// # 参数
    /// - selected: None 处理全部周表;Some(空) 不处理任何周表
    ///
    /// # 返回
    /// 本次提取的任务总数
    pub fn extract<W: WorkbookSource + ?Sized>(
        &mut self,
        workbook: &mut W,
        selected: Option<&[String]>,
    ) -> usize {
        self.tasks.clear();
        self.stats.reset();

        let sheet_names = workbook.sheet_names();
        let targets = self.classifier.select(&sheet_names, selected);
        info!(
            weekly_sheets = targets.len(),
            selected = ?selected,
            "开始提取周表"
        );

        let extractor =
            WeeklySheetExtractor::new(&self.config, &self.normalizer, &self.brand, self.default_year);

        for sheet_name in &targets {
            let grid = match workbook.load_sheet(sheet_name) {
                Ok(grid) => grid,
                Err(e) => {
                    warn!(sheet = %sheet_name, error = %e, "sheet 读取失败,跳过");
                    continue;
                }
            };

            let extraction = extractor.extract(sheet_name, &grid);
            let count = extraction.task_count();
            if count > 0 {
                self.stats.sheets_processed += 1;
                self.stats.campaign_tasks += count;
                info!(sheet = %sheet_name, tasks = count, "周表提取完成");
            } else {
                debug!(sheet = %sheet_name, "周表没有产出任务");
            }
            self.tasks.extend(extraction.records);
        }

        if self.config.include_product_launches {
            self.extract_product_launches(workbook);
        }

        self.tasks.len()
    }

    fn extract_product_launches<W: WorkbookSource + ?Sized>(&mut self, workbook: &mut W) {
        if !workbook.has_sheet(PRODUCT_LAUNCH_SHEET) {
            warn!(sheet = PRODUCT_LAUNCH_SHEET, "工作簿中没有新品上市日历");
            return;
        }
        let grid = match workbook.load_sheet(PRODUCT_LAUNCH_SHEET) {
            Ok(grid) => grid,
            Err(e) => {
                warn!(sheet = PRODUCT_LAUNCH_SHEET, error = %e, "新品上市日历读取失败,跳过");
                return;
            }
        };

        let records =
            ProductLaunchExtractor::new(&self.config, &self.normalizer, &self.brand).extract(&grid);
        self.stats.product_launches = records.len();
        info!(tasks = self.stats.product_launches, "新品上市任务提取完成");
        self.tasks.extend(records);
    }

    /// 完整转换: 打开 → 提取 → 写出
    #[instrument(skip(self, input, output, selected), fields(run_id, brand = %self.brand))]
    pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        input: P,
        output: Q,
        selected: Option<&[String]>,
    ) -> ConversionOutcome {
        let input = input.as_ref();
        let output = output.as_ref();
        self.begin_run(input);

        let mut workbook = match ExcelWorkbook::open(input) {
            Ok(workbook) => workbook,
            Err(e) => {
                error!(error = %e, "工作簿加载失败");
                return self.fail(input, output, format!("工作簿加载失败: {}", e));
            }
        };

        self.run(&mut workbook, input, output, selected)
    }

    /// 对已打开的工作簿执行 提取 → 写出
    pub fn run<W: WorkbookSource + ?Sized>(
        &mut self,
        workbook: &mut W,
        input: &Path,
        output: &Path,
        selected: Option<&[String]>,
    ) -> ConversionOutcome {
        self.phase = RunPhase::Loaded;

        let eligible = self.available_weeks(workbook);
        self.extract(workbook, selected);
        self.phase = RunPhase::Extracted;

        if eligible.is_empty() {
            warn!("工作簿中没有周表");
            return self.fail(input, output, "工作簿中没有可处理的周表".to_string());
        }

        if let Err(e) = write_tasks_to_path(output, &self.tasks) {
            error!(error = %e, "CSV 写出失败");
            return self.fail(input, output, format!("CSV 写出失败: {}", e));
        }
        self.phase = RunPhase::Written;

        let outcome = self.outcome(true, input, output, "转换完成".to_string());
        self.phase = RunPhase::Done;
        info!(
            total_tasks = outcome.total_tasks,
            campaign_tasks = self.stats.campaign_tasks,
            sheets_processed = self.stats.sheets_processed,
            "转换完成"
        );

        ConversionOutcome {
            phase: self.phase,
            ..outcome
        }
    }

    fn begin_run(&mut self, input: &Path) {
        let run_id = Uuid::new_v4().to_string();
        Span::current().record("run_id", run_id.as_str());
        info!(run_id = %run_id, input = %input.display(), "开始转换");

        self.phase = RunPhase::Idle;
        self.tasks.clear();
        self.stats.reset();
    }

    fn fail(&mut self, input: &Path, output: &Path, message: String) -> ConversionOutcome {
        self.phase = RunPhase::Failed;
        self.outcome(false, input, output, message)
    }

    fn outcome(
        &self,
        success: bool,
        input: &Path,
        output: &Path,
        message: String,
    ) -> ConversionOutcome {
        ConversionOutcome {
            success,
            phase: self.phase,
            message,
            brand: self.brand.clone(),
            input_path: input.display().to_string(),
            output_path: output.display().to_string(),
            stats: self.stats,
            total_tasks: self.tasks.len(),
        }
    }
}

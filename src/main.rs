//! dtc-clickup - 营销日历 → ClickUp CSV
//!
//! Usage:
//!   dtc-clickup calendar.xlsx PB tasks.csv                 转换全部周表
//!   dtc-clickup calendar.xlsx PB tasks.csv --weeks Wk6,Wk7 只转换指定周
//!   dtc-clickup calendar.xlsx PB tasks.csv --list-weeks    列出可选周
//!   dtc-clickup calendar.xlsx TGW tasks.csv --product-launches

use anyhow::{Context, Result};
use clap::Parser;
use dtc_clickup::{logging, ConfigManager, ConversionOrchestrator, APP_NAME, VERSION};
use std::path::PathBuf;
use tracing::info;

/// 营销日历工作簿转换为 ClickUp 导入 CSV
#[derive(Parser, Debug)]
#[command(name = "dtc-clickup")]
#[command(version, about, long_about = None)]
struct Cli {
    /// 营销日历工作簿 (.xlsx / .xlsm / .xls)
    excel: PathBuf,

    /// 品牌代码（PB / TGW）
    brand: String,

    /// 输出 CSV 路径
    output: PathBuf,

    /// 只处理指定周表（逗号分隔,如 Wk6,Wk7）
    #[arg(long, value_delimiter = ',')]
    weeks: Option<Vec<String>>,

    /// 列出可选周表后退出
    #[arg(long)]
    list_weeks: bool,

    /// 追加新品上市日历任务
    #[arg(long)]
    product_launches: bool,

    /// JSON 配置文件
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();
    info!(app = APP_NAME, version = VERSION, "启动");

    let manager = ConfigManager::load(cli.config.as_deref()).context("配置加载失败")?;
    let mut config = manager.into_config();
    if cli.product_launches {
        config.include_product_launches = true;
    }

    let mut orchestrator = ConversionOrchestrator::new(config, cli.brand.as_str());

    if cli.list_weeks {
        let weeks = orchestrator
            .list_weeks(&cli.excel)
            .with_context(|| format!("无法读取工作簿: {}", cli.excel.display()))?;
        for week in weeks {
            println!("{}", week);
        }
        return Ok(());
    }

    let selected: Option<Vec<String>> = cli.weeks.map(|weeks| {
        weeks
            .into_iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect()
    });

    let outcome = orchestrator.convert(&cli.excel, &cli.output, selected.as_deref());
    println!("{}", outcome.summary());

    if !outcome.success {
        eprintln!("{}", outcome.message);
        std::process::exit(1);
    }
    Ok(())
}

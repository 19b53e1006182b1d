// ==========================================
// 每日库存模拟 - 命令行入口
// ==========================================
// 单次运行: 加载配置 → 初始化日志 → 推演 → 导出报表
// 任一步骤失败: 记录错误并以非零退出码结束
// ==========================================

use anyhow::Context;
use chrono::{Local, NaiveDate};
use inventory_simulate::config::SimulationConfig;
use inventory_simulate::engine::{InventorySimulation, SimulationOutcome};
use inventory_simulate::exporter::sink_for_format;
use inventory_simulate::importer::MappingFileLoader;
use inventory_simulate::repository::SqliteSourceRepository;
use inventory_simulate::{logging, SimulationError, APP_NAME, VERSION};
use std::process::ExitCode;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    let loaded = logging::with_console(SimulationConfig::load).map_err(SimulationError::from);
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            logging::with_console(|| error!(error = %e, "运行配置加载失败"));
            return ExitCode::FAILURE;
        }
    };

    let today = Local::now().date_naive();
    match logging::init_for_run(&config.log_dir, today) {
        Ok(path) => info!(log_file = %path.display(), "日志文件已就绪"),
        Err(e) => {
            logging::init();
            warn!(
                error = %e,
                log_dir = %config.log_dir.display(),
                "日志文件不可用，仅输出到控制台"
            );
        }
    }

    info!("==================================================");
    info!("{} v{}", APP_NAME, VERSION);
    info!("==================================================");

    let as_of = config.as_of_date.unwrap_or(today);
    match run(&config, as_of) {
        Ok(outcome) => {
            info!(
                report = %outcome.report_path.display(),
                parts = outcome.part_count,
                "报表已生成"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %format!("{:#}", e), "库存模拟运行失败");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &SimulationConfig, as_of: NaiveDate) -> anyhow::Result<SimulationOutcome> {
    info!(source_db = %config.source_db_path, "使用源数据库");

    let source = SqliteSourceRepository::new(&config.source_db_path)
        .map_err(SimulationError::from)?;
    let mapping = MappingFileLoader::new(&config.mapping_file_path);
    let sink = sink_for_format(config.report_format, &config.report_output_dir);

    let simulation = InventorySimulation::new(Box::new(source), Box::new(mapping), sink);

    let outcome = simulation
        .run(as_of)
        .with_context(|| format!("运行日期 {}", as_of))?;

    info!(
        outcome = %serde_json::to_string(&outcome).context("运行结果序列化失败")?,
        "运行摘要"
    );
    Ok(outcome)
}

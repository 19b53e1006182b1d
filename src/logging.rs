// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 支持环境变量配置日志级别
// 运行日志同时写入控制台与 logfile_YYYY-MM-DD.log
// ==========================================

use chrono::NaiveDate;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_filter() -> EnvFilter {
    // 从环境变量读取日志级别，默认为 info
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// 初始化日志系统（仅控制台）
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=inventory_simulate=trace
///
/// # 示例
/// ```no_run
/// use inventory_simulate::logging;
/// logging::init();
/// ```
pub fn init() {
    fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// 在临时控制台订阅者下执行 f（全局日志尚未初始化时使用）
///
/// 配置加载早于日志目录确定，此阶段的事件只输出到控制台
pub fn with_console<T>(f: impl FnOnce() -> T) -> T {
    let subscriber = fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_line_number(true)
        .finish();
    tracing::subscriber::with_default(subscriber, f)
}

/// 运行日志文件路径: <log_dir>/logfile_YYYY-MM-DD.log
pub fn log_file_path(log_dir: &Path, date: NaiveDate) -> PathBuf {
    log_dir.join(format!("logfile_{}.log", date.format("%Y-%m-%d")))
}

/// 初始化单次运行的日志系统（控制台 + 当日日志文件，追加写入）
///
/// # 返回
/// 日志文件路径；目录或文件无法创建时返回 io 错误
pub fn init_for_run(log_dir: &Path, date: NaiveDate) -> io::Result<PathBuf> {
    fs::create_dir_all(log_dir)?;
    let path = log_file_path(log_dir, date);
    let file: File = OpenOptions::new().create(true).append(true).open(&path)?;

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(env_filter())
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    Ok(path)
}

/// 初始化测试环境的日志系统
///
/// 使用更详细的日志级别，便于调试
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

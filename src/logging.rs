// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 支持环境变量配置日志级别
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 默认日志级别
const DEFAULT_LEVEL: &str = "info";

/// 测试默认日志级别（输出引擎的 debug 诊断）
const TEST_LEVEL: &str = "debug";

/// 初始化日志系统（输出到 stderr）
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=wps_advisor=trace
///
/// # 示例
/// ```no_run
/// use wps_advisor::logging;
/// logging::init();
/// ```
pub fn init() {
    // 从环境变量读取日志级别，默认为 info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    // 日志写 stderr，stdout 只输出 JSON
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// 初始化测试环境的日志系统
///
/// 使用更详细的日志级别，便于调试；重复调用无副作用
pub fn init_test() {
    // 已初始化时 try_init 返回 Err，忽略即可
    let _ = fmt()
        .with_env_filter(EnvFilter::new(TEST_LEVEL))
        .with_test_writer()
        .try_init();
}

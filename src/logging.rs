//! # 日志模块
//!
//! 使用 `tracing_subscriber` 把日志输出到标准错误，标准输出只留给结果信息。

use tracing_subscriber::EnvFilter;

/// 初始化日志。
///
/// 设置了 `RUST_LOG` 时以环境变量为准；否则 `--debug` 对应 debug 级别，
/// `--verbose` 对应 info 级别，默认只输出警告。重复调用不会报错。
pub fn init_logging(verbose: bool, debug: bool) {
    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

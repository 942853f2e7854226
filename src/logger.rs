//! 日志初始化
//!
//! 设置了 `RUST_LOG` 时以它为准；否则默认 `info`，`--debug` 时为 `debug`。
//! 日志写到 stderr，stdout 只输出预填链接。

use tracing_subscriber::EnvFilter;

pub fn init(debug: bool) {
    let default_level = if debug {
        "form_filler=debug,gff=debug"
    } else {
        "form_filler=info,gff=info"
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

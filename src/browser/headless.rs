use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{AppResult, BrowserError};

/// 启动参数
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub headless: bool,
    pub chrome_executable: Option<String>,
}

impl LaunchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            headless: config.headless,
            chrome_executable: config.chrome_executable.clone(),
        }
    }
}

/// 启动浏览器
pub async fn launch_headless_browser(options: &LaunchOptions) -> AppResult<Browser> {
    info!("🚀 启动浏览器 (无头模式: {})...", options.headless);

    let mut builder = BrowserConfig::builder();
    builder = if options.headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };
    builder = builder.no_sandbox().args(vec![
        "--disable-gpu",           // 无头模式必须禁用 GPU
        "--disable-dev-shm-usage", // 防止共享内存不足
    ]);

    if let Some(path) = &options.chrome_executable {
        debug!("浏览器路径: {}", path);
        builder = builder.chrome_executable(path);
    }

    let config = builder.build().map_err(|e| {
        error!("配置浏览器失败: {}", e);
        BrowserError::ConfigurationFailed(e)
    })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        BrowserError::LaunchFailed {
            source: Box::new(e),
        }
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(Duration::from_millis(300)).await;

    Ok(browser)
}

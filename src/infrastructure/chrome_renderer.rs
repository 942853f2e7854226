//! 页面渲染器 - 基础设施层
//!
//! 持有浏览器资源，只暴露"把一个 URL 渲染成 HTML"的能力

use async_trait::async_trait;
use chromiumoxide::{Browser, Page};
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::browser::{connect_to_browser, launch_headless_browser, LaunchOptions};
use crate::config::Config;
use crate::error::{AppResult, BrowserError};
use crate::services::collaborators::{PageRenderer, RenderedPage};

/// 基于 chromiumoxide 的渲染器
///
/// 每次渲染都打开一个新页面，结束后关闭；自己启动的浏览器在结束时一并关闭，
/// 通过调试端口连接的浏览器保持运行。
pub struct ChromeRenderer {
    debug_port: Option<u16>,
    launch: LaunchOptions,
    load_timeout: Duration,
    settle_delay: Duration,
}

impl ChromeRenderer {
    pub fn new(config: &Config) -> Self {
        Self {
            debug_port: config.browser_debug_port,
            launch: LaunchOptions::from_config(config),
            load_timeout: Duration::from_secs(config.page_load_timeout_secs),
            settle_delay: Duration::from_secs(config.render_settle_secs),
        }
    }

    async fn open_browser(&self) -> AppResult<Browser> {
        match self.debug_port {
            Some(port) => connect_to_browser(port).await,
            None => launch_headless_browser(&self.launch).await,
        }
    }

    async fn load(&self, browser: &Browser, url: &str) -> AppResult<RenderedPage> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::NavigationFailed {
                url: url.to_string(),
                source: Box::new(e),
            })?;

        let result = self.read_page(&page, url).await;

        if let Err(e) = page.close().await {
            warn!("关闭页面失败: {}", e);
        }
        result
    }

    async fn read_page(&self, page: &Page, url: &str) -> AppResult<RenderedPage> {
        match timeout(self.load_timeout, page.goto(url)).await {
            Err(_) => {
                return Err(BrowserError::LoadTimeout {
                    url: url.to_string(),
                    secs: self.load_timeout.as_secs(),
                }
                .into())
            }
            Ok(Err(e)) => {
                return Err(BrowserError::NavigationFailed {
                    url: url.to_string(),
                    source: Box::new(e),
                }
                .into())
            }
            Ok(Ok(_)) => {}
        }
        info!("已导航到: {}", url);

        // 等待页面脚本渲染完成
        sleep(self.settle_delay).await;

        let html = page.content().await?;
        let resolved_url = page.url().await?.unwrap_or_else(|| url.to_string());
        debug!("页面 HTML 长度: {} 字符, 最终地址: {}", html.len(), resolved_url);

        Ok(RenderedPage {
            markup: clean_html(&html),
            resolved_url,
        })
    }
}

#[async_trait]
impl PageRenderer for ChromeRenderer {
    async fn render(&self, url: &str) -> AppResult<RenderedPage> {
        let mut browser = self.open_browser().await?;
        let result = self.load(&browser, url).await;

        if self.debug_port.is_none() {
            if let Err(e) = browser.close().await {
                warn!("关闭浏览器失败: {}", e);
            }
            if let Err(e) = browser.wait().await {
                warn!("等待浏览器进程退出失败: {}", e);
            }
        }
        result
    }
}

fn script_or_style() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
            .expect("静态正则")
    })
}

/// 去掉所有 `<script>` 和 `<style>` 元素（连同内容）
pub fn clean_html(html: &str) -> String {
    script_or_style().replace_all(html, "").into_owned()
}

//! 终端交互 - 业务能力层
//!
//! 使用 dialoguer 读取用户输入。dialoguer 是阻塞式的，因此放到 `spawn_blocking` 中执行。

use async_trait::async_trait;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

use crate::error::{AppResult, PromptError};
use crate::services::collaborators::PromptChannel;

/// 终端提问通道
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePrompt;

impl ConsolePrompt {
    pub fn new() -> Self {
        Self
    }

    /// 读取一行可为空的文本
    pub async fn read_line(&self, header: &str, prompt: &str) -> AppResult<String> {
        let header = header.to_string();
        let prompt = prompt.to_string();
        run_blocking(move || {
            if !header.is_empty() {
                eprintln!("\n{}\n", header);
            }
            Input::<String>::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
                .map(|reply| reply.trim().to_string())
        })
        .await
    }

    /// 请求用户补充的背景信息
    pub async fn ask_user_context(&self) -> AppResult<String> {
        self.read_line(
            "📝 请输入你希望模型参考的背景信息（没有可直接回车）",
            ">",
        )
        .await
    }

    /// 请求表单地址
    pub async fn ask_form_url(&self) -> AppResult<String> {
        self.read_line("", "请输入 Google Form 链接").await
    }

    /// 是/否确认
    pub async fn confirm(&self, prompt: &str) -> AppResult<bool> {
        let prompt = prompt.to_string();
        run_blocking(move || {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .default(false)
                .interact()
        })
        .await
    }
}

#[async_trait]
impl PromptChannel for ConsolePrompt {
    async fn ask(&self, directive: &str) -> AppResult<String> {
        let header = format!("📝 需要你的补充信息\n{}", directive);
        self.read_line(&header, ">").await
    }
}

async fn run_blocking<T, F>(f: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> dialoguer::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| PromptError::InputFailed {
            source: Box::new(e),
        })?
        .map_err(|e| {
            PromptError::InputFailed {
                source: Box::new(e),
            }
            .into()
        })
}

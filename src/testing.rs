//! 测试工具
//!
//! 外部协作者的内存实现：返回预先准备好的内容并记录每次调用，
//! 不需要浏览器、模型或终端即可驱动完整流程。

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{AppError, AppResult, BrowserError, LlmError, PromptError, RetrievalError};
use crate::services::collaborators::{
    ModelService, PageRenderer, PromptChannel, RenderedPage, RetrievalService, RetrievedContext,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail(String),
}

/// 按顺序返回预设响应的模型
///
/// 响应用完后返回 `LlmError::EmptyContent`。
#[derive(Debug, Default)]
pub struct ScriptedModel {
    script: Mutex<VecDeque<Scripted>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub const MODEL_NAME: &'static str = "scripted";

    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(
                responses
                    .into_iter()
                    .map(|r| Scripted::Reply(r.into()))
                    .collect(),
            ),
            prompts: Mutex::default(),
        }
    }

    /// 在队列末尾追加一次调用失败
    pub fn then_fail(self, message: impl Into<String>) -> Self {
        lock(&self.script).push_back(Scripted::Fail(message.into()));
        self
    }

    /// 收到的所有提示词
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }
}

#[async_trait]
impl ModelService for ScriptedModel {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        lock(&self.prompts).push(prompt.to_string());
        match lock(&self.script).pop_front() {
            Some(Scripted::Reply(text)) => Ok(text),
            Some(Scripted::Fail(message)) => Err(AppError::llm_api_failed(
                Self::MODEL_NAME,
                io::Error::new(io::ErrorKind::Other, message),
            )),
            None => Err(LlmError::EmptyContent {
                model: Self::MODEL_NAME.to_string(),
            }
            .into()),
        }
    }
}

/// 按查询文本返回固定资料的检索服务，未知查询返回空
#[derive(Debug, Default)]
pub struct StaticRetrieval {
    contexts: HashMap<String, Vec<String>>,
    unavailable: bool,
    queries: Mutex<Vec<String>>,
}

impl StaticRetrieval {
    pub fn new<I, Q, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Q, Vec<C>)>,
        Q: Into<String>,
        C: Into<String>,
    {
        Self {
            contexts: entries
                .into_iter()
                .map(|(q, cs)| (q.into(), cs.into_iter().map(Into::into).collect()))
                .collect(),
            ..Self::default()
        }
    }

    /// 每次检索都返回 503
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// 收到的所有查询
    pub fn queries(&self) -> Vec<String> {
        lock(&self.queries).clone()
    }
}

#[async_trait]
impl RetrievalService for StaticRetrieval {
    async fn search(&self, query: &str) -> AppResult<Vec<RetrievedContext>> {
        lock(&self.queries).push(query.to_string());
        if self.unavailable {
            return Err(RetrievalError::BadStatus {
                endpoint: "static/search".to_string(),
                status: 503,
            }
            .into());
        }
        Ok(self
            .contexts
            .get(query)
            .map(|cs| {
                cs.iter()
                    .map(|c| RetrievedContext { context: c.clone() })
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// 按顺序返回预设回复的提问通道，回复用完后返回 `PromptError::NoReply`
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    replies: Mutex<VecDeque<String>>,
    directives: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            directives: Mutex::default(),
        }
    }

    /// 展示过的所有追问
    pub fn directives(&self) -> Vec<String> {
        lock(&self.directives).clone()
    }
}

#[async_trait]
impl PromptChannel for ScriptedPrompt {
    async fn ask(&self, directive: &str) -> AppResult<String> {
        lock(&self.directives).push(directive.to_string());
        lock(&self.replies)
            .pop_front()
            .ok_or_else(|| PromptError::NoReply.into())
    }
}

/// 总是返回同一页面的渲染器
#[derive(Debug)]
pub struct StaticRenderer {
    page: Option<RenderedPage>,
    requested: Mutex<Vec<String>>,
}

impl StaticRenderer {
    pub fn new(markup: impl Into<String>, resolved_url: impl Into<String>) -> Self {
        Self {
            page: Some(RenderedPage {
                markup: markup.into(),
                resolved_url: resolved_url.into(),
            }),
            requested: Mutex::default(),
        }
    }

    /// 每次渲染都超时
    pub fn timing_out() -> Self {
        Self {
            page: None,
            requested: Mutex::default(),
        }
    }

    /// 请求过的地址
    pub fn requested(&self) -> Vec<String> {
        lock(&self.requested).clone()
    }
}

#[async_trait]
impl PageRenderer for StaticRenderer {
    async fn render(&self, url: &str) -> AppResult<RenderedPage> {
        lock(&self.requested).push(url.to_string());
        self.page.clone().ok_or_else(|| {
            BrowserError::LoadTimeout {
                url: url.to_string(),
                secs: 0,
            }
            .into()
        })
    }
}

//! 外部协作者接口
//!
//! 流程层只依赖这些 trait：渲染页面、调用模型、检索资料、向用户提问。
//! 具体实现（chromiumoxide / async-openai / reqwest / dialoguer）在各自模块中，
//! 测试时用 `crate::testing` 中的内存实现替换。

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AppResult;

/// 渲染后的页面
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// 清理过 script/style 的 HTML
    pub markup: String,
    /// 跳转后的最终地址
    pub resolved_url: String,
}

/// 页面渲染能力
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// 加载并渲染页面，超时或传输错误都会使本次运行失败
    async fn render(&self, url: &str) -> AppResult<RenderedPage>;
}

/// 文本生成能力（无状态，一问一答）
#[async_trait]
pub trait ModelService: Send + Sync {
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}

/// 检索返回的一条资料
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RetrievedContext {
    pub context: String,
}

/// 资料检索能力
#[async_trait]
pub trait RetrievalService: Send + Sync {
    async fn search(&self, query: &str) -> AppResult<Vec<RetrievedContext>>;
}

/// 交互式提问通道，只在补充提问阶段使用
#[async_trait]
pub trait PromptChannel: Send + Sync {
    /// 展示追问内容并返回用户的一行回复
    async fn ask(&self, directive: &str) -> AppResult<String>;
}

/// 未配置检索服务时使用：不返回任何资料
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRetrieval;

#[async_trait]
impl RetrievalService for NoRetrieval {
    async fn search(&self, _query: &str) -> AppResult<Vec<RetrievedContext>> {
        Ok(Vec::new())
    }
}

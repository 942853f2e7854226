//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：校验配置、创建渲染器、模型、检索服务和提问通道
//! 2. **文档添加**：把本地文档推送到检索服务（与填表流程相互独立）
//! 3. **表单填写**：校验表单地址后委托 `form_processor` 处理
//! 4. **结果统计**：输出回答数量和预填链接
//!
//! ## 设计特点
//!
//! - **资源所有者**：唯一持有渲染器和各服务实例的模块
//! - **依赖注入**：协作者可以替换，测试时使用 `crate::testing` 中的实现

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use crate::infrastructure::ChromeRenderer;
use crate::orchestrator::form_processor;
use crate::services::{
    ConsolePrompt, HttpRetrievalService, LlmService, ModelService, NoRetrieval, PageRenderer,
    PromptChannel, RetrievalService,
};
use crate::utils::logging::{log_startup, print_final_result};
use crate::workflow::{FormFlow, FormOutcome, FormUrl};

/// 应用主结构
pub struct App {
    config: Config,
    renderer: Arc<dyn PageRenderer>,
    flow: FormFlow,
    documents: Option<Arc<HttpRetrievalService>>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        config.validate().context("配置校验失败")?;
        log_startup(&config);

        let renderer = Arc::new(ChromeRenderer::new(&config));
        let model = Arc::new(LlmService::new(&config));
        let prompt = Arc::new(ConsolePrompt::new());

        let documents = HttpRetrievalService::from_config(&config).map(Arc::new);
        let retrieval: Arc<dyn RetrievalService> = match &documents {
            Some(service) => service.clone(),
            None => Arc::new(NoRetrieval),
        };

        let mut app = Self::with_collaborators(config, renderer, model, retrieval, prompt);
        app.documents = documents;
        Ok(app)
    }

    /// 使用指定的协作者创建应用
    pub fn with_collaborators(
        config: Config,
        renderer: Arc<dyn PageRenderer>,
        model: Arc<dyn ModelService>,
        retrieval: Arc<dyn RetrievalService>,
        prompt: Arc<dyn PromptChannel>,
    ) -> Self {
        let flow = FormFlow::new(&config, model, retrieval, prompt);
        Self {
            config,
            renderer,
            flow,
            documents: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 把文件逐个添加到检索服务，返回成功添加的数量
    ///
    /// 任一文件失败即停止。
    pub async fn add_documents(&self, files: &[PathBuf]) -> Result<usize> {
        let service = self
            .documents
            .as_ref()
            .context("未配置检索服务 (RETRIEVAL_BASE_URL)，无法添加文档")?;

        for (index, file) in files.iter().enumerate() {
            info!("📄 添加文档 {}/{}: {}", index + 1, files.len(), file.display());
            service
                .add_document(file)
                .await
                .with_context(|| format!("添加文档失败: {}", file.display()))?;
        }

        info!("✓ 已添加 {} 个文档", files.len());
        Ok(files.len())
    }

    /// 填写一张表单，返回预填链接和字段
    pub async fn fill_form(&self, url: &str, user_context: &str) -> Result<FormOutcome> {
        let form_url = FormUrl::parse(url, self.config.strict_form_url)?;
        info!("✓ 表单地址有效: {}", form_url);

        match form_processor::process_form(
            self.renderer.as_ref(),
            &self.flow,
            &form_url,
            user_context,
        )
        .await
        {
            Ok(outcome) => {
                print_final_result(
                    outcome.answered_count(),
                    outcome.schema.len(),
                    &outcome.prefilled_url,
                );
                Ok(outcome)
            }
            Err(e) => {
                error!("❌ 表单处理失败: {:#}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedModel, ScriptedPrompt, StaticRenderer};

    fn app(renderer: StaticRenderer, config: Config) -> App {
        App::with_collaborators(
            config,
            Arc::new(renderer),
            Arc::new(ScriptedModel::new(Vec::<String>::new())),
            Arc::new(NoRetrieval),
            Arc::new(ScriptedPrompt::default()),
        )
    }

    #[tokio::test]
    async fn test_invalid_url_fails_before_rendering() {
        let renderer = Arc::new(StaticRenderer::new("<form/>", "https://x/form"));
        let app = App::with_collaborators(
            Config::default(),
            renderer.clone(),
            Arc::new(ScriptedModel::default()),
            Arc::new(NoRetrieval),
            Arc::new(ScriptedPrompt::default()),
        );

        assert!(app.fill_form("https://example.com/form", "").await.is_err());
        assert!(renderer.requested().is_empty());
    }

    #[tokio::test]
    async fn test_add_documents_requires_retrieval_service() {
        let app = app(StaticRenderer::new("", ""), Config::default());
        let err = app
            .add_documents(&[PathBuf::from("cv.txt")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("RETRIEVAL_BASE_URL"));
    }

    #[test]
    fn test_initialize_rejects_missing_api_key() {
        assert!(App::initialize(Config::default()).is_err());
    }
}

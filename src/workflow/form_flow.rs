//! 表单处理流程 - 流程层
//!
//! 核心职责：定义"一张表单"从渲染结果到预填链接的完整处理流程
//!
//! 流程顺序：
//! 1. 模型分析 HTML → 提取字段结构
//! 2. 按每个问题检索资料（去重，保持首次出现的顺序）
//! 3. 模型回答全部问题 → 按 field_id 对齐答案
//! 4. （可选）对未回答的问题生成追问 → 用户回复 → 重新回答 → 合并
//! 5. 生成预填链接
//!
//! 任意一次外部调用失败都会进入 `Failed` 状态并原样返回错误，不自动重试。

use indexmap::IndexSet;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError, LlmError};
use crate::models::{coerce_fields, Field};
use crate::services::prompts::{analyze_form_prompt, answer_prompt, follow_up_prompt};
use crate::services::{ModelService, PromptChannel, RetrievalService};
use crate::utils::logging::{log_stage, log_stage_done};
use crate::utils::{extract_json_objects, truncate_text};
use crate::workflow::form_ctx::FormCtx;
use crate::workflow::gap_detector::{find_unanswered, merge_resolved};
use crate::workflow::prefill_url::build_prefilled_url;
use crate::workflow::reconcile::reconcile_answers;

/// 日志中 HTML 预览的最大长度
const MARKUP_PREVIEW_LEN: usize = 500;

/// 流程状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// 已拿到渲染后的页面
    Loaded,
    /// 已提取字段结构
    SchemaExtracted,
    /// 已检索资料
    ContextRetrieved,
    /// 已回答
    Answered,
    /// 第 `round` 轮补充提问
    GapResolution { round: usize },
    /// 预填链接已生成
    UrlReady,
    /// 失败（终态）
    Failed,
}

impl Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineState::Loaded => write!(f, "页面已加载"),
            PipelineState::SchemaExtracted => write!(f, "字段已提取"),
            PipelineState::ContextRetrieved => write!(f, "资料已检索"),
            PipelineState::Answered => write!(f, "问题已回答"),
            PipelineState::GapResolution { round } => write!(f, "补充提问 第{}轮", round),
            PipelineState::UrlReady => write!(f, "链接已生成"),
            PipelineState::Failed => write!(f, "失败"),
        }
    }
}

/// 一次成功运行的结果
#[derive(Debug, Clone)]
pub struct FormOutcome {
    pub prefilled_url: String,
    /// 最终的字段及答案
    pub schema: Vec<Field>,
    /// 依次经过的状态
    pub states: Vec<PipelineState>,
}

impl FormOutcome {
    /// 已回答的字段数
    pub fn answered_count(&self) -> usize {
        self.schema.iter().filter(|f| !f.is_unanswered()).count()
    }
}

/// 表单处理流程
///
/// - 编排完整的表单处理流程
/// - 决定何时提取、何时检索、何时追问
/// - 不持有任何资源（browser / page）
/// - 只依赖外部协作者接口（services）
pub struct FormFlow {
    model: Arc<dyn ModelService>,
    retrieval: Arc<dyn RetrievalService>,
    prompt: Arc<dyn PromptChannel>,
    gap_resolution: bool,
    max_gap_rounds: usize,
    require_fields: bool,
    verbose_logging: bool,
}

impl FormFlow {
    /// 创建新的表单处理流程
    pub fn new(
        config: &Config,
        model: Arc<dyn ModelService>,
        retrieval: Arc<dyn RetrievalService>,
        prompt: Arc<dyn PromptChannel>,
    ) -> Self {
        Self {
            model,
            retrieval,
            prompt,
            gap_resolution: config.gap_resolution,
            max_gap_rounds: config.max_gap_rounds,
            require_fields: config.require_fields,
            verbose_logging: config.verbose_logging,
        }
    }

    /// 为一张已渲染的表单开始一次运行
    pub fn start(&self, ctx: FormCtx, markup: impl Into<String>) -> FormRun<'_> {
        FormRun {
            flow: self,
            ctx,
            markup: markup.into(),
            fields: Vec::new(),
            contexts: IndexSet::new(),
            prefilled_url: None,
            history: vec![PipelineState::Loaded],
        }
    }

    /// 完整运行一次流程
    pub async fn run(&self, ctx: FormCtx, markup: impl Into<String>) -> AppResult<FormOutcome> {
        let mut run = self.start(ctx, markup);
        run.execute().await?;
        Ok(run.into_outcome())
    }
}

/// 单次运行
///
/// 字段列表在整个运行期间只属于这里，各阶段按顺序修改它。
pub struct FormRun<'a> {
    flow: &'a FormFlow,
    ctx: FormCtx,
    markup: String,
    fields: Vec<Field>,
    contexts: IndexSet<String>,
    prefilled_url: Option<String>,
    history: Vec<PipelineState>,
}

impl<'a> FormRun<'a> {
    /// 当前状态
    pub fn state(&self) -> PipelineState {
        self.history
            .last()
            .copied()
            .unwrap_or(PipelineState::Loaded)
    }

    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// 已检索到的资料（去重后）
    pub fn contexts(&self) -> impl Iterator<Item = &str> {
        self.contexts.iter().map(String::as_str)
    }

    /// 依次执行所有阶段，返回预填链接
    pub async fn execute(&mut self) -> AppResult<String> {
        info!("{} 开始处理", self.ctx);

        self.extract_schema().await?;
        self.retrieve_context().await?;
        self.synthesize_answers().await?;

        if self.flow.gap_resolution {
            for round in 1..=self.flow.max_gap_rounds {
                if !self.resolve_gaps(round).await? {
                    break;
                }
            }
        }

        Ok(self.build_url())
    }

    /// 阶段 1：分析 HTML，提取字段结构
    pub async fn extract_schema(&mut self) -> AppResult<&[Field]> {
        log_stage("分析表单结构");
        if self.flow.verbose_logging {
            debug!("表单 HTML:\n{}", self.markup);
        } else {
            debug!(
                "表单 HTML:\n{}",
                truncate_text(&self.markup, MARKUP_PREVIEW_LEN)
            );
        }

        let prompt = analyze_form_prompt(&self.markup, &self.ctx.current_date);
        let response = self.generate(&prompt).await?;

        let records = extract_json_objects(&response);
        self.fields = coerce_fields(&records);
        debug!(
            "模型返回 {} 条记录，有效字段 {} 个",
            records.len(),
            self.fields.len()
        );

        if self.fields.is_empty() {
            if self.flow.require_fields {
                error!("{} ❌ 没有识别到任何字段", self.ctx);
                return Err(self.fail(ConfigError::EmptySchema.into()));
            }
            warn!("{} ⚠️ 没有识别到任何字段", self.ctx);
        }

        self.advance(PipelineState::SchemaExtracted);
        log_stage_done("分析表单结构");
        info!("📋 识别到 {} 个字段", self.fields.len());
        Ok(&self.fields)
    }

    /// 阶段 2：按每个问题检索资料
    pub async fn retrieve_context(&mut self) -> AppResult<()> {
        log_stage("检索相关资料");

        for index in 0..self.fields.len() {
            let query = self.fields[index].field_text.clone();
            let result = self.flow.retrieval.search(&query).await;
            let docs = self.check(result)?;
            for doc in docs {
                if !self.contexts.insert(doc.context) {
                    debug!("跳过重复资料");
                }
            }
        }

        self.advance(PipelineState::ContextRetrieved);
        log_stage_done("检索相关资料");
        info!("📚 共 {} 条不重复的资料", self.contexts.len());
        Ok(())
    }

    /// 阶段 3：回答全部问题
    pub async fn synthesize_answers(&mut self) -> AppResult<&[Field]> {
        log_stage("生成答案");

        let context = self.answer_context(&self.ctx.user_context);
        let fields = self.fields.clone();
        self.fields = self.answer(&fields, &context).await?;

        self.advance(PipelineState::Answered);
        log_stage_done("生成答案");
        info!(
            "✅ 已回答 {}/{}",
            self.fields.len() - find_unanswered(&self.fields).len(),
            self.fields.len()
        );
        Ok(&self.fields)
    }

    /// 阶段 4：一轮补充提问
    ///
    /// 没有未回答的字段时不做任何事并返回 `false`。
    pub async fn resolve_gaps(&mut self, round: usize) -> AppResult<bool> {
        let gaps = find_unanswered(&self.fields);
        if gaps.is_empty() {
            debug!("没有未回答的字段，跳过补充提问");
            return Ok(false);
        }

        self.advance(PipelineState::GapResolution { round });
        log_stage(&format!("补充提问 第{}轮（{} 个字段）", round, gaps.len()));

        let gaps_json = self.fields_json(&gaps)?;
        let base_context = self.answer_context(&self.ctx.user_context);
        let prompt = follow_up_prompt(&gaps_json, &base_context, &self.ctx.current_date);
        let directive = self.generate(&prompt).await?;

        let result = self.flow.prompt.ask(&directive).await;
        let reply = self.check(result)?;
        if reply.is_empty() {
            warn!("用户没有输入补充信息");
        }

        let extended = format!("{}\n{}\n{}", self.ctx.user_context, directive, reply);
        let context = self.answer_context(&extended);
        let blank: Vec<Field> = gaps.iter().map(Field::without_answer).collect();
        let resolved = self.answer(&blank, &context).await?;

        let updated = merge_resolved(&mut self.fields, &resolved);
        log_stage_done(&format!("补充提问 第{}轮", round));
        info!("✅ 补充回答了 {} 个字段", updated);
        Ok(true)
    }

    /// 阶段 5：生成预填链接
    pub fn build_url(&mut self) -> String {
        let url = build_prefilled_url(
            &self.fields,
            self.ctx.base_url.as_str(),
            self.ctx.reference_date(),
        );
        self.prefilled_url = Some(url.clone());
        self.advance(PipelineState::UrlReady);
        url
    }

    pub fn into_outcome(self) -> FormOutcome {
        FormOutcome {
            prefilled_url: self.prefilled_url.unwrap_or_default(),
            schema: self.fields,
            states: self.history,
        }
    }

    /// 让模型回答 `fields`，并按 field_id 对齐答案
    async fn answer(&mut self, fields: &[Field], context: &str) -> AppResult<Vec<Field>> {
        let fields_json = self.fields_json(fields)?;
        let prompt = answer_prompt(&fields_json, context, &self.ctx.current_date);
        let response = self.generate(&prompt).await?;
        let records = extract_json_objects(&response);
        Ok(reconcile_answers(fields, &records))
    }

    /// 用户背景信息 + 检索到的资料
    fn answer_context(&self, user_context: &str) -> String {
        let snippets: Vec<&str> = self.contexts().collect();
        format!(
            "{}\n\nAdditional context:\n{}",
            user_context,
            snippets.join("\n")
        )
    }

    fn fields_json(&mut self, fields: &[Field]) -> AppResult<String> {
        let result: AppResult<String> = serde_json::to_string_pretty(fields).map_err(|e| {
            LlmError::RequestBuildFailed {
                source: Box::new(e),
            }
            .into()
        });
        self.check(result)
    }

    async fn generate(&mut self, prompt: &str) -> AppResult<String> {
        let result = self.flow.model.generate(prompt).await;
        let response = self.check(result)?;
        debug!("模型响应:\n{}", truncate_text(&response, MARKUP_PREVIEW_LEN));
        Ok(response)
    }

    fn advance(&mut self, state: PipelineState) {
        debug!("{} 状态: {} → {}", self.ctx, self.state(), state);
        self.history.push(state);
    }

    fn check<T>(&mut self, result: AppResult<T>) -> AppResult<T> {
        result.map_err(|e| self.fail(e))
    }

    fn fail(&mut self, err: AppError) -> AppError {
        error!("{} ❌ 处理失败: {}", self.ctx, err);
        if self.state() != PipelineState::Failed {
            self.history.push(PipelineState::Failed);
        }
        err
    }
}

//! 单张表单处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **获取表单**：通过渲染器拿到清理后的 HTML 和跳转后的最终地址
//! 2. **确定基础地址**：最终地址去掉查询串后作为预填链接的基础
//! 3. **流程调度**：交给 `FormFlow` 完成提取、检索、回答和生成链接

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::services::PageRenderer;
use crate::utils::logging::{log_stage, log_stage_done};
use crate::workflow::{FormCtx, FormFlow, FormOutcome, FormUrl};

/// 处理单张表单
///
/// # 参数
/// - `renderer`: 页面渲染器
/// - `flow`: 表单处理流程
/// - `form_url`: 已校验的表单地址
/// - `user_context`: 用户提供的背景信息
///
/// # 返回
/// 返回预填链接和最终的字段
pub async fn process_form(
    renderer: &dyn PageRenderer,
    flow: &FormFlow,
    form_url: &FormUrl,
    user_context: &str,
) -> Result<FormOutcome> {
    log_stage("获取表单");
    let page = renderer
        .render(form_url.as_str())
        .await
        .with_context(|| format!("获取表单失败: {}", form_url))?;
    log_stage_done("获取表单");

    let base_url = match FormUrl::parse(&page.resolved_url, false) {
        Ok(url) => url,
        Err(e) => {
            warn!(
                "最终地址无法使用 ({})，改用输入地址: {}",
                e, form_url
            );
            form_url.clone()
        }
    };
    info!("📄 表单地址: {}", base_url);

    let ctx = FormCtx::new(base_url, user_context);
    let outcome = flow
        .run(ctx, page.markup)
        .await
        .with_context(|| format!("处理表单失败: {}", form_url))?;

    Ok(outcome)
}

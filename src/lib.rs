//! # Form Filler
//!
//! 用模型自动填写网页表单并生成预填链接的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Browser / Page），只暴露能力
//! - `ChromeRenderer` - 渲染表单页面，返回清理后的 HTML 和最终地址
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个能力对应一个 trait
//! - `LlmService` - 文本生成能力
//! - `HttpRetrievalService` - 资料检索和文档添加能力
//! - `ConsolePrompt` - 终端提问能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一张表单"的完整处理流程
//! - `FormCtx` - 上下文封装（基础地址 + 背景信息 + 当前日期）
//! - `FormFlow` - 流程编排（提取 → 检索 → 回答 → 追问 → 生成链接）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 应用入口，管理协作者和文档添加
//! - `orchestrator/form_processor` - 单张表单处理器
//!
//! ## 模块结构

pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod testing;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::ChromeRenderer;
pub use models::{Answer, Field, FieldType};
pub use orchestrator::{process_form, App};
pub use utils::extract_json_objects;
pub use workflow::{
    build_prefilled_url, find_unanswered, FormCtx, FormFlow, FormOutcome, FormUrl, PipelineState,
};

//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责资源管理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（校验配置、创建协作者）
//! - 持有渲染器和各服务实例
//! - 添加文档到检索服务
//! - 输出最终统计信息
//!
//! ### `form_processor` - 单张表单处理器
//! - 渲染表单，确定预填链接的基础地址
//! - 创建表单上下文并运行 FormFlow
//!
//! ## 层次关系
//!
//! ```text
//! app (配置 / 协作者 / 文档)
//!     ↓
//! form_processor (渲染一张表单)
//!     ↓
//! workflow::FormFlow (提取 → 检索 → 回答 → 追问 → 链接)
//!     ↓
//! services (能力层：llm / retrieval / prompt)
//!     ↓
//! infrastructure (基础设施：ChromeRenderer)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：app 管资源，form_processor 管单张表单
//! 2. **资源隔离**：只有编排层持有浏览器相关资源
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure
//! 4. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod app;
pub mod form_processor;

// 重新导出主要类型
pub use app::App;
pub use form_processor::process_form;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 检索服务错误
    #[error("检索服务错误: {0}")]
    Retrieval(#[from] RetrievalError),
    /// 交互输入错误
    #[error("交互输入错误: {0}")]
    Prompt(#[from] PromptError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 启动浏览器失败
    #[error("启动浏览器失败: {source}")]
    LaunchFailed {
        #[source]
        source: BoxError,
    },
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: BoxError,
    },
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        #[source]
        source: BoxError,
    },
    /// 页面加载超时
    #[error("页面加载超时 ({secs}秒): {url}")]
    LoadTimeout { url: String, secs: u64 },
    /// 读取页面内容失败
    #[error("读取页面内容失败: {source}")]
    ContentUnavailable {
        #[source]
        source: BoxError,
    },
    /// 浏览器配置失败
    #[error("浏览器配置失败: {0}")]
    ConfigurationFailed(String),
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 构建请求失败
    #[error("构建 LLM 请求失败: {source}")]
    RequestBuildFailed {
        #[source]
        source: BoxError,
    },
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: BoxError,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
}

/// 检索服务错误
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// 网络请求失败
    #[error("检索请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: BoxError,
    },
    /// 服务返回错误状态码
    #[error("检索服务返回错误状态 ({endpoint}): {status}")]
    BadStatus { endpoint: String, status: u16 },
    /// 响应解析失败
    #[error("检索响应解析失败 ({endpoint}): {source}")]
    DecodeFailed {
        endpoint: String,
        #[source]
        source: BoxError,
    },
}

/// 交互输入错误
#[derive(Debug, Error)]
pub enum PromptError {
    /// 读取终端输入失败
    #[error("读取用户输入失败: {source}")]
    InputFailed {
        #[source]
        source: BoxError,
    },
    /// 没有更多预设回复（测试用通道）
    #[error("没有可用的用户回复")]
    NoReply,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 表单 URL 无效
    #[error("无效的表单URL '{url}': {reason}")]
    InvalidFormUrl { url: String, reason: String },
    /// 不支持的表单（严格模式下只接受 Google Forms）
    #[error("不支持的表单URL '{url}'，请输入有效的 Google Form URL")]
    UnsupportedForm { url: String },
    /// 缺少 API 密钥
    #[error("缺少 LLM API 密钥 (LLM_API_KEY 或 GOOGLE_API_KEY)")]
    MissingApiKey,
    /// 检索服务地址无效
    #[error("无效的检索服务地址: {url}")]
    InvalidRetrievalUrl { url: String },
    /// 页面加载超时配置无效
    #[error("页面加载超时必须大于 0")]
    ZeroLoadTimeout,
    /// 表单中没有识别到任何字段
    #[error("表单中没有识别到任何字段")]
    EmptySchema,
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: BoxError,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 路径既不是文件也不是目录
    #[error("路径 '{path}' 不是有效的文件或目录")]
    NotFound { path: String },
    /// 目录为空
    #[error("目录中没有文件: {path}")]
    EmptyDirectory { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: BoxError,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器连接错误
    pub fn browser_connection_failed(
        port: u16,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::ConnectionFailed {
            port,
            source: Box::new(source),
        })
    }

    /// 创建检索请求失败错误
    pub fn retrieval_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Retrieval(RetrievalError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建LLM API调用错误
    pub fn llm_api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }
}

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::ContentUnavailable {
            source: Box::new(err),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use crate::error::{AppError, AppResult, ConfigError};

/// 程序配置
///
/// 加载顺序：默认值 → TOML 配置文件（可选）→ 环境变量 → 命令行参数
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- 浏览器配置 ---
    /// 已运行浏览器的调试端口；为空时启动新的无头浏览器
    pub browser_debug_port: Option<u16>,
    /// 是否无头模式
    pub headless: bool,
    /// 浏览器可执行文件路径
    pub chrome_executable: Option<String>,
    /// 页面加载超时（秒）
    pub page_load_timeout_secs: u64,
    /// 页面加载后等待渲染完成的时间（秒）
    pub render_settle_secs: u64,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    // --- 检索服务配置 ---
    /// 检索服务地址；为空时不检索
    pub retrieval_base_url: Option<String>,
    /// 每个问题返回的片段数
    pub retrieval_top_k: usize,
    // --- 流程配置 ---
    /// 是否在有未回答字段时向用户追问
    pub gap_resolution: bool,
    /// 追问的最大轮数
    pub max_gap_rounds: usize,
    /// 没有识别到字段时是否视为错误
    pub require_fields: bool,
    /// 只接受 Google Forms 链接
    pub strict_form_url: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: None,
            headless: true,
            chrome_executable: None,
            page_load_timeout_secs: 30,
            render_settle_secs: 10,
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-1.5-pro-latest".to_string(),
            llm_temperature: 0.2,
            llm_max_tokens: 8192,
            retrieval_base_url: None,
            retrieval_top_k: 3,
            gap_resolution: false,
            max_gap_rounds: 1,
            require_fields: false,
            strict_form_url: true,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从 TOML 文件加载配置，文件中缺少的键使用默认值
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    fn from_toml_str(content: &str, origin: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| {
            ConfigError::TomlParseFailed {
                path: origin.to_string(),
                source: Box::new(e),
            }
            .into()
        })
    }

    /// 在默认值基础上应用环境变量
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env_overrides(|name| std::env::var(name).ok())
    }

    /// 用环境变量覆盖当前配置
    ///
    /// `lookup` 便于测试时替换真实环境。
    pub fn with_env_overrides<F>(mut self, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = parse_var::<u16, _>(&lookup, "BROWSER_DEBUG_PORT")? {
            self.browser_debug_port = Some(port);
        }
        if let Some(headless) = parse_var(&lookup, "HEADLESS")? {
            self.headless = headless;
        }
        if let Some(path) = lookup("CHROME_EXECUTABLE") {
            self.chrome_executable = Some(path);
        }
        if let Some(secs) = parse_var(&lookup, "PAGE_LOAD_TIMEOUT_SECS")? {
            self.page_load_timeout_secs = secs;
        }
        if let Some(secs) = parse_var(&lookup, "RENDER_SETTLE_SECS")? {
            self.render_settle_secs = secs;
        }
        if let Some(key) = lookup("LLM_API_KEY").or_else(|| lookup("GOOGLE_API_KEY")) {
            self.llm_api_key = key;
        }
        if let Some(base) = lookup("LLM_API_BASE_URL") {
            self.llm_api_base_url = base;
        }
        if let Some(model) = lookup("LLM_MODEL_NAME") {
            self.llm_model_name = model;
        }
        if let Some(url) = lookup("RETRIEVAL_BASE_URL") {
            self.retrieval_base_url = Some(url).filter(|u| !u.trim().is_empty());
        }
        if let Some(rounds) = parse_var(&lookup, "MAX_GAP_ROUNDS")? {
            self.max_gap_rounds = rounds;
        }
        if let Some(strict) = parse_var(&lookup, "STRICT_FORM_URL")? {
            self.strict_form_url = strict;
        }
        if let Some(verbose) = parse_var(&lookup, "VERBOSE_LOGGING")? {
            self.verbose_logging = verbose;
        }
        Ok(self)
    }

    /// 在创建任何外部服务之前检查配置
    pub fn validate(&self) -> AppResult<()> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey.into());
        }
        if self.page_load_timeout_secs == 0 {
            return Err(ConfigError::ZeroLoadTimeout.into());
        }
        if let Some(base) = &self.retrieval_base_url {
            match url::Url::parse(base) {
                Ok(u) if matches!(u.scheme(), "http" | "https") => {}
                _ => {
                    return Err(ConfigError::InvalidRetrievalUrl { url: base.clone() }.into());
                }
            }
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> AppResult<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value.trim().parse::<T>().map(Some).map_err(|_| {
            ConfigError::EnvVarParseFailed {
                var_name: name.to_string(),
                value,
                expected_type: std::any::type_name::<T>().to_string(),
            }
            .into()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default()
            .with_env_overrides(env(&[
                ("GOOGLE_API_KEY", "g-key"),
                ("BROWSER_DEBUG_PORT", "9222"),
                ("MAX_GAP_ROUNDS", "2"),
                ("HEADLESS", "false"),
                ("RETRIEVAL_BASE_URL", "http://localhost:8000"),
            ]))
            .unwrap();
        assert_eq!(config.llm_api_key, "g-key");
        assert_eq!(config.browser_debug_port, Some(9222));
        assert_eq!(config.max_gap_rounds, 2);
        assert!(!config.headless);
        assert_eq!(
            config.retrieval_base_url.as_deref(),
            Some("http://localhost:8000")
        );
    }

    #[test]
    fn test_llm_api_key_takes_precedence() {
        let config = Config::default()
            .with_env_overrides(env(&[("GOOGLE_API_KEY", "g"), ("LLM_API_KEY", "l")]))
            .unwrap();
        assert_eq!(config.llm_api_key, "l");
    }

    #[test]
    fn test_bad_env_value_is_reported() {
        let err = Config::default()
            .with_env_overrides(env(&[("PAGE_LOAD_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::EnvVarParseFailed { ref var_name, .. })
                if var_name == "PAGE_LOAD_TIMEOUT_SECS"
        ));
    }

    #[test]
    fn test_toml_partial_file_keeps_defaults() {
        let config = Config::from_toml_str(
            "llm_model_name = \"gpt-4o-mini\"\ngap_resolution = true\n",
            "inline",
        )
        .unwrap();
        assert_eq!(config.llm_model_name, "gpt-4o-mini");
        assert!(config.gap_resolution);
        assert_eq!(config.page_load_timeout_secs, 30);
    }

    #[test]
    fn test_toml_parse_error() {
        let err = Config::from_toml_str("max_gap_rounds = \"many\"", "bad.toml").unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::TomlParseFailed { .. })));
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        assert!(matches!(
            config.validate(),
            Err(AppError::Config(ConfigError::MissingApiKey))
        ));

        config.llm_api_key = "key".into();
        assert!(config.validate().is_ok());

        config.retrieval_base_url = Some("not a url".into());
        assert!(matches!(
            config.validate(),
            Err(AppError::Config(ConfigError::InvalidRetrievalUrl { .. }))
        ));

        config.retrieval_base_url = None;
        config.page_load_timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(AppError::Config(ConfigError::ZeroLoadTimeout))
        ));
    }
}

//! 表单处理上下文
//!
//! 封装"我正在填写哪张表单"这一信息：规范化后的表单地址、用户给出的背景信息，
//! 以及本次运行固定下来的当前日期。

use chrono::NaiveDate;
use regex::Regex;
use std::fmt::Display;
use std::sync::OnceLock;
use url::Url;

use crate::error::{AppResult, ConfigError};

fn google_form_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(https://docs\.google\.com/forms/d/e/[a-zA-Z0-9_-]+/viewform.*|https://forms\.gle/[a-zA-Z0-9_-]+)$",
        )
        .expect("静态正则")
    })
}

/// 规范化后的表单地址（http/https，已去掉查询串和片段）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormUrl(String);

impl FormUrl {
    /// 解析并规范化表单地址
    ///
    /// `strict` 为 true 时只接受 Google Forms 的链接。
    pub fn parse(input: &str, strict: bool) -> AppResult<Self> {
        let trimmed = input.trim();
        let invalid = |reason: &str| ConfigError::InvalidFormUrl {
            url: trimmed.to_string(),
            reason: reason.to_string(),
        };

        let mut url = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("只支持 http/https").into());
        }
        if url.host_str().is_none() {
            return Err(invalid("缺少主机名").into());
        }

        url.set_query(None);
        url.set_fragment(None);
        let normalized = url.to_string();

        if strict && !google_form_pattern().is_match(&normalized) {
            return Err(ConfigError::UnsupportedForm {
                url: trimmed.to_string(),
            }
            .into());
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FormUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 表单处理上下文
#[derive(Debug, Clone)]
pub struct FormCtx {
    /// 预填链接的基础地址
    pub base_url: FormUrl,

    /// 用户提供的背景信息
    pub user_context: String,

    /// 当前日期（`%Y-%m-%d`），写入所有提示词
    pub current_date: String,
}

impl FormCtx {
    /// 创建新的表单上下文，当前日期取本地时间
    pub fn new(base_url: FormUrl, user_context: impl Into<String>) -> Self {
        Self::with_date(
            base_url,
            user_context,
            chrono::Local::now().format("%Y-%m-%d").to_string(),
        )
    }

    pub fn with_date(
        base_url: FormUrl,
        user_context: impl Into<String>,
        current_date: impl Into<String>,
    ) -> Self {
        Self {
            base_url,
            user_context: user_context.into(),
            current_date: current_date.into(),
        }
    }

    /// 解析后的当前日期，格式不对时退回本地日期
    pub fn reference_date(&self) -> NaiveDate {
        NaiveDate::parse_from_str(&self.current_date, "%Y-%m-%d")
            .unwrap_or_else(|_| chrono::Local::now().date_naive())
    }
}

impl Display for FormCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[表单 {} 日期#{}]", self.base_url, self.current_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    const FORM: &str = "https://docs.google.com/forms/d/e/1FAIpQLSe_abc-123/viewform";

    #[test]
    fn test_parse_strips_query_and_fragment() {
        let url = FormUrl::parse(&format!("{}?usp=sf_link#top", FORM), true).unwrap();
        assert_eq!(url.as_str(), FORM);
    }

    #[test]
    fn test_parse_accepts_short_link() {
        let url = FormUrl::parse("  https://forms.gle/AbC123xyz ", true).unwrap();
        assert_eq!(url.as_str(), "https://forms.gle/AbC123xyz");
    }

    #[test]
    fn test_strict_rejects_other_hosts() {
        let err = FormUrl::parse("https://example.com/form", true).unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::UnsupportedForm { .. })
        ));
        assert_eq!(
            FormUrl::parse("https://example.com/form?x=1", false)
                .unwrap()
                .as_str(),
            "https://example.com/form"
        );
    }

    #[test]
    fn test_parse_rejects_invalid_input() {
        for input in ["", "not a url", "ftp://docs.google.com/forms", "mailto:a@b.c"] {
            assert!(
                matches!(
                    FormUrl::parse(input, false),
                    Err(AppError::Config(ConfigError::InvalidFormUrl { .. }))
                ),
                "应拒绝: {:?}",
                input
            );
        }
    }

    #[test]
    fn test_ctx_display() {
        let ctx = FormCtx::with_date(
            FormUrl::parse("https://x/form", false).unwrap(),
            "I am Ada",
            "2024-03-05",
        );
        assert_eq!(ctx.to_string(), "[表单 https://x/form 日期#2024-03-05]");
    }

    #[test]
    fn test_reference_date_parses_run_date() {
        let url = FormUrl::parse("https://x/form", false).unwrap();
        let ctx = FormCtx::with_date(url.clone(), "", "2024-03-05");
        assert_eq!(ctx.reference_date(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());

        let ctx = FormCtx::with_date(url, "", "someday");
        assert_eq!(ctx.reference_date(), chrono::Local::now().date_naive());
    }
}

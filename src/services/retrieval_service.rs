//! 检索服务 - 业务能力层
//!
//! 通过 HTTP 访问外部文档检索服务：
//! - `POST {base}/search`    `{"query", "limit"}` → `[{"context", ...}]`
//! - `POST {base}/documents` `{"source", "content"}` 添加文档
//!
//! 向量索引的构建和相似度计算都在外部服务中完成。

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, AppResult, FileError, RetrievalError};
use crate::services::collaborators::{RetrievalService, RetrievedContext};

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    limit: usize,
}

#[derive(Serialize)]
struct AddDocumentRequest<'a> {
    source: &'a str,
    content: &'a str,
}

/// HTTP 检索服务
pub struct HttpRetrievalService {
    client: Client,
    base_url: String,
    top_k: usize,
}

impl HttpRetrievalService {
    pub fn new(base_url: impl Into<String>, top_k: usize) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            top_k,
        }
    }

    /// 根据配置创建，未配置地址时返回 None
    pub fn from_config(config: &Config) -> Option<Self> {
        config
            .retrieval_base_url
            .as_deref()
            .map(|base| Self::new(base, config.retrieval_top_k))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// 读取文件内容并添加到检索服务
    pub async fn add_document(&self, path: &Path) -> AppResult<()> {
        let source = path.display().to_string();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::file_read_failed(&source, e))?;

        let endpoint = self.endpoint("documents");
        debug!("添加文档 {} ({} 字符) → {}", source, content.len(), endpoint);

        let response = self
            .client
            .post(&endpoint)
            .json(&AddDocumentRequest {
                source: &source,
                content: &content,
            })
            .send()
            .await
            .map_err(|e| AppError::retrieval_request_failed(&endpoint, e))?;

        if !response.status().is_success() {
            return Err(RetrievalError::BadStatus {
                endpoint,
                status: response.status().as_u16(),
            }
            .into());
        }

        info!("✓ 已添加文档: {}", source);
        Ok(())
    }
}

#[async_trait]
impl RetrievalService for HttpRetrievalService {
    async fn search(&self, query: &str) -> AppResult<Vec<RetrievedContext>> {
        let endpoint = self.endpoint("search");
        debug!("检索: {}", query);

        let response = self
            .client
            .post(&endpoint)
            .json(&SearchRequest {
                query,
                limit: self.top_k,
            })
            .send()
            .await
            .map_err(|e| AppError::retrieval_request_failed(&endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::BadStatus {
                endpoint,
                status: status.as_u16(),
            }
            .into());
        }

        let docs: Vec<RetrievedContext> =
            response
                .json()
                .await
                .map_err(|e| RetrievalError::DecodeFailed {
                    endpoint: endpoint.clone(),
                    source: Box::new(e),
                })?;

        debug!("检索到 {} 条资料", docs.len());
        Ok(docs)
    }
}

/// 收集待添加的文件
///
/// 路径是文件时返回它本身；是目录时返回目录下所有普通文件（按名称排序，不递归）。
pub fn collect_files(path: &Path) -> AppResult<Vec<PathBuf>> {
    let display = path.display().to_string();

    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(FileError::NotFound { path: display }.into());
    }

    let mut files = Vec::new();
    let entries = std::fs::read_dir(path).map_err(|e| AppError::file_read_failed(&display, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| AppError::file_read_failed(&display, e))?;
        let file_path = entry.path();
        if file_path.is_file() {
            files.push(file_path);
        }
    }

    if files.is_empty() {
        return Err(FileError::EmptyDirectory { path: display }.into());
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let service = HttpRetrievalService::new("http://localhost:8000/", 3);
        assert_eq!(service.endpoint("search"), "http://localhost:8000/search");
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        assert!(HttpRetrievalService::from_config(&config).is_none());

        config.retrieval_base_url = Some("http://rag.local".into());
        config.retrieval_top_k = 5;
        let service = HttpRetrievalService::from_config(&config).unwrap();
        assert_eq!(service.top_k, 5);
    }

    #[test]
    fn test_collect_files_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("cv.txt");
        std::fs::write(&file, "Ada Lovelace").unwrap();

        assert_eq!(collect_files(&file).unwrap(), vec![file]);
    }

    #[test]
    fn test_collect_files_directory_sorted_without_subdirs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.md"), "b").unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let files = collect_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.md"]);
    }

    #[test]
    fn test_collect_files_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            collect_files(dir.path()),
            Err(AppError::File(FileError::EmptyDirectory { .. }))
        ));
        assert!(matches!(
            collect_files(&dir.path().join("missing")),
            Err(AppError::File(FileError::NotFound { .. }))
        ));
    }
}

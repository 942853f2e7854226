//! 命令行参数

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "gff")]
#[command(about = "Google Form Filler: 用模型和本地文档自动填写表单，输出预填链接")]
#[command(version)]
pub struct Cli {
    /// 表单链接；不提供时交互式输入
    #[arg(long)]
    pub url: Option<String>,

    /// 背景信息；不提供时交互式输入
    #[arg(long)]
    pub context: Option<String>,

    /// 添加到检索服务的文档或目录
    #[arg(long, value_name = "PATH")]
    pub doc_add: Option<PathBuf>,

    /// 有未回答的问题时向用户追问
    #[arg(long)]
    pub copilot: bool,

    /// 输出调试日志
    #[arg(long)]
    pub debug: bool,

    /// TOML 配置文件
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// 命令行参数覆盖配置
    pub fn apply(&self, mut config: Config) -> Config {
        if self.copilot {
            config.gap_resolution = true;
        }
        if self.debug {
            config.verbose_logging = true;
        }
        config
    }
}

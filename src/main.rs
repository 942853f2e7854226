use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use form_filler::cli::Cli;
use form_filler::config::Config;
use form_filler::logger;
use form_filler::orchestrator::App;
use form_filler::services::{collect_files, ConsolePrompt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    logger::init(cli.debug);

    // 加载配置：默认值 → 配置文件 → 环境变量 → 命令行参数
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let config = cli.apply(config.with_env_overrides(|name| std::env::var(name).ok())?);

    // 初始化应用
    let app = App::initialize(config)?;
    let console = ConsolePrompt::new();

    // 添加文档
    if let Some(path) = &cli.doc_add {
        let files = collect_files(path)?;
        info!("找到 {} 个文件:", files.len());
        for file in &files {
            info!("  - {}", file.display());
        }

        if !console.confirm("是否添加这些文件？").await? {
            info!("未添加任何文件，程序结束");
            return Ok(());
        }
        app.add_documents(&files).await?;

        if !console.confirm("是否继续填写表单？").await? {
            info!("程序结束");
            return Ok(());
        }
    }

    // 填写表单
    let url = match cli.url {
        Some(url) => url,
        None => console.ask_form_url().await?,
    };
    let user_context = match cli.context {
        Some(context) => context,
        None => console.ask_user_context().await?,
    };

    let outcome = app
        .fill_form(&url, &user_context)
        .await
        .context("表单填写失败")?;

    println!("{}", outcome.prefilled_url);
    Ok(())
}

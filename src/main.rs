use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use paper_pipeline::utils::logging;
use paper_pipeline::{App, Config, StrategySet};

/// 文献处理流水线
#[derive(Debug, Parser)]
#[command(name = "paper-pipeline", version, about)]
struct Cli {
    /// TOML 配置文件
    #[arg(short, long, global = true, env = "PIPELINE_CONFIG")]
    config: Option<PathBuf>,

    /// 输出 debug 级别日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 检索文献并写出目录文件
    Collect {
        #[arg(short, long)]
        query: Option<String>,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// 按目录下载论文
    Download,
    /// 提取文本
    Extract {
        /// structural | ocr | both
        #[arg(short, long, default_value = "both")]
        strategy: StrategySet,
    },
    /// 为提取结果生成摘要
    Summarize,
    /// 重建对比报告和摘要索引
    Report,
    /// 依次运行 download → extract → summarize
    All {
        #[arg(short, long, default_value = "both")]
        strategy: StrategySet,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::load(cli.config.as_deref())?;
    config.verbose_logging |= cli.verbose;

    // 初始化日志
    logging::init(config.verbose_logging);

    let app = App::new(config);
    match cli.command {
        Command::Collect { query, limit } => {
            app.run_collect(query.as_deref(), limit).await?;
        }
        Command::Download => {
            app.run_download().await?;
        }
        Command::Extract { strategy } => {
            app.run_extract(&strategy).await?;
        }
        Command::Summarize => {
            app.run_summarize().await?;
        }
        Command::Report => app.run_report().await?,
        Command::All { strategy } => app.run_all(&strategy).await?,
    }

    Ok(())
}

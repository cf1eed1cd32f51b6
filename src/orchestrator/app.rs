//! 应用主结构 - 编排层
//!
//! ## 职责
//!
//! 每个命令对应一个阶段驱动：枚举工作项 → 交给 [`BatchRunner`] → 输出统计和报告。
//!
//! ## 核心功能
//!
//! 1. **collect**：检索文献并写出目录文件
//! 2. **download**：按目录下载论文
//! 3. **extract**：按所选策略提取文本，完成后生成对比报告
//! 4. **summarize**：为提取结果生成摘要，完成后生成索引
//! 5. **report**：只重建对比报告和摘要索引
//!
//! 单项失败不会中断阶段；只有枚举失败（如目录文件无法读取）才会使阶段报错。

use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::{
    list_files, load_catalog, plan_downloads, plan_extractions, BatchReport, DocumentItem,
    StrategySet,
};
use crate::orchestrator::reporting::{write_batch_report, write_comparison_report, write_summary_index};
use crate::orchestrator::BatchRunner;
use crate::services::{
    CatalogWriter, FailureWriter, LiteratureSearch, LlmService, SearchService, SummaryPrompt,
    TextGenerator,
};
use crate::utils::logging::{log_items_loaded, log_stage_start, print_final_stats};
use crate::workflow::{DownloadFlow, ExtractFlow, ItemProcessor, SummarizeFlow};

/// 应用主结构
pub struct App {
    config: Config,
    failure_writer: Arc<FailureWriter>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let failure_writer = Arc::new(FailureWriter::new(config.failure_log_file.clone()));
        Self {
            config,
            failure_writer,
        }
    }

    // ========== collect ==========

    /// 检索文献并写出目录，返回写入的条目数
    pub async fn run_collect(&self, query: Option<&str>, limit: Option<usize>) -> Result<usize> {
        let search = SearchService::new(&self.config)?;
        self.run_collect_with(&search, query, limit).await
    }

    pub async fn run_collect_with(
        &self,
        search: &dyn LiteratureSearch,
        query: Option<&str>,
        limit: Option<usize>,
    ) -> Result<usize> {
        let query = query.unwrap_or(&self.config.search_query);
        let limit = limit.unwrap_or(self.config.search_limit);

        let publications = search
            .search(query, limit)
            .await
            .with_context(|| format!("文献检索失败: {}", query))?;

        if publications.is_empty() {
            warn!("⚠️ 没有检索到任何文献: {}", query);
        }

        let written = CatalogWriter::new(self.config.catalog_file.clone())
            .write(query, &publications)
            .await?;
        println!("collect complete, entries: {}", written);
        Ok(written)
    }

    // ========== download ==========

    pub async fn run_download(&self) -> Result<BatchReport> {
        let references = load_catalog(&self.config.catalog_file).await?;
        let items = plan_downloads(references, &self.config.default_extension);

        let flow = DownloadFlow::new(&self.config)?;
        self.run_stage(flow, items, self.config.download_concurrency).await
    }

    // ========== extract ==========

    pub async fn run_extract(&self, strategies: &StrategySet) -> Result<BatchReport> {
        let flow = ExtractFlow::from_config(&self.config, strategies)?;
        self.run_extract_with(flow, strategies).await
    }

    /// 使用给定的提取流程（可注入自定义提取器）
    pub async fn run_extract_with(
        &self,
        flow: ExtractFlow,
        strategies: &StrategySet,
    ) -> Result<BatchReport> {
        let sources = list_files(&self.config.papers_dir, "pdf").await?;
        let items = plan_extractions(&sources, strategies);
        info!("📚 {} 个文档 × {} 种策略", sources.len(), strategies.len());

        let report = self
            .run_stage(flow, items, self.config.extract_concurrency)
            .await?;
        write_comparison_report(&self.config.markdown_dir).await?;
        Ok(report)
    }

    // ========== summarize ==========

    pub async fn run_summarize(&self) -> Result<BatchReport> {
        let generator: Arc<dyn TextGenerator> = Arc::new(LlmService::new(&self.config));
        self.run_summarize_with(generator).await
    }

    /// 使用给定的生成后端
    pub async fn run_summarize_with(&self, generator: Arc<dyn TextGenerator>) -> Result<BatchReport> {
        let prompt = Arc::new(SummaryPrompt::from_config(&self.config)?);

        let source_dir = self.config.strategy_dir(self.config.summarize_source);
        let items: Vec<DocumentItem> = list_files(&source_dir, "md")
            .await?
            .into_iter()
            .map(DocumentItem::new)
            .collect();

        let flow = SummarizeFlow::new(generator, prompt, self.config.summaries_dir.clone());
        let report = self
            .run_stage(flow, items, self.config.summarize_concurrency)
            .await?;
        write_summary_index(&self.config.summaries_dir).await?;
        Ok(report)
    }

    // ========== report ==========

    /// 只重建对比报告和摘要索引
    pub async fn run_report(&self) -> Result<()> {
        let (path, count) = write_comparison_report(&self.config.markdown_dir).await?;
        println!("comparison report: {} ({} documents)", path.display(), count);

        match write_summary_index(&self.config.summaries_dir).await? {
            Some(path) => println!("summary index: {}", path.display()),
            None => println!("summary index: no summaries"),
        }
        Ok(())
    }

    // ========== all ==========

    /// 依次运行 下载 → 提取 → 摘要
    pub async fn run_all(&self, strategies: &StrategySet) -> Result<()> {
        self.run_download().await?;
        self.run_extract(strategies).await?;
        self.run_summarize().await?;
        Ok(())
    }

    // ========== 公共部分 ==========

    async fn run_stage<P: ItemProcessor>(
        &self,
        processor: P,
        items: Vec<P::Item>,
        max_concurrent: usize,
    ) -> Result<BatchReport> {
        let stage = processor.stage();
        log_stage_start(stage.label(), max_concurrent);

        if items.is_empty() {
            warn!("⚠️ {}阶段没有待处理项", stage.label());
        } else {
            log_items_loaded(stage.label(), items.len());
        }

        let runner = BatchRunner::new(max_concurrent)
            .with_progress(self.config.show_progress)
            .with_failure_writer(self.failure_writer.clone());
        let report = runner.run(Arc::new(processor), items).await;

        print_final_stats(&report);
        println!("{}", report.summary_line());

        let path = write_batch_report(&report, &self.config.reports_dir).await?;
        info!("报告已保存至: {}", path.display());

        if report.has_failures() {
            info!("失败记录已保存至: {}", self.failure_writer.path().display());
            if self.config.fail_on_error {
                bail!("{}阶段有 {} 项失败", stage.label(), report.counts.failed);
            }
        }

        Ok(report)
    }
}

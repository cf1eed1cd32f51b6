//! 文本提取流程 - 流程层
//!
//! 一个文档 × 一种策略：输出已存在则跳过 → 提取 → 非空才写入
//! `<markdown_dir>/<tag>/<stem>_<tag>.md`

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use super::{ItemCtx, ItemProcessor};
use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::models::{ExtractStrategy, ExtractionItem, ProcessingResult, SkipReason, Stage, StrategySet};
use crate::services::{NougatExtractor, StructuralExtractor, TextExtractor};
use crate::utils::fs::{ensure_dir, file_size, save_non_empty};

pub struct ExtractFlow {
    extractors: HashMap<ExtractStrategy, Arc<dyn TextExtractor>>,
    markdown_dir: PathBuf,
}

impl ExtractFlow {
    /// 使用给定的提取器创建
    pub fn new(markdown_dir: impl Into<PathBuf>, extractors: Vec<Arc<dyn TextExtractor>>) -> Self {
        let extractors = extractors
            .into_iter()
            .map(|extractor| (extractor.strategy(), extractor))
            .collect();

        Self {
            extractors,
            markdown_dir: markdown_dir.into(),
        }
    }

    /// 按所选策略构建提取器；选中 OCR 但找不到 nougat 时直接报错
    pub fn from_config(config: &Config, strategies: &StrategySet) -> Result<Self> {
        let mut extractors: Vec<Arc<dyn TextExtractor>> = Vec::with_capacity(strategies.len());
        for strategy in strategies.iter() {
            match strategy {
                ExtractStrategy::Structural => extractors.push(Arc::new(StructuralExtractor)),
                ExtractStrategy::Ocr => extractors.push(Arc::new(NougatExtractor::from_config(config)?)),
            }
        }

        Ok(Self::new(config.markdown_dir.clone(), extractors))
    }

    fn output_path(&self, item: &ExtractionItem) -> PathBuf {
        self.markdown_dir
            .join(item.strategy.tag())
            .join(item.strategy.output_file_name(&item.stem()))
    }
}

#[async_trait]
impl ItemProcessor for ExtractFlow {
    type Item = ExtractionItem;

    fn stage(&self) -> Stage {
        Stage::Extract
    }

    fn describe(&self, item: &ExtractionItem) -> String {
        format!("{} ({})", item.stem(), item.strategy)
    }

    async fn precheck(&self, item: &ExtractionItem) -> Option<ProcessingResult> {
        if file_size(&self.output_path(item)).await.is_some() {
            debug!("⏭️ 已提取，跳过: {}", self.describe(item));
            return Some(ProcessingResult::Skipped(SkipReason::AlreadyExists));
        }

        match file_size(&item.source).await {
            Some(size) if size > 0 => None,
            _ => {
                info!("⏭️ 源文件缺失或为空，跳过: {}", item.source.display());
                Some(ProcessingResult::Skipped(SkipReason::EmptySource))
            }
        }
    }

    async fn process(&self, item: &ExtractionItem, ctx: &ItemCtx) -> PipelineResult<PathBuf> {
        let extractor = self.extractors.get(&item.strategy).ok_or_else(|| {
            PipelineError::external_tool(item.strategy.tag(), "未配置该策略的提取器")
        })?;

        info!("{} 📄 提取 [{}]: {}", ctx, item.strategy, item.stem());
        let text = extractor.extract(&item.source).await?;

        let target = self.output_path(item);
        if let Some(parent) = target.parent() {
            ensure_dir(parent).await?;
        }
        let saved = save_non_empty(&target, &text, &self.describe(item)).await?;

        info!("{} ✅ 已保存 {} ({} 字符)", ctx, saved.display(), text.chars().count());
        Ok(saved)
    }
}

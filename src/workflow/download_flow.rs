//! 下载流程 - 流程层
//!
//! 一条引用：校验 → 已有缓存则跳过 → 下载到 `<papers_dir>/<key>.<ext>`

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{info, warn};

use super::{ItemCtx, ItemProcessor};
use crate::config::Config;
use crate::error::PipelineResult;
use crate::models::{DownloadItem, ProcessingResult, SkipReason, Stage};
use crate::services::DownloadService;
use crate::utils::fs::{ensure_dir, file_size};
use crate::utils::validate_reference;

pub struct DownloadFlow {
    downloader: DownloadService,
    papers_dir: PathBuf,
    min_cached_bytes: u64,
}

impl DownloadFlow {
    pub fn new(config: &Config) -> PipelineResult<Self> {
        Ok(Self {
            downloader: DownloadService::new(config.fetch_timeout())?,
            papers_dir: config.papers_dir.clone(),
            min_cached_bytes: config.min_cached_bytes,
        })
    }
}

#[async_trait]
impl ItemProcessor for DownloadFlow {
    type Item = DownloadItem;

    fn stage(&self) -> Stage {
        Stage::Download
    }

    fn describe(&self, item: &DownloadItem) -> String {
        item.file_name()
    }

    async fn precheck(&self, item: &DownloadItem) -> Option<ProcessingResult> {
        if let Err(reason) = validate_reference(&item.reference.title, &item.reference.url) {
            warn!("⚠️ 跳过无效引用 \"{}\": {}", item.reference.title, reason);
            return Some(ProcessingResult::Skipped(SkipReason::InvalidReference));
        }

        let target = item.output_path(&self.papers_dir);
        match file_size(&target).await {
            Some(size) if size >= self.min_cached_bytes => {
                info!("⏭️ 已存在，跳过: {}", item.file_name());
                Some(ProcessingResult::Skipped(SkipReason::AlreadyExists))
            }
            Some(size) => {
                warn!("⚠️ 缓存文件不完整 ({} 字节)，重新下载: {}", size, item.file_name());
                None
            }
            None => None,
        }
    }

    async fn process(&self, item: &DownloadItem, ctx: &ItemCtx) -> PipelineResult<PathBuf> {
        ensure_dir(&self.papers_dir).await?;

        let target = item.output_path(&self.papers_dir);
        info!("{} 📥 下载: {}", ctx, item.reference.title);

        let bytes = self.downloader.fetch_to(&item.reference.url, &target).await?;

        info!("{} ✅ 已保存 {} ({} 字节)", ctx, item.file_name(), bytes);
        Ok(target)
    }
}

//! 流程层
//!
//! 每个阶段一个处理器，定义"一个工作项"的完整处理过程：
//! 先过幂等检查（`precheck`），通过后才占用并发名额执行 `process`。
//! 处理器不持有批次信息，也不关心并发。

pub mod download_flow;
pub mod extract_flow;
pub mod item_ctx;
pub mod summarize_flow;

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::PipelineResult;
use crate::models::{ProcessingResult, Stage};

pub use download_flow::DownloadFlow;
pub use extract_flow::ExtractFlow;
pub use item_ctx::ItemCtx;
pub use summarize_flow::SummarizeFlow;

/// 单个工作项的处理器
#[async_trait]
pub trait ItemProcessor: Send + Sync + 'static {
    type Item: Send + Sync + 'static;

    fn stage(&self) -> Stage;

    /// 用于日志和失败记录的简短描述
    fn describe(&self, item: &Self::Item) -> String;

    /// 幂等检查：返回 `Some` 时直接作为该项结果，不进入处理
    async fn precheck(&self, item: &Self::Item) -> Option<ProcessingResult>;

    /// 处理一个工作项，成功时返回产物路径
    async fn process(&self, item: &Self::Item, ctx: &ItemCtx) -> PipelineResult<PathBuf>;
}

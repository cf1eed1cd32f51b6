//! 文本提取能力
//!
//! 每种提取策略一个实现，彼此独立，只负责"一个文件 → 一段文本"

pub mod ocr;
pub mod structural;

use async_trait::async_trait;
use std::path::Path;

use crate::error::PipelineResult;
use crate::models::ExtractStrategy;

pub use ocr::NougatExtractor;
pub use structural::StructuralExtractor;

/// 文本提取器
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// 对应的策略
    fn strategy(&self) -> ExtractStrategy;

    /// 提取文本；返回空字符串由调用方按"内容为空"处理
    async fn extract(&self, source: &Path) -> PipelineResult<String>;
}

use async_trait::async_trait;
use std::path::Path;

use super::TextExtractor;
use crate::error::{PipelineError, PipelineResult};
use crate::models::ExtractStrategy;

/// 进程内 PDF 文本提取
///
/// 解析是纯 CPU 工作，放到阻塞线程池执行；解析器 panic 也只影响当前文档。
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuralExtractor;

#[async_trait]
impl TextExtractor for StructuralExtractor {
    fn strategy(&self) -> ExtractStrategy {
        ExtractStrategy::Structural
    }

    async fn extract(&self, source: &Path) -> PipelineResult<String> {
        let path = source.to_path_buf();
        let display = source.display().to_string();

        let joined = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path)).await;

        match joined {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(extraction_error(display, e.to_string())),
            Err(e) => Err(extraction_error(display, format!("解析线程异常退出: {}", e))),
        }
    }
}

fn extraction_error(path: String, message: String) -> PipelineError {
    PipelineError::Extraction {
        strategy: ExtractStrategy::Structural.tag().to_string(),
        path,
        message,
    }
}

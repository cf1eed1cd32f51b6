//! 摘要流程 - 流程层
//!
//! 一个已提取的文本文件：摘要已存在或源为空则跳过 → 调用 LLM → 非空才写入

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use super::{ItemCtx, ItemProcessor};
use crate::error::{PipelineError, PipelineResult};
use crate::models::{DocumentItem, ProcessingResult, SkipReason, Stage};
use crate::services::{GenerationRequest, SummaryPrompt, TextGenerator};
use crate::utils::fs::{ensure_dir, file_size, save_non_empty};

/// 摘要流程
///
/// - 提示词在启动时构建一次，所有任务共享
/// - 生成后端通过 [`TextGenerator`] 注入
pub struct SummarizeFlow {
    generator: Arc<dyn TextGenerator>,
    prompt: Arc<SummaryPrompt>,
    summaries_dir: PathBuf,
}

impl SummarizeFlow {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        prompt: Arc<SummaryPrompt>,
        summaries_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            generator,
            prompt,
            summaries_dir: summaries_dir.into(),
        }
    }

    fn output_path(&self, item: &DocumentItem) -> PathBuf {
        self.summaries_dir.join(item.summary_file_name())
    }
}

#[async_trait]
impl ItemProcessor for SummarizeFlow {
    type Item = DocumentItem;

    fn stage(&self) -> Stage {
        Stage::Summarize
    }

    fn describe(&self, item: &DocumentItem) -> String {
        item.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| item.stem())
    }

    async fn precheck(&self, item: &DocumentItem) -> Option<ProcessingResult> {
        if file_size(&self.output_path(item)).await.is_some() {
            debug!("⏭️ 摘要已存在，跳过: {}", item.summary_file_name());
            return Some(ProcessingResult::Skipped(SkipReason::AlreadyExists));
        }
        match file_size(&item.path).await {
            Some(size) if size > 0 => None,
            _ => Some(ProcessingResult::Skipped(SkipReason::EmptySource)),
        }
    }

    async fn process(&self, item: &DocumentItem, ctx: &ItemCtx) -> PipelineResult<PathBuf> {
        let content = tokio::fs::read_to_string(&item.path)
            .await
            .map_err(|e| PipelineError::io(&item.path, e))?;
        if content.trim().is_empty() {
            return Err(PipelineError::empty_output(self.describe(item)));
        }

        info!("{} 🤖 生成摘要: {}", ctx, item.stem());
        let user = self.prompt.user_message(&content);
        let summary = self
            .generator
            .generate(GenerationRequest {
                system: &self.prompt.system_instruction,
                user: &user,
                temperature: self.prompt.temperature,
                max_tokens: self.prompt.max_tokens,
            })
            .await?;

        ensure_dir(&self.summaries_dir).await?;
        let saved = save_non_empty(
            &self.output_path(item),
            &summary,
            &format!("{} 的摘要", item.stem()),
        )
        .await?;

        info!("{} ✅ 摘要已保存: {}", ctx, item.summary_file_name());
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// 记录收到的请求并返回固定文本
    struct RecordingGenerator {
        reply: String,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl RecordingGenerator {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for RecordingGenerator {
        async fn generate(&self, request: GenerationRequest<'_>) -> PipelineResult<String> {
            self.seen
                .lock()
                .unwrap()
                .push((request.system.to_string(), request.user.to_string()));
            Ok(self.reply.clone())
        }
    }

    #[tokio::test]
    async fn test_summary_written_with_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("Paper_structural.md");
        std::fs::write(&source, "paper body").unwrap();

        let generator = Arc::new(RecordingGenerator::new("# Paper\n\nsummary"));
        let flow = SummarizeFlow::new(
            generator.clone(),
            Arc::new(SummaryPrompt::default()),
            dir.path().join("summaries"),
        );
        let item = DocumentItem::new(&source);

        assert_eq!(flow.precheck(&item).await, None);
        let saved = flow
            .process(&item, &ItemCtx::new(Stage::Summarize, 1, 1))
            .await
            .unwrap();

        assert_eq!(
            saved,
            dir.path().join("summaries").join("Paper_structural_summary.md")
        );
        assert_eq!(std::fs::read_to_string(&saved).unwrap(), "# Paper\n\nsummary");

        let seen = generator.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].1.ends_with("paper body"));
        assert!(seen[0].1.starts_with("Please summarize this research paper:"));
    }

    #[tokio::test]
    async fn test_empty_generation_is_skipped_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("Paper.md");
        std::fs::write(&source, "paper body").unwrap();

        let flow = SummarizeFlow::new(
            Arc::new(RecordingGenerator::new("   ")),
            Arc::new(SummaryPrompt::default()),
            dir.path().join("summaries"),
        );
        let item = DocumentItem::new(&source);
        let outcome = flow
            .process(&item, &ItemCtx::new(Stage::Summarize, 1, 1))
            .await;

        assert_eq!(
            ProcessingResult::from_outcome(outcome),
            ProcessingResult::Skipped(SkipReason::EmptySource)
        );
        assert!(!dir.path().join("summaries").join("Paper_summary.md").exists());
    }

    struct BrokenResponseGenerator;

    #[async_trait]
    impl TextGenerator for BrokenResponseGenerator {
        async fn generate(&self, _request: GenerationRequest<'_>) -> PipelineResult<String> {
            Err(PipelineError::external_service("llm", "响应中没有内容"))
        }
    }

    #[tokio::test]
    async fn test_malformed_response_is_failed() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("Paper.md");
        std::fs::write(&source, "paper body").unwrap();

        let flow = SummarizeFlow::new(
            Arc::new(BrokenResponseGenerator),
            Arc::new(SummaryPrompt::default()),
            dir.path().join("summaries"),
        );
        let outcome = flow
            .process(&DocumentItem::new(&source), &ItemCtx::new(Stage::Summarize, 1, 1))
            .await;

        assert!(ProcessingResult::from_outcome(outcome).is_failed());
        assert!(!dir.path().join("summaries").join("Paper_summary.md").exists());
    }

    #[tokio::test]
    async fn test_existing_summary_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("Paper.md");
        std::fs::write(&source, "paper body").unwrap();
        let summaries = dir.path().join("summaries");
        std::fs::create_dir_all(&summaries).unwrap();
        std::fs::write(summaries.join("Paper_summary.md"), "old").unwrap();

        let flow = SummarizeFlow::new(
            Arc::new(RecordingGenerator::new("new")),
            Arc::new(SummaryPrompt::default()),
            &summaries,
        );

        assert_eq!(
            flow.precheck(&DocumentItem::new(&source)).await,
            Some(ProcessingResult::Skipped(SkipReason::AlreadyExists))
        );
    }
}

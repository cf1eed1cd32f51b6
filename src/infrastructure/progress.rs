//! 进度报告
//!
//! 每个工作项结束（成功、跳过或失败）时计数加一，与完成顺序无关。

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::models::{ProcessingResult, Stage};

#[derive(Clone)]
pub struct ProgressReporter {
    bar: ProgressBar,
    completed: Arc<AtomicUsize>,
    failed: Arc<AtomicUsize>,
}

impl ProgressReporter {
    pub fn new(stage: Stage, total: usize, visible: bool) -> Self {
        let bar = if visible {
            let bar = ProgressBar::new(total as u64);
            bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(8));
            bar
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(
            ProgressStyle::with_template("{prefix} [{elapsed_precise}] {bar:30} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_prefix(stage.label());

        Self {
            bar,
            completed: Arc::new(AtomicUsize::new(0)),
            failed: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// 隐藏的进度条，用于测试和非交互环境
    pub fn hidden(stage: Stage, total: usize) -> Self {
        Self::new(stage, total, false)
    }

    /// 记录一个工作项结束
    pub fn advance(&self, result: &ProcessingResult) {
        if result.is_failed() {
            let failed = self.failed.fetch_add(1, Ordering::SeqCst) + 1;
            self.bar.set_message(format!("失败 {}", failed));
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        self.bar.inc(1);
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn finish(&self) {
        self.bar.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SkipReason;
    use std::path::PathBuf;

    #[test]
    fn test_counts_every_outcome() {
        let progress = ProgressReporter::hidden(Stage::Download, 3);
        progress.advance(&ProcessingResult::Success(PathBuf::from("a")));
        progress.advance(&ProcessingResult::Skipped(SkipReason::InvalidReference));
        progress.advance(&ProcessingResult::Failed("x".into()));
        progress.finish();
        assert_eq!(progress.completed(), 3);
    }
}

//! 批量运行器 - 编排层
//!
//! ## 职责
//!
//! 对一批工作项执行 幂等检查 → 获取并发名额 → 处理，收集每一项的结果。
//!
//! ## 设计特点
//!
//! - **全部派发**：每个工作项一个任务，由并发限制器决定同时运行的数量
//! - **故障隔离**：单项的错误或 panic 只会变成该项的 `Failed` 结果
//! - **先检查后占位**：被跳过的项不占用并发名额
//! - **向下委托**：单项处理细节交给 [`ItemProcessor`]

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::infrastructure::{ConcurrencyLimiter, ProgressReporter};
use crate::models::{BatchReport, ItemResult, ProcessingResult};
use crate::services::FailureWriter;
use crate::utils::logging::truncate_text;
use crate::workflow::{ItemCtx, ItemProcessor};

/// 批量运行器
#[derive(Clone)]
pub struct BatchRunner {
    limiter: ConcurrencyLimiter,
    show_progress: bool,
    failure_writer: Option<Arc<FailureWriter>>,
}

impl BatchRunner {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            limiter: ConcurrencyLimiter::new(max_concurrent),
            show_progress: false,
            failure_writer: None,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// 失败项同时追加到失败记录文件
    pub fn with_failure_writer(mut self, writer: Arc<FailureWriter>) -> Self {
        self.failure_writer = Some(writer);
        self
    }

    /// 处理一批工作项
    ///
    /// 返回的报告与输入一一对应（按枚举顺序），无论每项成功与否。
    pub async fn run<P: ItemProcessor>(&self, processor: Arc<P>, items: Vec<P::Item>) -> BatchReport {
        let stage = processor.stage();
        let total = items.len();
        let progress = ProgressReporter::new(stage, total, self.show_progress);

        let mut handles = Vec::with_capacity(total);
        for (idx, item) in items.into_iter().enumerate() {
            let ctx = ItemCtx::new(stage, idx + 1, total);
            let label = processor.describe(&item);

            let processor = processor.clone();
            let limiter = self.limiter.clone();
            let progress = progress.clone();
            let failure_writer = self.failure_writer.clone();
            let task_label = label.clone();

            let handle = tokio::spawn(async move {
                let result = run_item(processor.as_ref(), &item, &ctx, &limiter).await;
                if let ProcessingResult::Failed(reason) = &result {
                    record_failure(&ctx, &task_label, reason, failure_writer.as_deref()).await;
                }
                progress.advance(&result);
                result
            });
            handles.push((ctx, label, handle));
        }

        let joined = join_all(
            handles
                .into_iter()
                .map(|(ctx, label, handle)| async move { (ctx, label, handle.await) }),
        )
        .await;

        let mut report = BatchReport::new(stage);
        for (ctx, label, outcome) in joined {
            let result = match outcome {
                Ok(result) => result,
                Err(e) => {
                    let reason = format!("任务异常退出: {}", e);
                    record_failure(&ctx, &label, &reason, self.failure_writer.as_deref()).await;
                    let result = ProcessingResult::Failed(reason);
                    progress.advance(&result);
                    result
                }
            };
            report.push(ItemResult {
                index: ctx.index,
                label,
                result,
            });
        }

        progress.finish();
        report.finalize()
    }
}

/// 单个工作项：检查 → 占位 → 处理
async fn run_item<P: ItemProcessor>(
    processor: &P,
    item: &P::Item,
    ctx: &ItemCtx,
    limiter: &ConcurrencyLimiter,
) -> ProcessingResult {
    if let Some(result) = processor.precheck(item).await {
        debug!("{} 跳过: {:?}", ctx, result);
        return result;
    }

    let _permit = match limiter.acquire().await {
        Ok(permit) => permit,
        Err(e) => return ProcessingResult::Failed(format!("无法获取并发名额: {}", e)),
    };

    ProcessingResult::from_outcome(processor.process(item, ctx).await)
}

async fn record_failure(ctx: &ItemCtx, label: &str, reason: &str, writer: Option<&FailureWriter>) {
    error!("{} ❌ {} 处理失败: {}", ctx, label, truncate_text(reason, 200));
    if let Some(writer) = writer {
        if let Err(e) = writer.write(ctx.stage, label, reason).await {
            warn!("⚠️ 无法写入失败记录: {}", e);
        }
    }
}

//! 处理结果与批次报告

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::error::{PipelineError, PipelineResult};

/// 流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Download,
    Extract,
    Summarize,
}

impl Stage {
    /// 用于文件名的英文名
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Download => "download",
            Stage::Extract => "extract",
            Stage::Summarize => "summarize",
        }
    }

    /// 用于日志的显示名
    pub fn label(self) -> &'static str {
        match self {
            Stage::Download => "下载",
            Stage::Extract => "提取",
            Stage::Summarize => "摘要",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 跳过原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// 输出已存在（幂等续跑）
    AlreadyExists,
    /// 源内容为空或缺失
    EmptySource,
    /// 引用无效
    InvalidReference,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::AlreadyExists => "输出已存在",
            SkipReason::EmptySource => "内容为空",
            SkipReason::InvalidReference => "无效引用",
        };
        f.write_str(text)
    }
}

/// 单个工作项的最终结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ProcessingResult {
    Success(PathBuf),
    Skipped(SkipReason),
    Failed(String),
}

impl ProcessingResult {
    /// 把处理器的返回值转换为结果，这是一个全函数：任何错误都不会越过这里
    pub fn from_outcome(outcome: PipelineResult<PathBuf>) -> Self {
        match outcome {
            Ok(path) => ProcessingResult::Success(path),
            Err(PipelineError::EmptyOutput { .. }) => {
                ProcessingResult::Skipped(SkipReason::EmptySource)
            }
            Err(PipelineError::InvalidReference { .. }) => {
                ProcessingResult::Skipped(SkipReason::InvalidReference)
            }
            Err(e) => ProcessingResult::Failed(e.to_string()),
        }
    }

    /// 是否计入"成功"（已存在的输出视为成功）
    pub fn is_successful(&self) -> bool {
        matches!(
            self,
            ProcessingResult::Success(_) | ProcessingResult::Skipped(SkipReason::AlreadyExists)
        )
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ProcessingResult::Failed(_))
    }
}

/// 带序号和描述的结果
#[derive(Debug, Clone, Serialize)]
pub struct ItemResult {
    /// 在枚举顺序中的位置（从 1 开始）
    pub index: usize,
    pub label: String,
    pub result: ProcessingResult,
}

/// 批次统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchCounts {
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// 批次报告
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub stage: Stage,
    pub generated_at: DateTime<Local>,
    pub counts: BatchCounts,
    pub results: Vec<ItemResult>,
}

impl BatchReport {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            generated_at: Local::now(),
            counts: BatchCounts::default(),
            results: Vec::new(),
        }
    }

    pub fn push(&mut self, item: ItemResult) {
        self.results.push(item);
    }

    /// 所有工作项结束后计算统计并按枚举顺序排序
    pub fn finalize(mut self) -> Self {
        self.results.sort_by_key(|r| r.index);
        let mut counts = BatchCounts {
            total: self.results.len(),
            ..Default::default()
        };
        for item in &self.results {
            match item.result {
                ProcessingResult::Success(_) => counts.succeeded += 1,
                ProcessingResult::Skipped(_) => counts.skipped += 1,
                ProcessingResult::Failed(_) => counts.failed += 1,
            }
        }
        self.counts = counts;
        self.generated_at = Local::now();
        self
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// 成功数（含已存在而跳过的项）
    pub fn successful(&self) -> usize {
        self.results.iter().filter(|r| r.result.is_successful()).count()
    }

    /// 实际尝试处理的数量（排除无效引用）
    pub fn attempted(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.result != ProcessingResult::Skipped(SkipReason::InvalidReference))
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemResult> {
        self.results.iter().filter(|r| r.result.is_failed())
    }

    pub fn has_failures(&self) -> bool {
        self.counts.failed > 0
    }

    /// 最终汇总行
    pub fn summary_line(&self) -> String {
        format!(
            "{} complete, successful: {}/{}",
            self.stage.as_str(),
            self.successful(),
            self.attempted()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(index: usize, result: ProcessingResult) -> ItemResult {
        ItemResult {
            index,
            label: format!("item-{}", index),
            result,
        }
    }

    #[test]
    fn test_from_outcome_is_total() {
        assert_eq!(
            ProcessingResult::from_outcome(Ok(PathBuf::from("a.pdf"))),
            ProcessingResult::Success(PathBuf::from("a.pdf"))
        );
        assert_eq!(
            ProcessingResult::from_outcome(Err(PipelineError::empty_output("x"))),
            ProcessingResult::Skipped(SkipReason::EmptySource)
        );
        assert_eq!(
            ProcessingResult::from_outcome(Err(PipelineError::invalid_reference("N/A"))),
            ProcessingResult::Skipped(SkipReason::InvalidReference)
        );
        let failed = ProcessingResult::from_outcome(Err(PipelineError::HttpStatus {
            url: "u".into(),
            status: 500,
        }));
        assert!(failed.is_failed());
    }

    #[test]
    fn test_finalize_counts_and_order() {
        let mut report = BatchReport::new(Stage::Download);
        report.push(item(3, ProcessingResult::Failed("boom".into())));
        report.push(item(1, ProcessingResult::Success(PathBuf::from("a"))));
        report.push(item(2, ProcessingResult::Skipped(SkipReason::AlreadyExists)));
        report.push(item(4, ProcessingResult::Skipped(SkipReason::InvalidReference)));
        let report = report.finalize();

        assert_eq!(
            report.counts,
            BatchCounts {
                total: 4,
                succeeded: 1,
                skipped: 2,
                failed: 1
            }
        );
        let order: Vec<usize> = report.results.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![1, 2, 3, 4]);
        assert_eq!(report.successful(), 2);
        assert_eq!(report.attempted(), 3);
        assert_eq!(report.summary_line(), "download complete, successful: 2/3");
        assert!(report.has_failures());
    }

    #[test]
    fn test_result_serialization() {
        let json = serde_json::to_value(ProcessingResult::Skipped(SkipReason::EmptySource)).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["detail"], "empty-source");
    }
}

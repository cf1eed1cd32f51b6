//! 失败记录服务 - 业务能力层
//!
//! 只负责"把失败项追加到失败记录文件"，不关心流程

use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::models::Stage;

/// 失败记录服务
///
/// 职责：
/// - 每个失败项写一行 `[阶段] 标签 | 原因`
/// - 并发任务共享同一个实例，写入互斥
/// - 只追加，不截断已有记录
pub struct FailureWriter {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FailureWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 追加一条失败记录
    pub async fn write(&self, stage: Stage, label: &str, reason: &str) -> PipelineResult<()> {
        debug!("写入失败记录: [{}] {}", stage, label);

        let _guard = self.lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PipelineError::io(parent, e))?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| PipelineError::io(&self.path, e))?;

        let line = format!("[{}] {} | {}\n", stage.as_str(), label, single_line(reason));
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| PipelineError::io(&self.path, e))?;
        file.flush()
            .await
            .map_err(|e| PipelineError::io(&self.path, e))?;

        Ok(())
    }
}

fn single_line(text: &str) -> String {
    text.lines().map(str::trim).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FailureWriter::new(dir.path().join("logs").join("failures.log"));

        writer
            .write(Stage::Download, "Paper_A.pdf", "HTTP 404")
            .await
            .unwrap();
        writer
            .write(Stage::Summarize, "Paper_B.md", "rate limited\nretry later")
            .await
            .unwrap();

        let content = std::fs::read_to_string(writer.path()).unwrap();
        assert_eq!(
            content,
            "[download] Paper_A.pdf | HTTP 404\n[summarize] Paper_B.md | rate limited retry later\n"
        );
    }
}

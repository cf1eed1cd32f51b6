//! OCR 提取：调用外部 nougat 命令
//!
//! nougat 把结果写到 `--out` 目录下的 `<stem>.mmd`。进程结束后
//! 轮询该文件，读出内容后删除中间文件。

use anyhow::Context;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use super::TextExtractor;
use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::models::ExtractStrategy;

const TOOL: &str = "nougat";

/// nougat 命令行提取器
#[derive(Debug, Clone)]
pub struct NougatExtractor {
    binary: PathBuf,
    work_dir: PathBuf,
    timeout: Duration,
    poll_attempts: u32,
    poll_interval: Duration,
}

impl NougatExtractor {
    pub fn new(binary: PathBuf, work_dir: PathBuf) -> Self {
        Self {
            binary,
            work_dir,
            timeout: Duration::from_secs(1800),
            poll_attempts: 10,
            poll_interval: Duration::from_millis(500),
        }
    }

    /// 按配置创建；未指定路径时从 PATH 中查找 nougat
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let binary = match &config.nougat_binary {
            Some(path) => path.clone(),
            None => which::which(TOOL).context("未找到 nougat，可通过 nougat_binary 指定路径")?,
        };
        let work_dir = config.strategy_dir(ExtractStrategy::Ocr).join(".raw");

        Ok(Self::new(binary, work_dir)
            .with_timeout(config.ocr_timeout())
            .with_polling(config.ocr_poll_attempts, config.ocr_poll_interval()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_polling(mut self, attempts: u32, interval: Duration) -> Self {
        self.poll_attempts = attempts.max(1);
        self.poll_interval = interval;
        self
    }

    fn raw_output_path(&self, source: &Path) -> PathBuf {
        let stem = source.file_stem().unwrap_or_default().to_string_lossy();
        self.work_dir.join(format!("{}.mmd", stem))
    }

    async fn wait_for_output(&self, raw: &Path) -> bool {
        for attempt in 0..self.poll_attempts {
            if tokio::fs::try_exists(raw).await.unwrap_or(false) {
                return true;
            }
            if attempt + 1 < self.poll_attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }
        false
    }
}

#[async_trait]
impl TextExtractor for NougatExtractor {
    fn strategy(&self) -> ExtractStrategy {
        ExtractStrategy::Ocr
    }

    async fn extract(&self, source: &Path) -> PipelineResult<String> {
        tokio::fs::create_dir_all(&self.work_dir)
            .await
            .map_err(|e| PipelineError::io(&self.work_dir, e))?;

        debug!("运行 nougat: {}", source.display());
        let output = Command::new(&self.binary)
            .arg(source)
            .arg("--out")
            .arg(&self.work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, output).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(PipelineError::external_tool(TOOL, format!("无法启动: {}", e)))
            }
            Err(_) => {
                return Err(PipelineError::external_tool(
                    TOOL,
                    format!("超过 {} 秒未完成", self.timeout.as_secs()),
                ))
            }
        };

        let raw = self.raw_output_path(source);
        if !self.wait_for_output(&raw).await {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: String = stderr
                .lines()
                .rev()
                .take(3)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect::<Vec<_>>()
                .join(" | ");
            return Err(PipelineError::external_tool(
                TOOL,
                format!("未生成输出文件 (退出状态: {}) {}", output.status, tail),
            ));
        }

        let text = tokio::fs::read_to_string(&raw)
            .await
            .map_err(|e| PipelineError::io(&raw, e))?;
        let _ = tokio::fs::remove_file(&raw).await;
        Ok(text)
    }
}

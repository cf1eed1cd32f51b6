use crate::models::{ExtractionItem, StrategySet};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 列出目录中指定扩展名的文件（按文件名排序）
///
/// 目录不存在时返回空列表
pub async fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !fs::try_exists(dir).await.unwrap_or(false) {
        tracing::warn!("目录不存在: {}", dir.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("无法读取目录: {}", dir.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// 文档 × 策略 展开为提取工作项
pub fn plan_extractions(sources: &[PathBuf], strategies: &StrategySet) -> Vec<ExtractionItem> {
    sources
        .iter()
        .flat_map(|source| {
            strategies.iter().map(move |strategy| ExtractionItem {
                source: source.clone(),
                strategy,
            })
        })
        .collect()
}
